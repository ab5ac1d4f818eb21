//! Release notes cache
//!
//! Documents are cached under (product, requested language, format, source
//! version). A new package version simply produces a new key, so entries
//! never need to be invalidated or deleted.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::document::{DocumentFormat, ReleaseNotesDocument};
use crate::errors::Result;
use crate::package::PackageVersion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cache identity of a release notes document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheKey {
    pub product_name: String,
    pub language: String,
    pub format: DocumentFormat,
    /// Exact source version text (`1.0` and `1.00` are distinct keys)
    pub version: String,
}

impl CacheKey {
    pub fn new(
        product_name: impl Into<String>,
        language: impl Into<String>,
        format: DocumentFormat,
        version: &PackageVersion,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            language: language.into(),
            format,
            version: version.as_str().to_string(),
        }
    }

    pub fn for_document(document: &ReleaseNotesDocument) -> Self {
        Self::new(
            document.product_name(),
            document.requested_language(),
            document.format().clone(),
            document.source_version(),
        )
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}@{}",
            self.product_name, self.language, self.format, self.version
        )
    }
}

/// Persisted form of a cached document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub key: CacheKey,
    pub content: String,
    pub resolved_language: String,
    pub cached_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn from_document(document: &ReleaseNotesDocument) -> Self {
        Self {
            key: CacheKey::for_document(document),
            content: document.content().to_string(),
            resolved_language: document.resolved_language().to_string(),
            cached_at: Utc::now(),
        }
    }

    /// Rebuild the document this entry was stored from
    pub fn to_document(&self) -> Result<ReleaseNotesDocument> {
        Ok(ReleaseNotesDocument::new(
            self.key.product_name.clone(),
            self.content.clone(),
            self.key.language.clone(),
            self.resolved_language.clone(),
            self.key.format.clone(),
            PackageVersion::parse(&self.key.version)?,
        ))
    }
}

/// Persistent release notes cache
///
/// Writers to the same key are last-write-wins. Readers must never see a
/// partially written entry.
pub trait ReleaseNotesStore: Send + Sync {
    /// Cached document for a key, if any
    fn retrieve(&self, key: &CacheKey) -> Result<Option<ReleaseNotesDocument>>;

    /// Cache a document under `CacheKey::for_document(document)`
    fn store(&self, document: &ReleaseNotesDocument) -> Result<()>;
}

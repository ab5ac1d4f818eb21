//! Release notes documents
//!
//! `Product` names what the caller asks about, `DocumentFormat` is the
//! content-format token used as the file extension inside packages, and
//! `ReleaseNotesDocument` is the immutable result handed back to callers.

use crate::errors::{RelNotesError, Result};
use crate::package::PackageVersion;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A product whose release notes are requested
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    name: String,
}

impl Product {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<&str> for Product {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Content format of a release notes file
///
/// The token doubles as the file extension: `RELEASE-NOTES.<lang>.<token>`.
/// Tokens other than the well-known ones are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DocumentFormat {
    #[default]
    Txt,
    Rtf,
    Html,
    Md,
    /// Any other extension (xml, pdf, ...)
    Other(String),
}

impl DocumentFormat {
    pub fn extension(&self) -> &str {
        match self {
            DocumentFormat::Txt => "txt",
            DocumentFormat::Rtf => "rtf",
            DocumentFormat::Html => "html",
            DocumentFormat::Md => "md",
            DocumentFormat::Other(token) => token,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for DocumentFormat {
    type Err = RelNotesError;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim();
        match token.to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(DocumentFormat::Txt),
            "rtf" => Ok(DocumentFormat::Rtf),
            "html" | "htm" => Ok(DocumentFormat::Html),
            "md" | "markdown" => Ok(DocumentFormat::Md),
            _ if is_extension_token(token) => Ok(DocumentFormat::Other(token.to_string())),
            _ => Err(RelNotesError::InvalidFormat(s.to_string())),
        }
    }
}

impl TryFrom<String> for DocumentFormat {
    type Error = RelNotesError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DocumentFormat> for String {
    fn from(value: DocumentFormat) -> Self {
        value.to_string()
    }
}

/// A single file-name extension: no dots, separators or whitespace
fn is_extension_token(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '+')
}

/// Release notes for one product, language and format
///
/// Content is opaque and returned exactly as found in the package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseNotesDocument {
    product_name: String,
    content: String,
    requested_language: String,
    resolved_language: String,
    format: DocumentFormat,
    source_version: PackageVersion,
}

impl ReleaseNotesDocument {
    pub fn new(
        product_name: impl Into<String>,
        content: impl Into<String>,
        requested_language: impl Into<String>,
        resolved_language: impl Into<String>,
        format: DocumentFormat,
        source_version: PackageVersion,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            content: content.into(),
            requested_language: requested_language.into(),
            resolved_language: resolved_language.into(),
            format,
            source_version,
        }
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Language the caller asked for (part of the cache identity)
    pub fn requested_language(&self) -> &str {
        &self.requested_language
    }

    /// Language of the file actually found (may be a fallback)
    pub fn resolved_language(&self) -> &str {
        &self.resolved_language
    }

    pub fn format(&self) -> &DocumentFormat {
        &self.format
    }

    /// Version of the package the content came from
    pub fn source_version(&self) -> &PackageVersion {
        &self.source_version
    }

    /// Whether the content is in the requested language or a fallback
    pub fn is_fallback(&self) -> bool {
        self.requested_language != self.resolved_language
    }
}

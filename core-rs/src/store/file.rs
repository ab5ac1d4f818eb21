//! Filesystem release notes cache
//!
//! Entries are stored in: ~/.config/relnotes/cache/ (by default)
//! One JSON file per cache key, named `<product>-<crc32 of key>.json`.
//! The directory is created on first write.

use crate::document::ReleaseNotesDocument;
use crate::errors::{RelNotesError, Result};
use crate::store::{CacheEntry, CacheKey, ReleaseNotesStore};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File-backed store - one JSON file per cached document
#[derive(Debug, Clone)]
pub struct FileStore {
    cache_dir: PathBuf,
}

impl FileStore {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Default cache directory: ~/.config/relnotes/cache/
    pub fn default_dir() -> Result<PathBuf> {
        let home_dir = env::var("HOME").map_err(|_| {
            RelNotesError::Config("HOME environment variable not set".to_string())
        })?;

        Ok(PathBuf::from(home_dir)
            .join(".config")
            .join("relnotes")
            .join("cache"))
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// All readable entries, sorted by product, language and version
    pub fn entries(&self) -> Result<Vec<CacheEntry>> {
        let mut entries = Vec::new();

        if !self.cache_dir.exists() {
            return Ok(entries);
        }

        for dir_entry in fs::read_dir(&self.cache_dir)? {
            let path = dir_entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            match read_entry(&path) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable cache entry"),
            }
        }

        entries.sort_by(|a, b| {
            a.key
                .product_name
                .cmp(&b.key.product_name)
                .then_with(|| a.key.language.cmp(&b.key.language))
                .then_with(|| a.key.version.cmp(&b.key.version))
        });
        Ok(entries)
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        let mut hasher = crc32fast::Hasher::new();
        for part in [
            key.product_name.as_str(),
            key.language.as_str(),
            key.format.extension(),
            key.version.as_str(),
        ] {
            hasher.update(part.as_bytes());
            hasher.update(&[0]);
        }

        self.cache_dir
            .join(format!("{}-{:08x}.json", sanitize(&key.product_name), hasher.finalize()))
    }
}

impl ReleaseNotesStore for FileStore {
    fn retrieve(&self, key: &CacheKey) -> Result<Option<ReleaseNotesDocument>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let entry = read_entry(&path)?;

        // CRC collision with a different key
        if entry.key != *key {
            debug!(path = %path.display(), "cache file belongs to a different key");
            return Ok(None);
        }

        entry.to_document().map(Some)
    }

    fn store(&self, document: &ReleaseNotesDocument) -> Result<()> {
        let entry = CacheEntry::from_document(document);
        let path = self.path_for(&entry.key);

        fs::create_dir_all(&self.cache_dir).map_err(|e| {
            RelNotesError::Store(format!("Failed to create cache directory: {}", e))
        })?;

        // Readers never see a partial entry
        let mut temp = tempfile::NamedTempFile::new_in(&self.cache_dir)?;
        serde_json::to_writer_pretty(&mut temp, &entry)?;
        temp.flush()?;
        temp.persist(&path).map_err(|e| {
            RelNotesError::Store(format!("Failed to write {}: {}", path.display(), e.error))
        })?;

        debug!(key = %entry.key, path = %path.display(), "stored release notes");
        Ok(())
    }
}

fn read_entry(path: &Path) -> Result<CacheEntry> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Keep file names portable: alphanumerics, '-', '_' and '.' only
fn sanitize(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect();

    if sanitized.is_empty() {
        "_".to_string()
    } else {
        sanitized
    }
}

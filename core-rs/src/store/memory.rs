//! In-memory release notes cache, lost when the process exits

use crate::document::ReleaseNotesDocument;
use crate::errors::{RelNotesError, Result};
use crate::store::{CacheEntry, CacheKey, ReleaseNotesStore};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReleaseNotesStore for MemoryStore {
    fn retrieve(&self, key: &CacheKey) -> Result<Option<ReleaseNotesDocument>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| RelNotesError::Store("memory store lock poisoned".to_string()))?;

        entries.get(key).map(CacheEntry::to_document).transpose()
    }

    fn store(&self, document: &ReleaseNotesDocument) -> Result<()> {
        let entry = CacheEntry::from_document(document);
        let mut entries = self
            .entries
            .write()
            .map_err(|_| RelNotesError::Store("memory store lock poisoned".to_string()))?;

        entries.insert(entry.key.clone(), entry);
        Ok(())
    }
}

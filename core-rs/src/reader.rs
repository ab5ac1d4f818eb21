//! Release notes reader
//!
//! Ties resolution, caching, extraction and lookup together:
//!
//! ```text
//! resolve package ──> cache hit? ──yes──> return cached document
//!                         │no
//!                         v
//!              extract into temp dir ──> locate localized file
//!                                              │
//!                                    store ──> return document
//! ```
//!
//! Release notes are optional content. Every failure along the way is
//! logged and reported as `None`; nothing here is fatal to the caller.

use crate::document::{DocumentFormat, Product, ReleaseNotesDocument};
use crate::locator::LocalizedDocumentLocator;
use crate::package::{DependencyQuery, PackageCandidate, PackageCatalog};
use crate::resolver::CandidateResolver;
use crate::store::{CacheKey, ReleaseNotesStore};
use crate::DEFAULT_LANGUAGE;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

type FlightKey = (String, String);

/// Resolves, extracts and caches release notes for products
pub struct ReleaseNotesReader {
    resolver: CandidateResolver,
    catalog: Arc<dyn PackageCatalog>,
    store: Arc<dyn ReleaseNotesStore>,
    locator: LocalizedDocumentLocator,
    default_language: String,
    default_format: DocumentFormat,
    /// One extraction at a time per (package, version)
    in_flight: Mutex<HashMap<FlightKey, Arc<Mutex<()>>>>,
}

impl ReleaseNotesReader {
    /// Create a reader over the given collaborators
    ///
    /// The store is owned by the caller; the reader only reads and writes
    /// entries through it.
    pub fn new(
        query: Arc<dyn DependencyQuery>,
        catalog: Arc<dyn PackageCatalog>,
        store: Arc<dyn ReleaseNotesStore>,
    ) -> Self {
        Self {
            resolver: CandidateResolver::new(query, catalog.clone()),
            catalog,
            store,
            locator: LocalizedDocumentLocator::new(),
            default_language: DEFAULT_LANGUAGE.to_string(),
            default_format: DocumentFormat::default(),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Language and format used by `release_notes_for_defaults`
    pub fn with_defaults(mut self, language: impl Into<String>, format: DocumentFormat) -> Self {
        self.default_language = language.into();
        self.default_format = format;
        self
    }

    pub fn with_resolver(mut self, resolver: CandidateResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_locator(mut self, locator: LocalizedDocumentLocator) -> Self {
        self.locator = locator;
        self
    }

    pub fn resolver(&self) -> &CandidateResolver {
        &self.resolver
    }

    /// Release notes in the default language and format
    pub fn release_notes_for_defaults(&self, product: &Product) -> Option<ReleaseNotesDocument> {
        self.release_notes_for(product, &self.default_language, self.default_format.clone())
    }

    /// Release notes for a product in the best available language
    ///
    /// # Arguments
    /// * `product` - Product to look up
    /// * `language` - Requested language (e.g., "de_DE")
    /// * `format` - Content format (file extension inside the package)
    ///
    /// # Returns
    /// The document, served from the store when this package version was
    /// seen before, or None when no release notes can be found
    pub fn release_notes_for(
        &self,
        product: &Product,
        language: &str,
        format: DocumentFormat,
    ) -> Option<ReleaseNotesDocument> {
        let candidate = self.resolver.resolve(product)?;
        let key = CacheKey::new(product.name(), language, format.clone(), &candidate.version);

        if let Some(document) = self.cached(&key) {
            return Some(document);
        }

        let flight_key = (candidate.name.clone(), candidate.version.as_str().to_string());
        let slot = self.flight_slot(&flight_key);

        let document = {
            let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);

            // Another caller may have finished the same extraction while we waited
            match self.cached(&key) {
                Some(document) => Some(document),
                None => self.fetch(product, &candidate, language, format),
            }
        };

        self.release_flight_slot(&flight_key, &slot);
        document
    }

    fn cached(&self, key: &CacheKey) -> Option<ReleaseNotesDocument> {
        match self.store.retrieve(key) {
            Ok(Some(document)) => {
                debug!(key = %key, "release notes served from cache");
                Some(document)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(key = %key, error = %e, "cache read failed, treating as miss");
                None
            }
        }
    }

    /// Extract the candidate, locate the document and cache it
    fn fetch(
        &self,
        product: &Product,
        candidate: &PackageCandidate,
        language: &str,
        format: DocumentFormat,
    ) -> Option<ReleaseNotesDocument> {
        // Removed when dropped, on every return path
        let workdir = match tempfile::Builder::new().prefix("relnotes-").tempdir() {
            Ok(dir) => dir,
            Err(e) => {
                warn!(error = %e, "cannot create extraction directory");
                return None;
            }
        };

        if let Err(e) = self.catalog.extract(candidate, workdir.path()) {
            warn!(package = %candidate.name, version = %candidate.version, error = %e, "extraction failed");
            return None;
        }

        let Some(located) = self.locator.locate(workdir.path(), language, &format) else {
            info!(
                product = %product,
                package = %candidate.name,
                language,
                format = %format,
                "package contains no matching release notes"
            );
            return None;
        };

        let document = ReleaseNotesDocument::new(
            product.name(),
            located.content,
            language,
            located.resolved_language,
            format,
            candidate.version.clone(),
        );

        if let Err(e) = self.store.store(&document) {
            warn!(product = %product, error = %e, "failed to cache release notes");
        }

        Some(document)
    }

    fn flight_slot(&self, key: &FlightKey) -> Arc<Mutex<()>> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        in_flight.entry(key.clone()).or_default().clone()
    }

    fn release_flight_slot(&self, key: &FlightKey, slot: &Arc<Mutex<()>>) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if in_flight.get(key).is_some_and(|current| Arc::ptr_eq(current, slot)) {
            in_flight.remove(key);
        }
    }
}

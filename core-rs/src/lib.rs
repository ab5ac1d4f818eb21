//! # relnotes core - release notes for package-based installers
//!
//! Installers and upgrade tools show the release notes of the product being
//! installed. Those notes ship inside a dedicated package, one file per
//! language. This crate finds that package, extracts it, picks the best
//! language variant and caches the result so later lookups for the same
//! package version never touch the package again.
//!
//! ## Architecture
//!
//! ```text
//!            ReleaseNotesReader::release_notes_for(product, lang, format)
//!                                  │
//!        ┌─────────────────────────┼──────────────────────────┐
//!        v                         v                          v
//! CandidateResolver        ReleaseNotesStore         LocalizedDocumentLocator
//!  (DependencyQuery,        (MemoryStore,             (RELEASE-NOTES.<lang>.<fmt>,
//!   PackageCatalog)          FileStore)                 fallback chain)
//! ```
//!
//! Package metadata, payload extraction and persistence sit behind traits;
//! `LocalRepository` and `FileStore` are the bundled implementations.

pub mod config;
pub mod document;
pub mod errors;
pub mod locator;
pub mod package;
pub mod reader;
pub mod resolver;
pub mod store;

pub use config::RelNotesConfig;
pub use document::{DocumentFormat, Product, ReleaseNotesDocument};
pub use errors::{RelNotesError, Result};
pub use locator::{fallback_chain, LocalizedDocumentLocator, LocatedDocument};
pub use package::{
    DependencyQuery, DependencyRecord, LocalRepository, PackageCandidate, PackageCatalog,
    PackageStatus, PackageVersion, ProvidesHit,
};
pub use reader::ReleaseNotesReader;
pub use resolver::{CandidateResolver, ProvidesMatcher, ReleaseNotesProvides};
pub use store::{CacheEntry, CacheKey, FileStore, MemoryStore, ReleaseNotesStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Language requested when the caller does not name one
pub const DEFAULT_LANGUAGE: &str = "en_US";

//! Package layer
//!
//! Collaborator traits the pipeline depends on, package version ordering,
//! and a local tar.gz repository implementing both traits.

mod traits;
mod repository;
pub mod version;

pub use traits::{
    DependencyKind, DependencyQuery, DependencyRecord, PackageCandidate, PackageCatalog,
    PackageStatus, ProvidesHit, RELEASE_NOTES_CAPABILITY,
};
pub use repository::{IndexEntry, LocalRepository, RepositoryIndex, INDEX_FILE};
pub use version::PackageVersion;

//! Package collaborator traits
//!
//! Defines the interfaces the release-notes pipeline needs from the
//! surrounding package manager:
//! - DependencyQuery: capability lookups and per-package dependency records
//! - PackageCatalog: known instances of a package and payload extraction
//!
//! The pipeline never talks to a package manager directly; anything that
//! implements these two traits can back it (see `LocalRepository`).

use crate::errors::Result;
use crate::package::version::PackageVersion;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Capability advertised by packages that carry release notes
pub const RELEASE_NOTES_CAPABILITY: &str = "release-notes()";

/// One answer to a capability lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidesHit {
    /// Package advertising the capability
    pub package_name: String,

    /// The full provides expression that matched (e.g., "release-notes() = SLES")
    pub provides: String,
}

/// Dependency record kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Provides,
    Requires,
    Conflicts,
    Obsoletes,
}

/// A declared dependency of a package
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyRecord {
    pub kind: DependencyKind,

    /// Free-text dependency expression (e.g., "release-notes() = openSUSE")
    pub expression: String,
}

impl DependencyRecord {
    pub fn provides(expression: impl Into<String>) -> Self {
        Self {
            kind: DependencyKind::Provides,
            expression: expression.into(),
        }
    }

    pub fn requires(expression: impl Into<String>) -> Self {
        Self {
            kind: DependencyKind::Requires,
            expression: expression.into(),
        }
    }

    /// The expression, if this record is a provides record
    pub fn as_provides(&self) -> Option<&str> {
        match self.kind {
            DependencyKind::Provides => Some(&self.expression),
            _ => None,
        }
    }
}

/// Status of a package instance in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PackageStatus {
    #[default]
    Available,
    Selected,
    /// Any other state reported by the catalog (installed, locked, ...)
    Other(String),
}

impl PackageStatus {
    /// Only available or selected instances may provide release notes
    pub fn is_eligible(&self) -> bool {
        matches!(self, PackageStatus::Available | PackageStatus::Selected)
    }
}

impl From<String> for PackageStatus {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "available" => PackageStatus::Available,
            "selected" => PackageStatus::Selected,
            _ => PackageStatus::Other(value),
        }
    }
}

impl From<PackageStatus> for String {
    fn from(value: PackageStatus) -> Self {
        value.to_string()
    }
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageStatus::Available => write!(f, "available"),
            PackageStatus::Selected => write!(f, "selected"),
            PackageStatus::Other(status) => write!(f, "{}", status),
        }
    }
}

/// One known instance of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageCandidate {
    pub name: String,
    pub version: PackageVersion,
    pub status: PackageStatus,
}

impl PackageCandidate {
    pub fn new(name: impl Into<String>, version: PackageVersion, status: PackageStatus) -> Self {
        Self {
            name: name.into(),
            version,
            status,
        }
    }

    pub fn is_eligible(&self) -> bool {
        self.status.is_eligible()
    }
}

impl fmt::Display for PackageCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} ({})", self.name, self.version, self.status)
    }
}

/// Package metadata queries
///
/// Both calls may be slow (network or database backed). Callers should
/// query as little as they can.
pub trait DependencyQuery: Send + Sync {
    /// Packages advertising a capability
    ///
    /// # Arguments
    /// * `capability` - Capability name, optionally with a version
    ///   expression (e.g., "release-notes()" or "release-notes() = SLES")
    fn what_provides(&self, capability: &str) -> Result<Vec<ProvidesHit>>;

    /// Declared dependency records of every known instance of a package
    fn dependencies_of(&self, package: &str) -> Result<Vec<DependencyRecord>>;
}

/// Package instance lookup and payload extraction
pub trait PackageCatalog: Send + Sync {
    /// All known instances of a package, in no particular order
    fn find(&self, package: &str) -> Result<Vec<PackageCandidate>>;

    /// Extract the payload of an instance into `target`
    ///
    /// `target` exists and is empty. It is owned by the caller, which
    /// removes it afterwards.
    fn extract(&self, candidate: &PackageCandidate, target: &Path) -> Result<()>;
}

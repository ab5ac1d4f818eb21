//! Local package repository
//!
//! A directory holding package payloads as tar.gz files plus an `index.yaml`
//! describing each package instance:
//!
//! ```yaml
//! packages:
//!   - name: openSUSE-release-notes
//!     version: 15.5.20230601-lp155.1.1
//!     status: available
//!     provides:
//!       - release-notes() = openSUSE
//!     file: openSUSE-release-notes-15.5.20230601-lp155.1.1.tar.gz
//! ```
//!
//! Backs both `DependencyQuery` and `PackageCatalog` for the CLI and tests.

use crate::errors::{RelNotesError, Result};
use crate::package::traits::{
    DependencyQuery, DependencyRecord, PackageCandidate, PackageCatalog, PackageStatus, ProvidesHit,
};
use crate::package::version::PackageVersion;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Index file name inside a repository directory
pub const INDEX_FILE: &str = "index.yaml";

/// Repository index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryIndex {
    #[serde(default)]
    pub packages: Vec<IndexEntry>,
}

/// One package instance in the index
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub name: String,
    pub version: PackageVersion,
    #[serde(default)]
    pub status: PackageStatus,
    #[serde(default)]
    pub provides: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
    /// Payload tarball, relative to the repository directory
    pub file: String,
}

impl IndexEntry {
    fn candidate(&self) -> PackageCandidate {
        PackageCandidate::new(self.name.clone(), self.version.clone(), self.status.clone())
    }
}

/// Local repository - a directory of tar.gz payloads with an index
pub struct LocalRepository {
    root: PathBuf,
    index: RepositoryIndex,
}

impl LocalRepository {
    /// Open an existing repository
    ///
    /// A directory without `index.yaml` opens as an empty repository.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(RelNotesError::Config(format!(
                "Repository directory not found: {}",
                root.display()
            )));
        }

        let index_path = root.join(INDEX_FILE);
        let index = if index_path.exists() {
            let content = fs::read_to_string(&index_path)?;
            serde_yaml::from_str(&content)?
        } else {
            RepositoryIndex::default()
        };

        debug!(root = %root.display(), packages = index.packages.len(), "opened repository");
        Ok(Self { root, index })
    }

    /// Create a repository directory (and an empty index) if needed
    pub fn create(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;

        let repo = Self {
            root,
            index: RepositoryIndex::default(),
        };
        if !repo.root.join(INDEX_FILE).exists() {
            repo.save_index()?;
        }
        Self::open(repo.root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index(&self) -> &RepositoryIndex {
        &self.index
    }

    /// Package a directory into the repository
    ///
    /// Creates `<name>-<version>.tar.gz` from the contents of `payload_dir`,
    /// appends an index entry and writes the index back.
    ///
    /// # Returns
    /// Path to the created tarball
    pub fn publish(
        &mut self,
        name: &str,
        version: PackageVersion,
        status: PackageStatus,
        provides: Vec<String>,
        payload_dir: &Path,
    ) -> Result<PathBuf> {
        if !payload_dir.is_dir() {
            return Err(RelNotesError::PackageNotFound(format!(
                "Payload directory not found: {}",
                payload_dir.display()
            )));
        }

        let filename = format!("{}-{}.tar.gz", name, version);
        let tarball_path = self.root.join(&filename);
        create_tarball(payload_dir, &tarball_path)?;

        self.index.packages.push(IndexEntry {
            name: name.to_string(),
            version,
            status,
            provides,
            requires: Vec::new(),
            file: filename,
        });
        self.save_index()?;

        Ok(tarball_path)
    }

    fn save_index(&self) -> Result<()> {
        let yaml = serde_yaml::to_string(&self.index)?;
        fs::write(self.root.join(INDEX_FILE), yaml)?;
        Ok(())
    }

    fn entries_named<'a>(&'a self, package: &'a str) -> impl Iterator<Item = &'a IndexEntry> + 'a {
        self.index.packages.iter().filter(move |entry| entry.name == package)
    }
}

impl DependencyQuery for LocalRepository {
    fn what_provides(&self, capability: &str) -> Result<Vec<ProvidesHit>> {
        let wanted = normalize_expression(capability);
        let name_only = capability_name(capability) == wanted;

        let mut hits = Vec::new();
        for entry in &self.index.packages {
            for provides in &entry.provides {
                let matched = if name_only {
                    capability_name(provides) == wanted
                } else {
                    normalize_expression(provides) == wanted
                };

                if matched {
                    hits.push(ProvidesHit {
                        package_name: entry.name.clone(),
                        provides: provides.clone(),
                    });
                }
            }
        }

        Ok(hits)
    }

    fn dependencies_of(&self, package: &str) -> Result<Vec<DependencyRecord>> {
        let mut records: Vec<DependencyRecord> = Vec::new();

        for entry in self.entries_named(package) {
            let declared = entry
                .provides
                .iter()
                .map(DependencyRecord::provides)
                .chain(entry.requires.iter().map(DependencyRecord::requires));

            for record in declared {
                if !records.contains(&record) {
                    records.push(record);
                }
            }
        }

        Ok(records)
    }
}

impl PackageCatalog for LocalRepository {
    fn find(&self, package: &str) -> Result<Vec<PackageCandidate>> {
        Ok(self.entries_named(package).map(IndexEntry::candidate).collect())
    }

    fn extract(&self, candidate: &PackageCandidate, target: &Path) -> Result<()> {
        let entry = self
            .entries_named(&candidate.name)
            .find(|entry| entry.version == candidate.version)
            .ok_or_else(|| RelNotesError::PackageNotFound(candidate.to_string()))?;

        let tarball_path = self.root.join(&entry.file);
        if !tarball_path.exists() {
            return Err(RelNotesError::PackageNotFound(format!(
                "Package payload not found in repository: {}",
                entry.file
            )));
        }

        debug!(package = %candidate.name, version = %candidate.version, "extracting payload");
        extract_tarball(&tarball_path, target)
    }
}

/// Capability name of a dependency expression ("foo() >= 1" -> "foo()")
fn capability_name(expression: &str) -> String {
    expression
        .split(|c: char| c == '=' || c == '<' || c == '>')
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Collapse whitespace so "a()=b" and "a() = b" compare equal
fn normalize_expression(expression: &str) -> String {
    let mut normalized = String::with_capacity(expression.len());
    for c in expression.chars().filter(|c| !c.is_whitespace()) {
        normalized.push(c);
    }
    normalized
}

/// Extract tar.gz to target directory
fn extract_tarball(tarball_path: &Path, target_dir: &Path) -> Result<()> {
    use flate2::read::GzDecoder;
    use tar::Archive;

    let tar_gz = File::open(tarball_path).map_err(|e| {
        RelNotesError::Extraction(format!("Failed to open tarball: {}", e))
    })?;

    let tar = GzDecoder::new(tar_gz);
    let mut archive = Archive::new(tar);

    archive.unpack(target_dir).map_err(|e| {
        RelNotesError::Extraction(format!("Failed to extract tarball: {}", e))
    })?;

    Ok(())
}

/// Create tar.gz from the contents of a directory
fn create_tarball(source_dir: &Path, tarball_path: &Path) -> Result<()> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tar::Builder;

    let tar_gz = File::create(tarball_path)?;

    let enc = GzEncoder::new(tar_gz, Compression::default());
    let mut tar = Builder::new(enc);

    // Don't follow symlinks (prevents broken symlink errors)
    tar.follow_symlinks(false);

    tar.append_dir_all(".", source_dir)?;
    tar.into_inner()?.finish()?;

    Ok(())
}

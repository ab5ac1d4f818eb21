//! Integration tests for the release notes pipeline
//!
//! Drives `ReleaseNotesReader` end to end over a real tar.gz repository and
//! a file-backed cache:
//! - Resolution through provides records
//! - Extraction and language fallback
//! - Caching across calls, readers and package versions

use relnotes_core::{
    DependencyQuery, DependencyRecord, DocumentFormat, FileStore, LocalRepository,
    PackageCandidate, PackageCatalog, PackageStatus, PackageVersion, Product, ProvidesHit,
    ReleaseNotesReader, Result,
};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Wraps a repository and counts the expensive calls
struct Instrumented {
    inner: LocalRepository,
    dependency_queries: AtomicUsize,
    extractions: AtomicUsize,
}

impl Instrumented {
    fn open(root: &Path) -> Arc<Self> {
        Arc::new(Self {
            inner: LocalRepository::open(root).unwrap(),
            dependency_queries: AtomicUsize::new(0),
            extractions: AtomicUsize::new(0),
        })
    }

    fn extractions(&self) -> usize {
        self.extractions.load(Ordering::SeqCst)
    }
}

impl DependencyQuery for Instrumented {
    fn what_provides(&self, capability: &str) -> Result<Vec<ProvidesHit>> {
        self.inner.what_provides(capability)
    }

    fn dependencies_of(&self, package: &str) -> Result<Vec<DependencyRecord>> {
        self.dependency_queries.fetch_add(1, Ordering::SeqCst);
        self.inner.dependencies_of(package)
    }
}

impl PackageCatalog for Instrumented {
    fn find(&self, package: &str) -> Result<Vec<PackageCandidate>> {
        self.inner.find(package)
    }

    fn extract(&self, candidate: &PackageCandidate, target: &Path) -> Result<()> {
        self.extractions.fetch_add(1, Ordering::SeqCst);
        self.inner.extract(candidate, target)
    }
}

struct Fixture {
    temp: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        LocalRepository::create(temp.path().join("repo")).unwrap();
        Self { temp }
    }

    fn repo_dir(&self) -> std::path::PathBuf {
        self.temp.path().join("repo")
    }

    fn cache_dir(&self) -> std::path::PathBuf {
        self.temp.path().join("cache")
    }

    /// Publish a package whose payload holds the given release notes files
    fn publish(
        &self,
        name: &str,
        version: &str,
        status: PackageStatus,
        provides: &[&str],
        files: &[(&str, &str)],
    ) {
        let payload = self.temp.path().join(format!("payload-{}-{}", name, version));
        for (relative, content) in files {
            let path = payload.join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        fs::create_dir_all(&payload).unwrap();

        let mut repo = LocalRepository::open(self.repo_dir()).unwrap();
        repo.publish(
            name,
            PackageVersion::parse(version).unwrap(),
            status,
            provides.iter().map(|p| p.to_string()).collect(),
            &payload,
        )
        .unwrap();
    }

    fn reader(&self) -> (ReleaseNotesReader, Arc<Instrumented>) {
        let repo = Instrumented::open(&self.repo_dir());
        let reader = ReleaseNotesReader::new(
            repo.clone(),
            repo.clone(),
            Arc::new(FileStore::new(self.cache_dir())),
        );
        (reader, repo)
    }

    fn cached_files(&self) -> usize {
        match fs::read_dir(self.cache_dir()) {
            Ok(entries) => entries.count(),
            Err(_) => 0,
        }
    }
}

const SLES_NOTES: &[(&str, &str)] = &[
    ("usr/share/doc/release-notes/SLES/RELEASE-NOTES.en.txt", "SLES notes"),
    ("usr/share/doc/release-notes/SLES/RELEASE-NOTES.de.txt", "SLES Hinweise"),
    ("usr/share/doc/release-notes/SLES/RELEASE-NOTES.en.rtf", "{\\rtf1 SLES}"),
];

#[test]
fn test_full_resolution_with_fallback() {
    let fixture = Fixture::new();
    fixture.publish(
        "sles-release-notes",
        "15.5.1",
        PackageStatus::Available,
        &["release-notes() = SLES"],
        SLES_NOTES,
    );

    let (reader, _) = fixture.reader();
    let doc = reader
        .release_notes_for(&Product::new("SLES"), "de_DE", DocumentFormat::Txt)
        .unwrap();

    assert_eq!(doc.content(), "SLES Hinweise");
    assert_eq!(doc.resolved_language(), "de");
    assert_eq!(doc.requested_language(), "de_DE");
    assert_eq!(doc.source_version().as_str(), "15.5.1");
}

#[test]
fn test_unknown_product_never_extracts() {
    let fixture = Fixture::new();
    fixture.publish(
        "sles-release-notes",
        "15.5.1",
        PackageStatus::Available,
        &["release-notes() = SLES"],
        SLES_NOTES,
    );

    let (reader, repo) = fixture.reader();
    assert!(reader.release_notes_for_defaults(&Product::new("Tumbleweed")).is_none());
    assert_eq!(repo.extractions(), 0);
    assert_eq!(fixture.cached_files(), 0);
}

#[test]
fn test_cache_survives_new_reader() {
    let fixture = Fixture::new();
    fixture.publish(
        "sles-release-notes",
        "15.5.1",
        PackageStatus::Available,
        &["release-notes() = SLES"],
        SLES_NOTES,
    );

    let (first_reader, first_repo) = fixture.reader();
    let first = first_reader.release_notes_for_defaults(&Product::new("SLES")).unwrap();
    assert_eq!(first_repo.extractions(), 1);

    // A fresh process: new reader, same cache directory
    let (second_reader, second_repo) = fixture.reader();
    let second = second_reader.release_notes_for_defaults(&Product::new("SLES")).unwrap();

    assert_eq!(first, second);
    assert_eq!(second_repo.extractions(), 0);
}

#[test]
fn test_formats_and_languages_cached_separately() {
    let fixture = Fixture::new();
    fixture.publish(
        "sles-release-notes",
        "15.5.1",
        PackageStatus::Available,
        &["release-notes() = SLES"],
        SLES_NOTES,
    );

    let (reader, repo) = fixture.reader();
    let product = Product::new("SLES");

    let txt = reader.release_notes_for(&product, "en_US", DocumentFormat::Txt).unwrap();
    let rtf = reader.release_notes_for(&product, "en_US", DocumentFormat::Rtf).unwrap();
    let de = reader.release_notes_for(&product, "de", DocumentFormat::Txt).unwrap();

    assert_eq!(txt.content(), "SLES notes");
    assert_eq!(rtf.content(), "{\\rtf1 SLES}");
    assert_eq!(de.content(), "SLES Hinweise");
    assert_eq!(repo.extractions(), 3);
    assert_eq!(fixture.cached_files(), 3);
}

#[test]
fn test_version_bump_is_a_new_entry() {
    let fixture = Fixture::new();
    fixture.publish(
        "sles-release-notes",
        "2.0",
        PackageStatus::Available,
        &["release-notes() = SLES"],
        &[("RELEASE-NOTES.en.txt", "version two")],
    );

    let (reader, _) = fixture.reader();
    let old = reader.release_notes_for_defaults(&Product::new("SLES")).unwrap();
    assert_eq!(old.content(), "version two");

    fixture.publish(
        "sles-release-notes",
        "10.0",
        PackageStatus::Available,
        &["release-notes() = SLES"],
        &[("RELEASE-NOTES.en.txt", "version ten")],
    );

    let (reader, repo) = fixture.reader();
    let new = reader.release_notes_for_defaults(&Product::new("SLES")).unwrap();

    assert_eq!(new.content(), "version ten");
    assert_eq!(new.source_version().as_str(), "10.0");
    assert_eq!(repo.extractions(), 1);
    assert_eq!(fixture.cached_files(), 2);
}

#[test]
fn test_ineligible_newest_version_ignored() {
    let fixture = Fixture::new();
    fixture.publish(
        "sles-release-notes",
        "15.4",
        PackageStatus::Selected,
        &["release-notes() = SLES"],
        &[("RELEASE-NOTES.en.txt", "selected")],
    );
    fixture.publish(
        "sles-release-notes",
        "15.6",
        PackageStatus::Other("installed".to_string()),
        &["release-notes() = SLES"],
        &[("RELEASE-NOTES.en.txt", "installed")],
    );

    let (reader, _) = fixture.reader();
    let doc = reader.release_notes_for_defaults(&Product::new("SLES")).unwrap();
    assert_eq!(doc.content(), "selected");
    assert_eq!(doc.source_version().as_str(), "15.4");
}

#[test]
fn test_package_without_matching_language_is_none() {
    let fixture = Fixture::new();
    fixture.publish(
        "sles-release-notes",
        "15.5",
        PackageStatus::Available,
        &["release-notes() = SLES"],
        &[("RELEASE-NOTES.fr.txt", "Francais")],
    );

    let (reader, repo) = fixture.reader();
    assert!(reader
        .release_notes_for(&Product::new("SLES"), "ja_JP", DocumentFormat::Txt)
        .is_none());
    assert_eq!(repo.extractions(), 1);
    assert_eq!(fixture.cached_files(), 0);
}

#[test]
fn test_first_matching_provider_wins() {
    let fixture = Fixture::new();
    fixture.publish(
        "sled-release-notes",
        "15.5",
        PackageStatus::Available,
        &["release-notes() = SLED"],
        &[("RELEASE-NOTES.en.txt", "desktop")],
    );
    fixture.publish(
        "sles-release-notes",
        "15.5",
        PackageStatus::Available,
        &["release-notes()=SLES"],
        &[("RELEASE-NOTES.en.txt", "server")],
    );
    fixture.publish(
        "sles-sap-release-notes",
        "15.5",
        PackageStatus::Available,
        &["release-notes() = SLES_SAP"],
        &[("RELEASE-NOTES.en.txt", "sap")],
    );

    let (reader, repo) = fixture.reader();
    let doc = reader.release_notes_for_defaults(&Product::new("SLES")).unwrap();

    assert_eq!(doc.content(), "server");
    // sled-release-notes, then sles-release-notes; the SAP package is never scanned
    assert_eq!(repo.dependency_queries.load(Ordering::SeqCst), 2);
}

// Cache Key Contract Tests
//
// These tests verify what makes two release notes lookups "the same".
//
// **Problem**: Dropping a key component looks like a harmless simplification
// **Solution**: Contract tests for each component of the identity

use relnotes_core::{CacheKey, DocumentFormat, PackageVersion, ReleaseNotesDocument};

fn key(product: &str, language: &str, format: DocumentFormat, version: &str) -> CacheKey {
    CacheKey::new(product, language, format, &PackageVersion::parse(version).unwrap())
}

/// WHY: Version is part of the key
/// REASON: Invalidation happens by key change, never by deletion
/// BREAKS: Upgrades keep showing the previous release's notes
/// SACRIFICES: If this fails, you need an invalidation mechanism instead
#[test]
fn version_is_part_of_identity() {
    assert_ne!(
        key("SLES", "en_US", DocumentFormat::Txt, "15.4"),
        key("SLES", "en_US", DocumentFormat::Txt, "15.5")
    );
}

/// WHY: Requested language is the key, not the resolved one
/// REASON: The lookup happens before we know which fallback applies
/// BREAKS: Cache can never be hit for fallback languages
#[test]
fn requested_language_is_the_key() {
    let doc = ReleaseNotesDocument::new(
        "SLES",
        "Hinweise",
        "de_CH",
        "de",
        DocumentFormat::Txt,
        PackageVersion::parse("15.5").unwrap(),
    );

    assert_eq!(
        CacheKey::for_document(&doc),
        key("SLES", "de_CH", DocumentFormat::Txt, "15.5")
    );
}

/// WHY: Format and product are part of the key
/// BREAKS: RTF callers receive plain text (or another product's notes)
#[test]
fn format_and_product_are_part_of_identity() {
    assert_ne!(
        key("SLES", "en_US", DocumentFormat::Txt, "15.5"),
        key("SLES", "en_US", DocumentFormat::Rtf, "15.5")
    );
    assert_ne!(
        key("SLES", "en_US", DocumentFormat::Txt, "15.5"),
        key("SLED", "en_US", DocumentFormat::Txt, "15.5")
    );
}

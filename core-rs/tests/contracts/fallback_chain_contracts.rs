// Fallback Chain Contract Tests
//
// These tests pin down the language fallback order users see in installers.
//
// **Problem**: "simplifying" the lookup to first-file-found makes the shown
//              language depend on archive layout
// **Solution**: Contract tests that fix the priority order explicitly

use relnotes_core::{fallback_chain, DocumentFormat, LocalizedDocumentLocator};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// WHY: Chain order is requested, primary subtag, en_US, en
/// REASON: A German user on de_AT would rather read German than English
/// BREAKS: Users get English notes although their language is shipped
/// SACRIFICES: If this fails, you're reordering user-visible fallbacks
#[test]
fn chain_order_is_protocol_constant() {
    assert_eq!(fallback_chain("de_AT"), vec!["de_AT", "de", "en_US", "en"]);
    assert_eq!(fallback_chain("zh_TW"), vec!["zh_TW", "zh", "en_US", "en"]);

    // If this test fails:
    // - You changed the fallback order
    // - Installers will show a different language for the same package
}

/// WHY: English is always the last resort
/// REASON: Every release notes package ships English
/// BREAKS: Products whose notes exist only in English show nothing
#[test]
fn english_always_terminates_chain() {
    for requested in ["de_DE", "ja", "pt_BR.UTF-8", "", "en"] {
        let chain = fallback_chain(requested);
        assert!(chain.contains(&"en_US".to_string()), "{:?}", chain);
        assert!(chain.contains(&"en".to_string()), "{:?}", chain);
    }
}

/// WHY: Priority wins over position in the archive
/// REASON: Packages may nest language files in different directories;
///         walk order is an implementation detail of the archive
/// BREAKS: de_DE users would get English whenever the English file sorts first
/// SACRIFICES: If this fails, you're back to traversal-order ambiguity
#[test]
fn priority_order_beats_directory_layout() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "0-first/RELEASE-NOTES.en.txt", "English");
    write(temp.path(), "1-second/RELEASE-NOTES.en_US.txt", "American");
    write(temp.path(), "9-last/nested/RELEASE-NOTES.de.txt", "Deutsch");

    let located = LocalizedDocumentLocator::new()
        .locate(temp.path(), "de_DE", &DocumentFormat::Txt)
        .unwrap();
    assert_eq!(located.resolved_language, "de");

    let located = LocalizedDocumentLocator::new()
        .locate(temp.path(), "fr_FR", &DocumentFormat::Txt)
        .unwrap();
    assert_eq!(
        located.resolved_language, "en_US",
        "en_US must be preferred over en"
    );
}

/// WHY: An exact match is never displaced by a fallback
/// BREAKS: Users explicitly choosing de_DE see generic German
#[test]
fn exact_match_beats_subtag() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a/RELEASE-NOTES.de.txt", "Deutsch");
    write(temp.path(), "b/RELEASE-NOTES.de_DE.txt", "Deutsch (Deutschland)");

    let located = LocalizedDocumentLocator::new()
        .locate(temp.path(), "de_DE", &DocumentFormat::Txt)
        .unwrap();
    assert_eq!(located.resolved_language, "de_DE");
    assert_eq!(located.content, "Deutsch (Deutschland)");
}

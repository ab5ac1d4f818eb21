//! Localized release notes lookup
//!
//! Packages ship one file per language, named `RELEASE-NOTES.<lang>.<format>`,
//! anywhere below the extraction root. The locator walks the tree once,
//! collects every file whose language is in the fallback chain and picks the
//! one whose language comes first in the chain:
//!
//! ```text
//! requested "de_DE"  ->  de_DE, de, en_US, en
//! requested "en_US"  ->  en_US, en
//! requested "pt"     ->  pt, en_US, en
//! ```
//!
//! Within one language the first file in file-name order wins, so the result
//! does not depend on directory iteration order. Symlinked files count when
//! their target is a regular file inside the root.

use crate::document::DocumentFormat;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// File name prefix of release notes documents
pub const RELEASE_NOTES_PREFIX: &str = "RELEASE-NOTES.";

/// Languages tried after the requested one
pub const FALLBACK_LANGUAGES: [&str; 2] = ["en_US", "en"];

/// Build the language fallback chain for a requested language
///
/// POSIX locale decorations are dropped first (`de_DE.UTF-8`, `de_DE@euro`
/// both start from `de_DE`). Duplicates keep their first position.
pub fn fallback_chain(requested: &str) -> Vec<String> {
    let language = requested
        .split(|c: char| c == '.' || c == '@')
        .next()
        .unwrap_or("")
        .trim();

    let mut chain: Vec<String> = Vec::with_capacity(4);
    let mut push = |tag: &str| {
        if !tag.is_empty() && !chain.iter().any(|existing| existing == tag) {
            chain.push(tag.to_string());
        }
    };

    push(language);
    if let Some((primary, _region)) = language.split_once('_') {
        push(primary);
    }
    for fallback in FALLBACK_LANGUAGES {
        push(fallback);
    }

    chain
}

/// Language tag of a release notes file name, if it is one for `format`
///
/// `RELEASE-NOTES.de.txt` -> `Some("de")`
pub fn language_of<'a>(file_name: &'a str, format: &DocumentFormat) -> Option<&'a str> {
    let language = file_name
        .strip_prefix(RELEASE_NOTES_PREFIX)?
        .strip_suffix(format.extension())?
        .strip_suffix('.')?;

    if language.is_empty() {
        None
    } else {
        Some(language)
    }
}

/// A release notes file found under an extraction root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedDocument {
    pub content: String,
    pub resolved_language: String,
    pub path: PathBuf,
}

/// Finds the best-matching localized release notes file
#[derive(Debug, Clone, Default)]
pub struct LocalizedDocumentLocator {
    max_depth: Option<usize>,
}

impl LocalizedDocumentLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit how deep below the root the search descends
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Locate release notes for a language below `root`
    ///
    /// # Returns
    /// The document content and the language actually found, or None when
    /// the root is missing, nothing in the fallback chain matches, or the
    /// chosen file cannot be read.
    pub fn locate(
        &self,
        root: &Path,
        requested_language: &str,
        format: &DocumentFormat,
    ) -> Option<LocatedDocument> {
        if !root.is_dir() {
            debug!(root = %root.display(), "extraction root missing");
            return None;
        }

        let chain = fallback_chain(requested_language);
        let (resolved_language, path) = self.best_match(root, &chain, format)?;

        let content = match fs::read(&path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read release notes");
                return None;
            }
        };

        debug!(
            requested = requested_language,
            resolved = %resolved_language,
            path = %path.display(),
            "located release notes"
        );

        Some(LocatedDocument {
            content,
            resolved_language,
            path,
        })
    }

    /// Highest-priority (language, path) pair below `root`
    fn best_match(
        &self,
        root: &Path,
        chain: &[String],
        format: &DocumentFormat,
    ) -> Option<(String, PathBuf)> {
        let root = match root.canonicalize() {
            Ok(root) => root,
            Err(e) => {
                debug!(root = %root.display(), error = %e, "cannot resolve extraction root");
                return None;
            }
        };

        let mut walker = WalkDir::new(&root).follow_links(false).sort_by_file_name();
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        // One slot per chain position; first file in walk order fills it
        let mut found: Vec<Option<PathBuf>> = vec![None; chain.len()];

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            if !is_document_file(&entry, &root) {
                continue;
            }

            let Some(language) = entry.file_name().to_str().and_then(|n| language_of(n, format))
            else {
                continue;
            };

            if let Some(position) = chain.iter().position(|tag| tag == language) {
                if found[position].is_none() {
                    found[position] = Some(entry.into_path());
                }
                // Nothing can beat the requested language itself
                if position == 0 {
                    break;
                }
            }
        }

        found
            .into_iter()
            .zip(chain)
            .find_map(|(path, language)| path.map(|p| (language.clone(), p)))
    }
}

/// Regular files, or symlinks resolving to a regular file inside `root`
fn is_document_file(entry: &DirEntry, root: &Path) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    if !entry.path_is_symlink() {
        return false;
    }

    match entry.path().canonicalize() {
        Ok(target) => target.starts_with(root) && target.is_file(),
        Err(e) => {
            debug!(path = %entry.path().display(), error = %e, "dangling symlink");
            false
        }
    }
}

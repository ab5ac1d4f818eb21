//! Release notes package resolution
//!
//! Finds the package carrying release notes for a product:
//! 1. Ask for every package advertising `release-notes()`
//! 2. Scan each package's dependency records, in query order, for
//!    `release-notes() = <product>`; stop at the first match
//! 3. Pick the highest-version available or selected instance
//!
//! Dependency scans are expensive, so packages after the first match are
//! never queried.

use crate::document::Product;
use crate::package::{
    DependencyQuery, DependencyRecord, PackageCandidate, PackageCatalog, RELEASE_NOTES_CAPABILITY,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

static RELEASE_NOTES_PROVIDES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*release-notes\(\)\s*=\s*(\S(?:.*\S)?)\s*$")
        .expect("release notes provides pattern is valid")
});

/// Decides whether a dependency record ties a package to a product
pub trait ProvidesMatcher: Send + Sync {
    /// Capability used to find candidate packages
    fn capability(&self) -> &str;

    fn matches(&self, record: &DependencyRecord, product: &Product) -> bool;
}

/// Matches provides records of the form `release-notes() = <product>`
#[derive(Debug, Clone, Copy, Default)]
pub struct ReleaseNotesProvides;

impl ReleaseNotesProvides {
    /// Product named by a provides expression, if it is a release-notes one
    pub fn product_of(expression: &str) -> Option<&str> {
        RELEASE_NOTES_PROVIDES
            .captures(expression)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str())
    }
}

impl ProvidesMatcher for ReleaseNotesProvides {
    fn capability(&self) -> &str {
        RELEASE_NOTES_CAPABILITY
    }

    fn matches(&self, record: &DependencyRecord, product: &Product) -> bool {
        record
            .as_provides()
            .and_then(Self::product_of)
            .is_some_and(|name| name == product.name())
    }
}

/// Resolves the release notes package instance for a product
pub struct CandidateResolver {
    query: Arc<dyn DependencyQuery>,
    catalog: Arc<dyn PackageCatalog>,
    matcher: Box<dyn ProvidesMatcher>,
}

impl CandidateResolver {
    pub fn new(query: Arc<dyn DependencyQuery>, catalog: Arc<dyn PackageCatalog>) -> Self {
        Self {
            query,
            catalog,
            matcher: Box::new(ReleaseNotesProvides),
        }
    }

    /// Replace the provides matching strategy
    pub fn with_matcher(mut self, matcher: Box<dyn ProvidesMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Resolve the package instance carrying release notes for `product`
    ///
    /// Query failures are logged and treated as "no release notes".
    pub fn resolve(&self, product: &Product) -> Option<PackageCandidate> {
        let package = self.provider_of(product)?;

        let instances = match self.catalog.find(&package) {
            Ok(instances) => instances,
            Err(e) => {
                warn!(package = %package, error = %e, "package lookup failed");
                return None;
            }
        };

        let candidate = instances
            .into_iter()
            .filter(PackageCandidate::is_eligible)
            .max_by(|a, b| a.version.cmp(&b.version));

        match &candidate {
            Some(c) => debug!(product = %product, package = %c.name, version = %c.version, "resolved release notes package"),
            None => debug!(product = %product, package = %package, "no available or selected instance"),
        }

        candidate
    }

    /// Name of the first package whose dependencies tie it to `product`
    pub fn provider_of(&self, product: &Product) -> Option<String> {
        let hits = match self.query.what_provides(self.matcher.capability()) {
            Ok(hits) => hits,
            Err(e) => {
                warn!(product = %product, error = %e, "capability query failed");
                return None;
            }
        };

        let mut seen = HashSet::new();
        let names = hits
            .into_iter()
            .map(|hit| hit.package_name)
            .filter(|name| seen.insert(name.clone()));

        for name in names {
            let records = match self.query.dependencies_of(&name) {
                Ok(records) => records,
                Err(e) => {
                    warn!(package = %name, error = %e, "dependency query failed");
                    return None;
                }
            };

            if records.iter().any(|record| self.matcher.matches(record, product)) {
                return Some(name);
            }
        }

        debug!(product = %product, "no package provides release notes");
        None
    }
}

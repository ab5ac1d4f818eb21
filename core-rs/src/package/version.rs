//! Package version ordering
//!
//! Versions have the shape `[epoch:]version[-release]`. Each part is compared
//! segment by segment, where a segment is a maximal run of ASCII digits or
//! ASCII letters. Everything else separates segments, except `~`, which marks
//! a pre-release and sorts before anything (including the end of the string).
//!
//! ```text
//! 2.0      < 10.0        numeric, not lexical
//! 1.0~rc1  < 1.0         pre-release
//! 1.0      < 1.0.1       longer wins when the common prefix is equal
//! 1.a      < 1.1         numeric segments beat alphabetic ones
//! 1:0.9    > 2.0         epoch first
//! ```

use crate::errors::{RelNotesError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A parsed package version
///
/// Equality follows the ordering, so `1.0` and `1.00` are equal even though
/// their textual forms differ. `as_str()` always returns the original text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageVersion {
    raw: String,
    epoch: u64,
    version: String,
    release: Option<String>,
}

impl PackageVersion {
    /// Parse a version string
    ///
    /// # Errors
    /// `InvalidVersion` when the string (or its version part) is empty, or
    /// the epoch prefix is not a number.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RelNotesError::InvalidVersion("empty version".to_string()));
        }

        let (epoch, rest) = match trimmed.split_once(':') {
            Some((epoch, rest)) => {
                let epoch = epoch.parse::<u64>().map_err(|_| {
                    RelNotesError::InvalidVersion(format!("invalid epoch in '{}'", trimmed))
                })?;
                (epoch, rest)
            }
            None => (0, trimmed),
        };

        let (version, release) = match rest.rsplit_once('-') {
            Some((version, release)) if !release.is_empty() => (version, Some(release.to_string())),
            _ => (rest, None),
        };

        if version.is_empty() {
            return Err(RelNotesError::InvalidVersion(format!(
                "missing version in '{}'",
                trimmed
            )));
        }

        Ok(Self {
            raw: trimmed.to_string(),
            epoch,
            version: version.to_string(),
            release,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn release(&self) -> Option<&str> {
        self.release.as_deref()
    }
}

impl Ord for PackageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| compare_segments(&self.version, &other.version))
            .then_with(|| {
                compare_segments(
                    self.release.as_deref().unwrap_or(""),
                    other.release.as_deref().unwrap_or(""),
                )
            })
    }
}

impl PartialOrd for PackageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PackageVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PackageVersion {}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for PackageVersion {
    type Err = RelNotesError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PackageVersion {
    type Error = RelNotesError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<PackageVersion> for String {
    fn from(value: PackageVersion) -> Self {
        value.raw
    }
}

/// Compare two version parts segment by segment
pub fn compare_segments(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let (a, b) = (a.as_bytes(), b.as_bytes());
    let (mut i, mut j) = (0, 0);

    loop {
        while i < a.len() && is_separator(a[i]) {
            i += 1;
        }
        while j < b.len() && is_separator(b[j]) {
            j += 1;
        }

        let a_tilde = i < a.len() && a[i] == b'~';
        let b_tilde = j < b.len() && b[j] == b'~';
        if a_tilde || b_tilde {
            match (a_tilde, b_tilde) {
                (true, false) => return Ordering::Less,
                (false, true) => return Ordering::Greater,
                _ => {
                    i += 1;
                    j += 1;
                    continue;
                }
            }
        }

        if i >= a.len() || j >= b.len() {
            break;
        }

        let numeric = a[i].is_ascii_digit();
        let a_end = run_end(a, i, numeric);
        let b_end = run_end(b, j, numeric);

        // b starts with the other kind of segment
        if b_end == j {
            return if numeric { Ordering::Greater } else { Ordering::Less };
        }

        let ordering = if numeric {
            compare_numeric(&a[i..a_end], &b[j..b_end])
        } else {
            a[i..a_end].cmp(&b[j..b_end])
        };
        if ordering != Ordering::Equal {
            return ordering;
        }

        i = a_end;
        j = b_end;
    }

    match (i >= a.len(), j >= b.len()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        _ => Ordering::Greater,
    }
}

fn is_separator(byte: u8) -> bool {
    !byte.is_ascii_alphanumeric() && byte != b'~'
}

fn run_end(bytes: &[u8], start: usize, numeric: bool) -> usize {
    let same_kind = |byte: &u8| {
        if numeric {
            byte.is_ascii_digit()
        } else {
            byte.is_ascii_alphabetic()
        }
    };
    start + bytes[start..].iter().take_while(|b| same_kind(b)).count()
}

fn compare_numeric(a: &[u8], b: &[u8]) -> Ordering {
    let a = strip_leading_zeros(a);
    let b = strip_leading_zeros(b);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn strip_leading_zeros(digits: &[u8]) -> &[u8] {
    let first = digits.iter().position(|d| *d != b'0').unwrap_or(digits.len());
    &digits[first..]
}

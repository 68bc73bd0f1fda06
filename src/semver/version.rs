//! Concrete semantic version values
//!
//! Parsing is delegated to the `semver` crate; the parsed fields are then
//! "stolen" into [`VersionParts`], which additionally classifies each
//! prerelease identifier as numeric or alphanumeric. The range-update
//! algebra needs that classification (and per-identifier ordering), which
//! `semver::Version` does not expose.

use crate::error::ParseError;
use std::cmp::Ordering;
use std::fmt;

/// The dotted components of a version or range base, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Major,
    Minor,
    Patch,
    Prerelease,
    Build,
}

/// All parts in precedence order, used when overriding a suffix of fields.
pub const PARTS: [Part; 5] = [
    Part::Major,
    Part::Minor,
    Part::Patch,
    Part::Prerelease,
    Part::Build,
];

impl Part {
    /// Position in the precedence order.
    pub fn index(self) -> usize {
        match self {
            Part::Major => 0,
            Part::Minor => 1,
            Part::Patch => 2,
            Part::Prerelease => 3,
            Part::Build => 4,
        }
    }
}

/// One prerelease identifier: `1`, `alpha`, `rc1`...
///
/// The derived ordering is exactly the semver rule: numeric identifiers
/// compare numerically and always sort before alphanumeric ones, which
/// compare lexically by code point.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Identifier {
    Numeric(u64),
    Alphanumeric(String),
}

impl Identifier {
    /// Classify a raw identifier string.
    pub fn classify(raw: &str) -> Self {
        if raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = raw.parse::<u64>() {
                return Identifier::Numeric(n);
            }
        }
        Identifier::Alphanumeric(raw.to_string())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{}", n),
            Identifier::Alphanumeric(s) => write!(f, "{}", s),
        }
    }
}

/// A concrete semantic version, immutable once constructed.
///
/// Build metadata is carried for display only; it never participates in
/// ordering or equality for update purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionParts {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Vec<Identifier>,
    pub build: Vec<String>,
}

impl VersionParts {
    /// Parse a full `major.minor.patch[-pre][+build]` version string.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let version = semver::Version::parse(text)
            .map_err(|e| ParseError::malformed_version(text, e.to_string()))?;
        Ok(Self::steal(&version))
    }

    /// Take the fields out of an already-parsed `semver::Version`.
    pub fn steal(version: &semver::Version) -> Self {
        let prerelease = if version.pre.is_empty() {
            Vec::new()
        } else {
            version.pre.split('.').map(Identifier::classify).collect()
        };
        let build = if version.build.is_empty() {
            Vec::new()
        } else {
            version.build.split('.').map(str::to_string).collect()
        };

        Self {
            major: version.major,
            minor: version.minor,
            patch: version.patch,
            prerelease,
            build,
        }
    }

    /// True if this version carries prerelease identifiers.
    pub fn is_prerelease(&self) -> bool {
        !self.prerelease.is_empty()
    }

    /// Core numeric triple, ignoring prerelease.
    fn triple(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }
}

impl fmt::Display for VersionParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.prerelease.is_empty() {
            let joined: Vec<String> = self.prerelease.iter().map(|i| i.to_string()).collect();
            write!(f, "-{}", joined.join("."))?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build.join("."))?;
        }
        Ok(())
    }
}

impl Ord for VersionParts {
    fn cmp(&self, other: &Self) -> Ordering {
        self.triple()
            .cmp(&other.triple())
            .then_with(|| compare_prerelease(&self.prerelease, &other.prerelease))
    }
}

impl PartialOrd for VersionParts {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two prerelease identifier sequences per semver precedence.
///
/// An empty sequence outranks any non-empty one (a release is higher than
/// its prereleases). Otherwise identifiers compare pairwise, and a strict
/// prefix sorts lower.
pub fn compare_prerelease(a: &[Identifier], b: &[Identifier]) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    for (x, y) in a.iter().zip(b.iter()) {
        match x.cmp(y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }

    a.len().cmp(&b.len())
}

/// Index of the first diverging identifier, along with the comparison
/// result. Used by the algebra to report where a prerelease edit starts.
pub fn diverge_prerelease(a: &[Identifier], b: &[Identifier]) -> (Ordering, usize) {
    let shared = a.len().min(b.len());
    for i in 0..shared {
        match a[i].cmp(&b[i]) {
            Ordering::Equal => continue,
            other => return (other, i),
        }
    }
    (a.len().cmp(&b.len()), shared)
}

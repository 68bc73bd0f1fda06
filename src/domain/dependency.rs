//! Dependency information structures

use crate::semver::normalize_range;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The package.json sections a dependency can be declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyType {
    Dependencies,
    DevDependencies,
    PeerDependencies,
    OptionalDependencies,
}

/// All sections, in manifest scan order.
pub const DEPENDENCY_TYPES: [DependencyType; 4] = [
    DependencyType::Dependencies,
    DependencyType::DevDependencies,
    DependencyType::PeerDependencies,
    DependencyType::OptionalDependencies,
];

impl DependencyType {
    /// The JSON key for this section.
    pub fn manifest_key(&self) -> &'static str {
        match self {
            DependencyType::Dependencies => "dependencies",
            DependencyType::DevDependencies => "devDependencies",
            DependencyType::PeerDependencies => "peerDependencies",
            DependencyType::OptionalDependencies => "optionalDependencies",
        }
    }

    /// One-character marker shown in the report table.
    pub fn marker(&self) -> char {
        match self {
            DependencyType::Dependencies => ' ',
            DependencyType::DevDependencies => 'd',
            DependencyType::PeerDependencies => 'p',
            DependencyType::OptionalDependencies => 'o',
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.manifest_key())
    }
}

/// Resolution state of one dependency. `Pending` transitions to exactly one
/// terminal state and the terminal states are never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Not yet resolved
    Pending,
    /// Registry consulted, candidates populated
    Resolved,
    /// The declared range failed validity checking
    InvalidRange,
    /// The declared range is an `||` combination; surfaced, never rewritten
    ComplexRange,
    /// Registry fetch failed or timed out
    NetworkError,
}

/// One manifest dependency entry and its resolution outcome.
///
/// The checker exclusively owns `status`, `newer` and `latest` during
/// resolution; downstream report/patch consumers only read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Package name
    pub name: String,
    /// Section this dependency was declared in
    pub dep_type: DependencyType,
    /// The range exactly as written in the manifest
    pub current_raw: String,
    /// The range with operator padding removed
    pub current: String,
    /// Resolution state
    pub status: CheckStatus,
    /// Best version satisfying the declared range, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newer: Option<String>,
    /// Best version ignoring the declared range, if requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<String>,
}

impl Dependency {
    /// Create a pending dependency from one manifest entry.
    pub fn new(name: impl Into<String>, dep_type: DependencyType, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let current = normalize_range(&raw);
        Self {
            name: name.into(),
            dep_type,
            current_raw: raw,
            current,
            status: CheckStatus::Pending,
            newer: None,
            latest: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.status == CheckStatus::Resolved
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} [{}]", self.name, self.current_raw, self.dep_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_new_normalizes() {
        let dep = Dependency::new("lodash", DependencyType::Dependencies, ">= 4.17.0");
        assert_eq!(dep.current_raw, ">= 4.17.0");
        assert_eq!(dep.current, ">=4.17.0");
        assert_eq!(dep.status, CheckStatus::Pending);
        assert!(dep.newer.is_none());
        assert!(dep.latest.is_none());
    }

    #[test]
    fn test_dependency_keeps_hyphen_spacing() {
        let dep = Dependency::new("react", DependencyType::Dependencies, "1.0.0 - 2.0.0");
        assert_eq!(dep.current, "1.0.0 - 2.0.0");
    }

    #[test]
    fn test_dependency_type_keys() {
        assert_eq!(DependencyType::Dependencies.manifest_key(), "dependencies");
        assert_eq!(
            DependencyType::DevDependencies.manifest_key(),
            "devDependencies"
        );
        assert_eq!(
            DependencyType::PeerDependencies.manifest_key(),
            "peerDependencies"
        );
        assert_eq!(
            DependencyType::OptionalDependencies.manifest_key(),
            "optionalDependencies"
        );
    }

    #[test]
    fn test_dependency_type_markers() {
        assert_eq!(DependencyType::Dependencies.marker(), ' ');
        assert_eq!(DependencyType::DevDependencies.marker(), 'd');
        assert_eq!(DependencyType::PeerDependencies.marker(), 'p');
        assert_eq!(DependencyType::OptionalDependencies.marker(), 'o');
    }

    #[test]
    fn test_dependency_display() {
        let dep = Dependency::new("jest", DependencyType::DevDependencies, "^29.0.0");
        assert_eq!(format!("{}", dep), "jest@^29.0.0 [devDependencies]");
    }

    #[test]
    fn test_serde_dependency() {
        let dep = Dependency::new("lodash", DependencyType::Dependencies, "^4.17.21");
        let json = serde_json::to_string(&dep).unwrap();
        let parsed: Dependency = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, dep);
    }
}

//! Registry collaborator for fetching package version metadata
//!
//! This module provides:
//! - HTTP client shared foundation (timeout, user-agent, no retries)
//! - The `Registry` trait the checker is written against
//! - npm registry adapter

mod client;
mod npm;

pub use client::HttpClient;
pub use npm::{NpmRegistry, NPM_REGISTRY_URL};

use crate::error::RegistryError;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

/// Version metadata the pipeline cares about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionMetadata {
    /// npm serves a deprecation message string here; some packages carry a
    /// literal `false`, so the raw value is kept and truthiness is derived.
    #[serde(default)]
    pub deprecated: Option<serde_json::Value>,
}

impl VersionMetadata {
    pub fn is_deprecated(&self) -> bool {
        match &self.deprecated {
            None => false,
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::String(s)) => !s.is_empty(),
            Some(serde_json::Value::Null) => false,
            Some(_) => true,
        }
    }
}

/// Distribution tags; only `latest` is consulted.
#[derive(Debug, Clone, Deserialize)]
pub struct DistTags {
    pub latest: String,
}

/// The slice of a registry packument the checker needs.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageMetadata {
    #[serde(rename = "dist-tags")]
    pub dist_tags: DistTags,
    pub versions: HashMap<String, VersionMetadata>,
}

/// Opaque async lookup of package metadata. Implemented by the npm adapter
/// and by in-memory fakes in tests; the checker never sees anything else.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Registry display name for error messages
    fn name(&self) -> &'static str;

    /// Fetch version metadata for a package
    async fn fetch_metadata(&self, package: &str) -> Result<PackageMetadata, RegistryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deprecated_truthiness() {
        let meta = VersionMetadata { deprecated: None };
        assert!(!meta.is_deprecated());

        let meta = VersionMetadata {
            deprecated: Some(json!("use v2 instead")),
        };
        assert!(meta.is_deprecated());

        let meta = VersionMetadata {
            deprecated: Some(json!("")),
        };
        assert!(!meta.is_deprecated());

        let meta = VersionMetadata {
            deprecated: Some(json!(false)),
        };
        assert!(!meta.is_deprecated());

        let meta = VersionMetadata {
            deprecated: Some(json!(true)),
        };
        assert!(meta.is_deprecated());
    }

    #[test]
    fn test_package_metadata_deserialization() {
        let payload = json!({
            "dist-tags": { "latest": "2.0.0", "next": "3.0.0-rc.1" },
            "versions": {
                "1.0.0": { "deprecated": "security issue" },
                "2.0.0": {}
            }
        });

        let meta: PackageMetadata = serde_json::from_value(payload).unwrap();
        assert_eq!(meta.dist_tags.latest, "2.0.0");
        assert!(meta.versions["1.0.0"].is_deprecated());
        assert!(!meta.versions["2.0.0"].is_deprecated());
    }
}

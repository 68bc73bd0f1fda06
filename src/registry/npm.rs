//! npm registry adapter
//!
//! Fetches package metadata from an npm-compatible registry.
//! API endpoint: {registry}/{package}

use crate::error::RegistryError;
use crate::registry::{HttpClient, PackageMetadata, Registry};
use async_trait::async_trait;

/// Default npm registry base URL
pub const NPM_REGISTRY_URL: &str = "https://registry.npmjs.org/";

/// npm registry adapter
pub struct NpmRegistry {
    client: HttpClient,
    base_url: String,
}

impl NpmRegistry {
    /// Create an adapter against a registry base URL
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Build the packument URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), package)
    }
}

#[async_trait]
impl Registry for NpmRegistry {
    fn name(&self) -> &'static str {
        "npm"
    }

    async fn fetch_metadata(&self, package: &str) -> Result<PackageMetadata, RegistryError> {
        let url = self.build_url(package);
        self.client.get_json(&url, package, self.name()).await
    }
}

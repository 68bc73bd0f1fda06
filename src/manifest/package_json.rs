//! package.json reading and dependency collection
//!
//! Handles:
//! - dependencies
//! - devDependencies
//! - peerDependencies
//! - optionalDependencies

use crate::domain::{Dependency, DEPENDENCY_TYPES};
use crate::error::ManifestError;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Read the manifest file, distinguishing a missing file from other IO
/// failures so the CLI can word it helpfully.
pub fn read_manifest(path: &Path) -> Result<String, ManifestError> {
    if !path.exists() {
        return Err(ManifestError::not_found(path));
    }
    fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))
}

/// Collect dependency entries from the manifest, in section scan order.
///
/// Non-string range values and unknown sections are ignored. When `filters`
/// is non-empty only the named packages are kept; a filter that matches
/// nothing is silently inert, matching how package name typos surface as an
/// empty report rather than an error.
pub fn collect_dependencies(
    content: &str,
    path: &Path,
    filters: &[String],
) -> Result<Vec<Dependency>, ManifestError> {
    let json: Value = serde_json::from_str(content)
        .map_err(|e| ManifestError::json_parse_error(path, e.to_string()))?;

    let mut dependencies = Vec::new();

    for dep_type in DEPENDENCY_TYPES {
        let Some(section) = json.get(dep_type.manifest_key()).and_then(|v| v.as_object()) else {
            continue;
        };
        for (name, range_value) in section {
            if !filters.is_empty() && !filters.iter().any(|f| f == name) {
                continue;
            }
            if let Some(range) = range_value.as_str() {
                dependencies.push(Dependency::new(name.clone(), dep_type, range));
            }
        }
    }

    Ok(dependencies)
}

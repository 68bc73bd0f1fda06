//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ParseError: malformed version or range text (always recoverable,
//!   surfaces as a per-dependency status, never fatal to a run)
//! - RegistryError: npm registry communication failures (per-dependency)
//! - ManifestError: manifest reading, backup and write-back failures
//!
//! Per-dependency failures are collected by the checker, never propagated
//! past it; only manifest-level failures abort anything, and then only the
//! write-back step.

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Errors from parsing version or range text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Version text does not match `major.minor.patch[-pre][+build]`
    #[error("malformed version '{text}': {message}")]
    MalformedVersion { text: String, message: String },

    /// A range base component is neither a number nor a wildcard
    #[error("malformed range component '{token}'")]
    MalformedRangeComponent { token: String },

    /// The range as a whole has no recognizable shape
    #[error("malformed range '{text}'")]
    MalformedRange { text: String },
}

impl ParseError {
    pub fn malformed_version(text: impl Into<String>, message: impl Into<String>) -> Self {
        ParseError::MalformedVersion {
            text: text.into(),
            message: message.into(),
        }
    }

    pub fn malformed_range_component(token: impl Into<String>) -> Self {
        ParseError::MalformedRangeComponent {
            token: token.into(),
        }
    }

    pub fn malformed_range(text: impl Into<String>) -> Self {
        ParseError::MalformedRange { text: text.into() }
    }
}

/// Errors related to npm registry communication
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Package not found in the registry
    #[error("package '{package}' not found in {registry} registry")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Request exceeded the configured timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },

    /// Response body could not be decoded
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },
}

impl RegistryError {
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }

    pub fn invalid_response(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("there isn't a {path} file under this directory")]
    NotFound { path: PathBuf },

    /// Failed to read the manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the manifest file back
    #[error("failed to write manifest file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the backup copy; write-back is skipped entirely
    #[error("failed to write backup file {path}: {source}")]
    BackupError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("failed to parse {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },

    /// The dependency entry could not be located for patching
    #[error("could not patch '{name}' in {section}: entry not found")]
    PatchTargetNotFound { name: String, section: String },
}

impl ManifestError {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    pub fn backup_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::BackupError {
            path: path.into(),
            source,
        }
    }

    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn patch_target_not_found(name: impl Into<String>, section: impl Into<String>) -> Self {
        ManifestError::PatchTargetNotFound {
            name: name.into(),
            section: section.into(),
        }
    }
}

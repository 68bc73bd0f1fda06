//! npmup - npm dependency range checker and updater library
//!
//! This library provides the core functionality for checking package.json
//! dependency ranges against the npm registry:
//! - Semantic version values and npm range grammar (`semver`)
//! - Style-preserving range edits
//! - Concurrent registry resolution with rate limiting (`checker`)
//! - Format-preserving manifest patching with backups (`manifest`)

pub mod checker;
pub mod cli;
pub mod domain;
pub mod error;
pub mod limiter;
pub mod manifest;
pub mod output;
pub mod progress;
pub mod registry;
pub mod semver;
pub mod update;

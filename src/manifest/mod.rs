//! package.json reading, dependency collection and patching
//!
//! This module provides:
//! - Manifest reading with a friendly not-found message
//! - Dependency collection across all four dependency sections
//! - Format-preserving range patching scoped to the declaring section
//! - Backup file creation before any write-back

mod package_json;
mod writer;

pub use package_json::{collect_dependencies, read_manifest};
pub use writer::{
    backup_path, patch_manifest, update_manifest, write_backup, write_manifest, RangePatch,
};

//! Core domain models for npmup
//!
//! This module contains the fundamental types used throughout the
//! application:
//! - Dependency sections and entries from package.json
//! - Per-dependency resolution status

mod dependency;

pub use dependency::{CheckStatus, Dependency, DependencyType, DEPENDENCY_TYPES};

//! Semantic version values, range grammar and the range-update algebra
//!
//! Everything in this module is pure and synchronous: no shared mutable
//! state, safe to call from any number of concurrent resolution tasks.

pub mod range;
pub mod range_base;
pub mod version;
pub mod wildcard;

pub use range::{normalize_range, Range, RangeEdit, UnaryOp};
pub use range_base::{
    format_range_base, update_range_base, ChangedField, RangeBase, RangeBaseUpdate,
    UpdateDirection,
};
pub use version::{compare_prerelease, Identifier, Part, VersionParts};
pub use wildcard::FieldValue;

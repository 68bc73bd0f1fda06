//! Range base fragments and the range-update algebra
//!
//! A [`RangeBase`] is one dotted version-like fragment inside a range
//! (`1.2.3-rc.1+build`, `1.2`, `1.x`), with optional precision and wildcard
//! support. [`update_range_base`] computes the least-disruptive edit of a
//! base that makes it cover a target version: it finds the shallowest
//! diverging field and overrides that field and everything after it with the
//! target's values, leaving earlier fields and the declared precision
//! untouched. Untouched bases re-serialize byte-identical to their input;
//! downstream display logic relies on that identity.

use crate::error::ParseError;
use crate::semver::version::{
    compare_prerelease, diverge_prerelease, Identifier, Part, VersionParts, PARTS,
};
use crate::semver::wildcard::FieldValue;
use std::cmp::Ordering;
use std::fmt::Write as _;

/// One dotted fragment of a range, parsed with lazy precision.
///
/// `include_minor == false` means no minor token was present in the source
/// text; the `minor` field is then a placeholder and must not be consulted.
/// Same for `include_patch`. Values are never mutated in place; the algebra
/// clones before overriding so that computed update candidates never alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeBase {
    pub major: FieldValue,
    pub minor: FieldValue,
    pub include_minor: bool,
    pub patch: FieldValue,
    pub include_patch: bool,
    pub prerelease: Vec<Identifier>,
    pub include_prerelease: bool,
    pub build: Vec<String>,
}

/// Identifier charset accepted for prerelease and build segments.
fn valid_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

impl RangeBase {
    /// Parse one fragment: `major[.minor[.patch]][-prerelease][+build]`.
    ///
    /// Build metadata is split off first because it may itself contain
    /// hyphens; only then is the remainder split on its first hyphen for the
    /// prerelease suffix. Prerelease and build segments that fail the
    /// identifier charset are silently dropped, mirroring how loose
    /// real-world manifest ranges are treated.
    pub fn parse(fragment: &str) -> Result<Self, ParseError> {
        let (rest, build_raw) = match fragment.split_once('+') {
            Some((rest, build)) => (rest, Some(build)),
            None => (fragment, None),
        };
        let (main, prerelease_raw) = match rest.split_once('-') {
            Some((main, pre)) => (main, Some(pre)),
            None => (rest, None),
        };

        if main.is_empty() {
            return Err(ParseError::malformed_range(fragment));
        }

        let mut parts = main.split('.');
        // split always yields at least one token
        let major = FieldValue::parse(parts.next().unwrap_or_default())?;

        let mut minor = FieldValue::Number(0);
        let mut include_minor = false;
        if let Some(token) = parts.next() {
            minor = FieldValue::parse(token)?;
            include_minor = true;
        }

        let mut patch = FieldValue::Number(0);
        let mut include_patch = false;
        if let Some(token) = parts.next() {
            patch = FieldValue::parse(token)?;
            include_patch = true;
        }

        let mut prerelease = Vec::new();
        let mut include_prerelease = false;
        if let Some(raw) = prerelease_raw {
            prerelease = raw
                .split('.')
                .filter(|s| valid_identifier(s))
                .map(Identifier::classify)
                .collect();
            include_prerelease = true;
        }

        let mut build = Vec::new();
        if let Some(raw) = build_raw {
            build = raw
                .split('.')
                .filter(|s| valid_identifier(s))
                .map(str::to_string)
                .collect();
        }

        Ok(Self {
            major,
            minor,
            include_minor,
            patch,
            include_patch,
            prerelease,
            include_prerelease,
            build,
        })
    }

    /// The minimum concrete version this base admits: wildcards and missing
    /// components resolve to zero, a declared prerelease suffix is kept.
    pub fn floor(&self) -> VersionParts {
        VersionParts {
            major: self.major.floor(),
            minor: if self.include_minor {
                self.minor.floor()
            } else {
                0
            },
            patch: if self.include_patch {
                self.patch.floor()
            } else {
                0
            },
            prerelease: if self.include_prerelease {
                self.prerelease.clone()
            } else {
                Vec::new()
            },
            build: Vec::new(),
        }
    }

    /// True if the declared prerelease suffix survived parsing.
    pub fn names_prerelease(&self) -> bool {
        self.include_prerelease && !self.prerelease.is_empty()
    }

    /// Clone this base, overriding `part` and every field after it with the
    /// target's values. Declared precision (`include_minor`/`include_patch`)
    /// is preserved so the edit stays minimal.
    pub fn override_from(&self, target: &VersionParts, part: Part) -> RangeBase {
        let mut updated = self.clone();
        let pos = part.index();

        for p in PARTS.iter().filter(|p| p.index() >= pos) {
            match p {
                Part::Major => updated.major = FieldValue::Number(target.major),
                Part::Minor => updated.minor = FieldValue::Number(target.minor),
                Part::Patch => updated.patch = FieldValue::Number(target.patch),
                Part::Prerelease => {
                    updated.prerelease = target.prerelease.clone();
                    updated.include_prerelease = !target.prerelease.is_empty();
                }
                Part::Build => updated.build = target.build.clone(),
            }
        }

        updated
    }
}

/// Re-serialize a base exactly as it was declared: segments appear only when
/// the corresponding precision flag is set, wildcards keep their character.
pub fn format_range_base(base: &RangeBase) -> String {
    let mut out = String::new();
    let _ = write!(out, "{}", base.major);
    if base.include_minor {
        let _ = write!(out, ".{}", base.minor);
    }
    if base.include_patch {
        let _ = write!(out, ".{}", base.patch);
    }
    if base.names_prerelease() {
        let joined: Vec<String> = base.prerelease.iter().map(|i| i.to_string()).collect();
        let _ = write!(out, "-{}", joined.join("."));
    }
    if !base.build.is_empty() {
        let _ = write!(out, "+{}", base.build.join("."));
    }
    out
}

/// Direction of a computed range edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateDirection {
    /// The range already covers the target; output equals input.
    Unchanged,
    /// The target lies beyond the declared range (the usual bump).
    Forward,
    /// The declared range floor exceeds the target (downgrade correction,
    /// e.g. after a release is unpublished or deprecated).
    Backward,
}

impl UpdateDirection {
    pub fn signum(self) -> i8 {
        match self {
            UpdateDirection::Unchanged => 0,
            UpdateDirection::Forward => 1,
            UpdateDirection::Backward => -1,
        }
    }
}

/// Which field a range edit touched first, for display highlighting.
/// For a prerelease edit, `pre_index` is the first diverging identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangedField {
    pub part: Part,
    pub pre_index: usize,
}

impl ChangedField {
    fn at(part: Part) -> Self {
        Self { part, pre_index: 0 }
    }
}

/// Result of [`update_range_base`].
#[derive(Debug, Clone)]
pub struct RangeBaseUpdate {
    pub direction: UpdateDirection,
    pub changed: Option<ChangedField>,
    pub base: RangeBase,
    pub text: String,
}

impl RangeBaseUpdate {
    pub fn is_changed(&self) -> bool {
        self.direction != UpdateDirection::Unchanged
    }

    fn unchanged(base: &RangeBase) -> Self {
        Self {
            direction: UpdateDirection::Unchanged,
            changed: None,
            base: base.clone(),
            text: format_range_base(base),
        }
    }

    fn changed(base: RangeBase, changed: ChangedField, direction: UpdateDirection) -> Self {
        let text = format_range_base(&base);
        Self {
            direction,
            changed: Some(changed),
            base,
            text,
        }
    }
}

fn direction_of(from: u64, to: u64) -> UpdateDirection {
    if from > to {
        UpdateDirection::Backward
    } else {
        UpdateDirection::Forward
    }
}

/// Compute the least-disruptive edit of `base` that makes it name `target`.
///
/// Fields are examined top-down (major, minor, patch, prerelease); the first
/// divergence is overridden together with everything after it, and earlier
/// fields are never modified. A wildcard absorbs: once a field is a
/// wildcard, the base already matches any value there and below, so the
/// result is unchanged. Prerelease divergence is only considered when the
/// caller opts in and the base declares a prerelease suffix.
pub fn update_range_base(
    base: &RangeBase,
    target: &VersionParts,
    prerelease: bool,
) -> RangeBaseUpdate {
    if base.major.is_wildcard() {
        return RangeBaseUpdate::unchanged(base);
    }
    if !base.major.is_number(target.major) {
        let updated = base.override_from(target, Part::Major);
        return RangeBaseUpdate::changed(
            updated,
            ChangedField::at(Part::Major),
            direction_of(base.major.floor(), target.major),
        );
    }

    if base.include_minor {
        if base.minor.is_wildcard() {
            return RangeBaseUpdate::unchanged(base);
        }
        if !base.minor.is_number(target.minor) {
            let updated = base.override_from(target, Part::Minor);
            return RangeBaseUpdate::changed(
                updated,
                ChangedField::at(Part::Minor),
                direction_of(base.minor.floor(), target.minor),
            );
        }

        if base.include_patch {
            if base.patch.is_wildcard() {
                return RangeBaseUpdate::unchanged(base);
            }
            if !base.patch.is_number(target.patch) {
                let updated = base.override_from(target, Part::Patch);
                return RangeBaseUpdate::changed(
                    updated,
                    ChangedField::at(Part::Patch),
                    direction_of(base.patch.floor(), target.patch),
                );
            }
        }
    }

    if prerelease && base.include_prerelease {
        // Precedence order (a release outranks its prereleases) decides the
        // direction; the pairwise walk only supplies the highlight index.
        let ord = compare_prerelease(&base.prerelease, &target.prerelease);
        let (_, index) = diverge_prerelease(&base.prerelease, &target.prerelease);
        if ord != Ordering::Equal {
            let updated = base.override_from(target, Part::Prerelease);
            let direction = if ord == Ordering::Greater {
                UpdateDirection::Backward
            } else {
                UpdateDirection::Forward
            };
            return RangeBaseUpdate::changed(
                updated,
                ChangedField {
                    part: Part::Prerelease,
                    pre_index: index,
                },
                direction,
            );
        }
    }

    RangeBaseUpdate::unchanged(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(fragment: &str) -> RangeBase {
        RangeBase::parse(fragment).unwrap()
    }

    fn version(text: &str) -> VersionParts {
        VersionParts::parse(text).unwrap()
    }

    #[test]
    fn test_parse_full_precision() {
        let b = base("1.2.3");
        assert_eq!(b.major, FieldValue::Number(1));
        assert_eq!(b.minor, FieldValue::Number(2));
        assert!(b.include_minor);
        assert_eq!(b.patch, FieldValue::Number(3));
        assert!(b.include_patch);
        assert!(!b.include_prerelease);
    }

    #[test]
    fn test_parse_partial_precision() {
        let b = base("1.2");
        assert!(b.include_minor);
        assert!(!b.include_patch);

        let b = base("1");
        assert!(!b.include_minor);
        assert!(!b.include_patch);
    }

    #[test]
    fn test_parse_explicit_zero_is_included() {
        // a written `0` counts as present; absence is a separate state
        let b = base("1.0");
        assert!(b.include_minor);
        assert_eq!(b.minor, FieldValue::Number(0));
    }

    #[test]
    fn test_parse_wildcards() {
        let b = base("1.x.3");
        assert_eq!(b.minor, FieldValue::Wildcard('x'));
        assert_eq!(b.patch, FieldValue::Number(3));

        let b = base("*");
        assert_eq!(b.major, FieldValue::Wildcard('*'));
    }

    #[test]
    fn test_parse_prerelease_and_build() {
        let b = base("1.2.3-rc.1+build.7");
        assert!(b.include_prerelease);
        assert_eq!(
            b.prerelease,
            vec![
                Identifier::Alphanumeric("rc".to_string()),
                Identifier::Numeric(1)
            ]
        );
        assert_eq!(b.build, vec!["build".to_string(), "7".to_string()]);
    }

    #[test]
    fn test_parse_build_with_hyphen_isolated_first() {
        // build metadata may contain hyphens; it must not leak into the
        // prerelease split
        let b = base("1.2.3+linux-x64");
        assert!(!b.include_prerelease);
        assert_eq!(b.build, vec!["linux-x64".to_string()]);
    }

    #[test]
    fn test_parse_drops_invalid_identifiers() {
        let b = base("1.2.3-rc.!!.2");
        assert_eq!(
            b.prerelease,
            vec![
                Identifier::Alphanumeric("rc".to_string()),
                Identifier::Numeric(2)
            ]
        );
    }

    #[test]
    fn test_parse_rejects_garbage_components() {
        assert!(RangeBase::parse("1.two.3").is_err());
        assert!(RangeBase::parse("").is_err());
        assert!(RangeBase::parse("-rc.1").is_err());
    }

    #[test]
    fn test_format_round_trip() {
        for fragment in [
            "1.2.3",
            "1.2",
            "1",
            "1.x",
            "*",
            "0.0.0",
            "1.2.3-rc.1",
            "1.2.3-rc.1+build",
            "1.X.3",
        ] {
            assert_eq!(format_range_base(&base(fragment)), *fragment);
        }
    }

    #[test]
    fn test_parse_format_parse_idempotent() {
        for fragment in ["1.2.3", "1.x", "2", "1.2.3-beta.2"] {
            let once = format_range_base(&base(fragment));
            let twice = format_range_base(&base(&once));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_floor() {
        assert_eq!(base("1.2").floor(), version("1.2.0"));
        assert_eq!(base("1.x.3").floor(), version("1.0.0"));
        assert_eq!(base("1.2.3-rc.1").floor(), version("1.2.3-rc.1"));
    }

    #[test]
    fn test_override_keeps_precision() {
        let b = base("1.2");
        let updated = b.override_from(&version("2.5.9"), Part::Major);
        assert_eq!(format_range_base(&updated), "2.5");
    }

    #[test]
    fn test_override_does_not_alias() {
        let b = base("1.2.3");
        let updated = b.override_from(&version("2.0.0"), Part::Major);
        assert_eq!(format_range_base(&b), "1.2.3");
        assert_eq!(format_range_base(&updated), "2.0.0");
    }

    #[test]
    fn test_update_minor_bump() {
        let result = update_range_base(&base("1.2.3"), &version("1.5.0"), false);
        assert_eq!(result.direction, UpdateDirection::Forward);
        assert_eq!(result.text, "1.5.0");
        assert_eq!(result.changed.unwrap().part, Part::Minor);
    }

    #[test]
    fn test_update_major_bump() {
        let result = update_range_base(&base("1.2.3"), &version("2.0.1"), false);
        assert_eq!(result.direction, UpdateDirection::Forward);
        assert_eq!(result.text, "2.0.1");
        assert_eq!(result.changed.unwrap().part, Part::Major);
    }

    #[test]
    fn test_update_patch_bump() {
        let result = update_range_base(&base("2.0.3"), &version("2.0.9"), false);
        assert_eq!(result.direction, UpdateDirection::Forward);
        assert_eq!(result.text, "2.0.9");
        assert_eq!(result.changed.unwrap().part, Part::Patch);
    }

    #[test]
    fn test_update_downgrade_direction() {
        let result = update_range_base(&base("3.0.0"), &version("2.9.0"), false);
        assert_eq!(result.direction, UpdateDirection::Backward);
        assert_eq!(result.text, "2.9.0");
    }

    #[test]
    fn test_update_no_divergence_round_trips() {
        let result = update_range_base(&base("2.0.9"), &version("2.0.9"), false);
        assert_eq!(result.direction, UpdateDirection::Unchanged);
        assert!(result.changed.is_none());
        assert_eq!(result.text, "2.0.9");
    }

    #[test]
    fn test_update_wildcard_major_absorbs() {
        for target in ["0.0.1", "9.9.9", "2.0.0-rc.1"] {
            let result = update_range_base(&base("*"), &version(target), true);
            assert_eq!(result.direction, UpdateDirection::Unchanged);
            assert_eq!(result.text, "*");
        }
    }

    #[test]
    fn test_update_wildcard_minor_absorbs() {
        let result = update_range_base(&base("1.x"), &version("1.9.0"), false);
        assert_eq!(result.direction, UpdateDirection::Unchanged);
        assert_eq!(result.text, "1.x");
    }

    #[test]
    fn test_update_partial_precision_preserved() {
        let result = update_range_base(&base("1.2"), &version("1.7.4"), false);
        assert_eq!(result.text, "1.7");
        assert_eq!(result.direction, UpdateDirection::Forward);
    }

    #[test]
    fn test_update_minimal_diff_leaves_earlier_fields() {
        // a patch-level divergence must not rewrite major or minor
        let result = update_range_base(&base("1.2.3"), &version("1.2.8"), false);
        assert_eq!(result.base.major, FieldValue::Number(1));
        assert_eq!(result.base.minor, FieldValue::Number(2));
        assert_eq!(result.changed.unwrap().part, Part::Patch);
    }

    #[test]
    fn test_update_prerelease_requires_opt_in() {
        let result = update_range_base(&base("1.2.3-rc.1"), &version("1.2.3-rc.2"), false);
        assert_eq!(result.direction, UpdateDirection::Unchanged);

        let result = update_range_base(&base("1.2.3-rc.1"), &version("1.2.3-rc.2"), true);
        assert_eq!(result.direction, UpdateDirection::Forward);
        assert_eq!(result.text, "1.2.3-rc.2");
        let changed = result.changed.unwrap();
        assert_eq!(changed.part, Part::Prerelease);
        assert_eq!(changed.pre_index, 1);
    }

    #[test]
    fn test_update_prerelease_to_release_drops_suffix() {
        let result = update_range_base(&base("1.2.3-rc.1"), &version("1.2.3"), true);
        assert_eq!(result.direction, UpdateDirection::Forward);
        assert_eq!(result.text, "1.2.3");
    }

    #[test]
    fn test_update_prerelease_backward() {
        let result = update_range_base(&base("1.2.3-rc.5"), &version("1.2.3-rc.2"), true);
        assert_eq!(result.direction, UpdateDirection::Backward);
    }
}

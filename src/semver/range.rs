//! Range grammar: classification, matching and style-preserving edits
//!
//! A range expression is one of three shapes: a unary-operator range
//! (`^1.2.3`, `>=1.0`, bare `1.2.3`), a hyphen range (`1.0.0 - 2.0.0`), or
//! a compound `||` range. Compound ranges are detected but deliberately not
//! decomposed: disjunctive ranges are too ambiguous to safely rewrite, so
//! they are surfaced to the caller unmodified.

use crate::error::ParseError;
use crate::semver::range_base::{
    format_range_base, update_range_base, RangeBase, RangeBaseUpdate, UpdateDirection,
};
use crate::semver::version::VersionParts;
use crate::semver::wildcard::{starts_range_base, FieldValue};

/// Unary range operators, in display form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// No operator: a bare version-like range, exact-floor for updates.
    Bare,
    Exact,
    Caret,
    Tilde,
    Greater,
    GreaterEq,
    Less,
    LessEq,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Bare => "",
            UnaryOp::Exact => "=",
            UnaryOp::Caret => "^",
            UnaryOp::Tilde => "~",
            UnaryOp::Greater => ">",
            UnaryOp::GreaterEq => ">=",
            UnaryOp::Less => "<",
            UnaryOp::LessEq => "<=",
        }
    }

    /// Operators that admit versions above their base, and are therefore
    /// worth searching for an in-range newer candidate. Bare, exact and
    /// upper-bounded ranges are not upgradable within range by design.
    pub fn is_upgradable(self) -> bool {
        matches!(
            self,
            UnaryOp::Caret | UnaryOp::Tilde | UnaryOp::Greater | UnaryOp::GreaterEq
        )
    }
}

/// A parsed range expression.
///
/// Closed sum: every consumption site matches exhaustively so a new shape
/// becomes a compile-time review point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Range {
    Unary { op: UnaryOp, base: RangeBase },
    Hyphen { lower: RangeBase, upper: RangeBase },
    /// An OR-combination of ranges, kept opaque.
    Compound,
}

/// Remove spaces that merely pad an operator, so `>= 1.2.3` parses while
/// `1.0.0 - 2.0.0` keeps its hyphen separator intact. Equivalent to the
/// loose cleanup `(?<!-) (?![-=<>])`, written out because the regex crate
/// has no lookaround.
pub fn normalize_range(raw: &str) -> String {
    let chars: Vec<char> = raw.trim().chars().collect();
    let mut out = String::with_capacity(chars.len());

    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' {
            let after_hyphen = i > 0 && chars[i - 1] == '-';
            let before_op = matches!(chars.get(i + 1), Some('-' | '=' | '<' | '>'));
            if !after_hyphen && !before_op {
                continue;
            }
        }
        out.push(c);
    }

    out
}

impl Range {
    /// Parse a normalized range expression.
    ///
    /// Two or more `||`-joined segments short-circuit to [`Range::Compound`]
    /// without attempting component-level parsing. Anything with no
    /// recognizable shape (an empty string, an unknown leading character) is
    /// a parse failure, surfaced rather than coerced.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut segments = text.split("||");
        // split always yields at least one segment
        let first = segments.next().unwrap_or_default();
        if segments.next().is_some() {
            return Ok(Range::Compound);
        }

        Self::parse_segment(first)
    }

    /// Structural validity: every `||` segment must individually parse.
    /// Used as the up-front range check before resolution; compound
    /// detection happens separately so invalid segments inside an OR are
    /// still reported as invalid, not complex.
    pub fn is_valid(text: &str) -> bool {
        let segments: Vec<&str> = text.split("||").collect();
        segments
            .iter()
            .all(|segment| Self::parse_segment(segment.trim()).is_ok())
    }

    fn parse_segment(segment: &str) -> Result<Self, ParseError> {
        let sides: Vec<&str> = segment.split(" - ").collect();
        if sides.len() == 2 {
            return Ok(Range::Hyphen {
                lower: RangeBase::parse(sides[0])?,
                upper: RangeBase::parse(sides[1])?,
            });
        }

        // Two-character comparators before one-character ones.
        let (op, rest) = if let Some(rest) = segment.strip_prefix(">=") {
            (UnaryOp::GreaterEq, rest)
        } else if let Some(rest) = segment.strip_prefix("<=") {
            (UnaryOp::LessEq, rest)
        } else if let Some(rest) = segment.strip_prefix('^') {
            (UnaryOp::Caret, rest)
        } else if let Some(rest) = segment.strip_prefix('~') {
            (UnaryOp::Tilde, rest)
        } else if let Some(rest) = segment.strip_prefix('>') {
            (UnaryOp::Greater, rest)
        } else if let Some(rest) = segment.strip_prefix('<') {
            (UnaryOp::Less, rest)
        } else if let Some(rest) = segment.strip_prefix('=') {
            (UnaryOp::Exact, rest)
        } else if segment.chars().next().is_some_and(starts_range_base) {
            (UnaryOp::Bare, segment)
        } else {
            return Err(ParseError::malformed_range(segment));
        };

        Ok(Range::Unary {
            op,
            base: RangeBase::parse(rest)?,
        })
    }

    /// Minimum version admitted by the range, if the shape exposes one.
    pub fn floor(&self) -> Option<VersionParts> {
        match self {
            Range::Unary { base, .. } => Some(base.floor()),
            Range::Hyphen { lower, .. } => Some(lower.floor()),
            Range::Compound => None,
        }
    }

    /// True if the declared text names a prerelease, which implies
    /// prerelease inclusion for this dependency. Either hyphen bound
    /// suffices.
    pub fn names_prerelease(&self) -> bool {
        match self {
            Range::Unary { base, .. } => base.names_prerelease(),
            Range::Hyphen { lower, upper } => lower.names_prerelease() || upper.names_prerelease(),
            Range::Compound => false,
        }
    }

    /// True for shapes whose in-range newer candidate is worth computing.
    pub fn is_upgradable(&self) -> bool {
        match self {
            Range::Unary { op, .. } => op.is_upgradable(),
            Range::Hyphen { .. } => true,
            Range::Compound => false,
        }
    }

    /// Whether `version` satisfies this range.
    ///
    /// Caret and tilde follow npm semantics including the 0.x narrowing
    /// rules; hyphen upper bounds with partial precision are exclusive of
    /// the next increment (`1.0.0 - 2.0` admits up to but not including
    /// `2.1.0`). Prerelease eligibility is the caller's concern: the
    /// pipeline filters prereleases out before consulting this unless
    /// inclusion is in effect.
    pub fn satisfies(&self, version: &VersionParts) -> bool {
        match self {
            Range::Unary { op, base } => {
                let floor = base.floor();
                match op {
                    UnaryOp::Bare | UnaryOp::Exact => matches_exact(base, version),
                    UnaryOp::Caret => {
                        *version >= floor && below_upper(version, caret_upper(base))
                    }
                    UnaryOp::Tilde => {
                        *version >= floor && below_upper(version, tilde_upper(base))
                    }
                    UnaryOp::Greater => greater_admits(base, version),
                    UnaryOp::GreaterEq => *version >= floor,
                    UnaryOp::Less => *version < floor,
                    UnaryOp::LessEq => *version <= floor,
                }
            }
            Range::Hyphen { lower, upper } => {
                if *version < lower.floor() {
                    return false;
                }
                hyphen_admits_upper(upper, version)
            }
            Range::Compound => false,
        }
    }

    /// Style-preserving edit making the range include `target`, applied to
    /// the base (unary) or the relevant bound (hyphen). Compound ranges are
    /// never edited.
    pub fn update_toward(&self, target: &VersionParts, prerelease: bool) -> Option<RangeEdit> {
        match self {
            Range::Unary { op, base } => {
                let update = update_range_base(base, target, prerelease);
                Some(RangeEdit::new(op.as_str().to_string(), update))
            }
            Range::Hyphen { lower, upper } => {
                if *target < lower.floor() {
                    let update = update_range_base(lower, target, prerelease);
                    let suffix = format!(" - {}", format_range_base(upper));
                    return Some(RangeEdit::with_suffix(String::new(), update, suffix));
                }
                if !hyphen_admits_upper(upper, target) {
                    let update = update_range_base(upper, target, prerelease);
                    let prefix = format!("{} - ", format_range_base(lower));
                    return Some(RangeEdit::new(prefix, update));
                }
                // already inside the range
                let update = update_range_base(upper, &upper.floor(), prerelease);
                let prefix = format!("{} - ", format_range_base(lower));
                Some(RangeEdit::new(prefix, update))
            }
            Range::Compound => None,
        }
    }

    /// Serialize the range back to its declared text.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Range::Unary { op, base } => Some(format!("{}{}", op.as_str(), format_range_base(base))),
            Range::Hyphen { lower, upper } => Some(format!(
                "{} - {}",
                format_range_base(lower),
                format_range_base(upper)
            )),
            Range::Compound => None,
        }
    }
}

/// A computed edit of a whole range expression. The unedited surroundings
/// (operator, or the untouched hyphen bound) live in `prefix`/`suffix`;
/// `update` holds the edited base with its highlight metadata.
#[derive(Debug, Clone)]
pub struct RangeEdit {
    pub prefix: String,
    pub update: RangeBaseUpdate,
    pub suffix: String,
}

impl RangeEdit {
    fn new(prefix: String, update: RangeBaseUpdate) -> Self {
        Self::with_suffix(prefix, update, String::new())
    }

    fn with_suffix(prefix: String, update: RangeBaseUpdate, suffix: String) -> Self {
        Self {
            prefix,
            update,
            suffix,
        }
    }

    pub fn direction(&self) -> UpdateDirection {
        self.update.direction
    }

    pub fn is_changed(&self) -> bool {
        self.update.is_changed()
    }

    /// Full updated range text.
    pub fn text(&self) -> String {
        format!("{}{}{}", self.prefix, self.update.text, self.suffix)
    }
}

/// Exact-floor matching with wildcard/missing components as don't-care.
fn matches_exact(base: &RangeBase, version: &VersionParts) -> bool {
    if !field_matches(base.major, version.major) {
        return false;
    }
    if base.include_minor && !field_matches(base.minor, version.minor) {
        return false;
    }
    if base.include_patch && !field_matches(base.patch, version.patch) {
        return false;
    }
    if base.include_prerelease {
        return base.prerelease == version.prerelease;
    }
    version.prerelease.is_empty()
}

fn field_matches(field: FieldValue, value: u64) -> bool {
    match field {
        FieldValue::Wildcard(_) => true,
        FieldValue::Number(n) => n == value,
    }
}

fn triple(major: u64, minor: u64, patch: u64) -> VersionParts {
    VersionParts {
        major,
        minor,
        patch,
        prerelease: Vec::new(),
        build: Vec::new(),
    }
}

/// Exclusive caret upper bound, `None` when unbounded (wildcard major, or
/// a component at the numeric ceiling with no next increment).
fn caret_upper(base: &RangeBase) -> Option<VersionParts> {
    let major = match base.major {
        FieldValue::Wildcard(_) => return None,
        FieldValue::Number(n) => n,
    };
    if major > 0 {
        return major.checked_add(1).map(|m| triple(m, 0, 0));
    }

    // 0.x caret rules: the leftmost nonzero concrete component is fixed
    match (base.include_minor, base.minor) {
        (true, FieldValue::Number(minor)) if minor > 0 => {
            minor.checked_add(1).map(|m| triple(0, m, 0))
        }
        (true, FieldValue::Number(_)) => match (base.include_patch, base.patch) {
            (true, FieldValue::Number(patch)) => patch.checked_add(1).map(|p| triple(0, 0, p)),
            _ => Some(triple(0, 1, 0)),
        },
        (true, FieldValue::Wildcard(_)) | (false, _) => Some(triple(1, 0, 0)),
    }
}

/// Exclusive tilde upper bound: next minor when minor is concrete, next
/// major otherwise.
fn tilde_upper(base: &RangeBase) -> Option<VersionParts> {
    let major = match base.major {
        FieldValue::Wildcard(_) => return None,
        FieldValue::Number(n) => n,
    };
    match (base.include_minor, base.minor) {
        (true, FieldValue::Number(minor)) => minor.checked_add(1).map(|m| triple(major, m, 0)),
        _ => major.checked_add(1).map(|m| triple(m, 0, 0)),
    }
}

/// `>` bound: strict comparison at full precision; a partial-precision
/// bound is exclusive of everything below its next increment, so `>1.2`
/// admits from `1.3.0` and `>1` from `2.0.0`, matching npm.
fn greater_admits(base: &RangeBase, version: &VersionParts) -> bool {
    let major = match base.major {
        FieldValue::Wildcard(_) => return *version > base.floor(),
        FieldValue::Number(n) => n,
    };
    match (base.include_minor, base.minor) {
        (false, _) | (true, FieldValue::Wildcard(_)) => match major.checked_add(1) {
            Some(next) => *version >= triple(next, 0, 0),
            None => false,
        },
        (true, FieldValue::Number(minor)) => {
            if base.include_patch && !base.patch.is_wildcard() {
                return *version > base.floor();
            }
            match minor.checked_add(1) {
                Some(next) => *version >= triple(major, next, 0),
                None => false,
            }
        }
    }
}

fn below_upper(version: &VersionParts, upper: Option<VersionParts>) -> bool {
    match upper {
        Some(upper) => *version < upper,
        None => true,
    }
}

/// Hyphen upper bound: inclusive at full precision, exclusive of the next
/// increment when the bound is partial.
fn hyphen_admits_upper(upper: &RangeBase, version: &VersionParts) -> bool {
    let major = match upper.major {
        FieldValue::Wildcard(_) => return true,
        FieldValue::Number(n) => n,
    };
    match (upper.include_minor, upper.minor) {
        (false, _) | (true, FieldValue::Wildcard(_)) => match major.checked_add(1) {
            Some(next) => *version < triple(next, 0, 0),
            None => true,
        },
        (true, FieldValue::Number(minor)) => {
            if upper.include_patch && !upper.patch.is_wildcard() {
                return *version <= upper.floor();
            }
            match minor.checked_add(1) {
                Some(next) => *version < triple(major, next, 0),
                None => true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(text: &str) -> Range {
        Range::parse(text).unwrap()
    }

    fn v(text: &str) -> VersionParts {
        VersionParts::parse(text).unwrap()
    }

    #[test]
    fn test_parse_unary_operators() {
        for (text, op) in [
            ("^1.2.3", UnaryOp::Caret),
            ("~1.2.3", UnaryOp::Tilde),
            (">=1.2.3", UnaryOp::GreaterEq),
            ("<=1.2.3", UnaryOp::LessEq),
            (">1.2.3", UnaryOp::Greater),
            ("<1.2.3", UnaryOp::Less),
            ("=1.2.3", UnaryOp::Exact),
            ("1.2.3", UnaryOp::Bare),
            ("*", UnaryOp::Bare),
        ] {
            match range(text) {
                Range::Unary { op: parsed, .. } => assert_eq!(parsed, op, "{}", text),
                other => panic!("{} parsed as {:?}", text, other),
            }
        }
    }

    #[test]
    fn test_parse_two_char_operators_win() {
        // ">=1.2.3" must not parse as Greater with base "=1.2.3"
        match range(">=1.2.3") {
            Range::Unary { op, base } => {
                assert_eq!(op, UnaryOp::GreaterEq);
                assert_eq!(format_range_base(&base), "1.2.3");
            }
            other => panic!("parsed as {:?}", other),
        }
    }

    #[test]
    fn test_parse_hyphen() {
        match range("1.0.0 - 2.0.0") {
            Range::Hyphen { lower, upper } => {
                assert_eq!(format_range_base(&lower), "1.0.0");
                assert_eq!(format_range_base(&upper), "2.0.0");
            }
            other => panic!("parsed as {:?}", other),
        }
    }

    #[test]
    fn test_parse_compound_short_circuits() {
        assert_eq!(range("1.2.3 || 2.0.0"), Range::Compound);
        assert_eq!(range("^1 || ~2 || 3"), Range::Compound);
        // even with garbage segments, classification comes first
        assert_eq!(range("nonsense || more nonsense"), Range::Compound);
    }

    #[test]
    fn test_parse_failures_surface() {
        assert!(Range::parse("").is_err());
        assert!(Range::parse("abc").is_err());
        assert!(Range::parse("^").is_err());
        assert!(Range::parse(">=>1.0").is_err());
    }

    #[test]
    fn test_is_valid_checks_compound_segments() {
        assert!(Range::is_valid("1.2.3 || 2.0.0"));
        assert!(!Range::is_valid("1.2.3 || garbage"));
        assert!(!Range::is_valid(""));
    }

    #[test]
    fn test_normalize_range() {
        assert_eq!(normalize_range(">= 1.2.3"), ">=1.2.3");
        assert_eq!(normalize_range("^ 1.2.3"), "^1.2.3");
        assert_eq!(normalize_range("1.0.0 - 2.0.0"), "1.0.0 - 2.0.0");
        assert_eq!(normalize_range("  1.2.3  "), "1.2.3");
    }

    #[test]
    fn test_satisfies_caret() {
        let r = range("^1.2.3");
        assert!(r.satisfies(&v("1.2.3")));
        assert!(r.satisfies(&v("1.9.0")));
        assert!(!r.satisfies(&v("2.0.0")));
        assert!(!r.satisfies(&v("1.2.2")));
    }

    #[test]
    fn test_satisfies_caret_zero_major() {
        let r = range("^0.2.3");
        assert!(r.satisfies(&v("0.2.9")));
        assert!(!r.satisfies(&v("0.3.0")));

        let r = range("^0.0.3");
        assert!(r.satisfies(&v("0.0.3")));
        assert!(!r.satisfies(&v("0.0.4")));
    }

    #[test]
    fn test_satisfies_tilde() {
        let r = range("~2.0.0");
        assert!(r.satisfies(&v("2.0.9")));
        assert!(!r.satisfies(&v("2.1.0")));

        let r = range("~1");
        assert!(r.satisfies(&v("1.9.9")));
        assert!(!r.satisfies(&v("2.0.0")));
    }

    #[test]
    fn test_satisfies_comparators() {
        assert!(range(">=1.2.3").satisfies(&v("1.2.3")));
        assert!(!range(">1.2.3").satisfies(&v("1.2.3")));
        assert!(range(">1.2.3").satisfies(&v("1.2.4")));
        assert!(range("<2.0.0").satisfies(&v("1.9.9")));
        assert!(!range("<2.0.0").satisfies(&v("2.0.0")));
    }

    #[test]
    fn test_satisfies_greater_partial_precision() {
        // a partial `>` bound is exclusive of everything below the next
        // increment, like npm
        let r = range(">1.2");
        assert!(!r.satisfies(&v("1.2.1")));
        assert!(!r.satisfies(&v("1.2.9")));
        assert!(r.satisfies(&v("1.3.0")));

        let r = range(">1");
        assert!(!r.satisfies(&v("1.9.9")));
        assert!(r.satisfies(&v("2.0.0")));

        let r = range(">1.x");
        assert!(!r.satisfies(&v("1.9.9")));
        assert!(r.satisfies(&v("2.0.0")));

        let r = range(">1.2.x");
        assert!(!r.satisfies(&v("1.2.9")));
        assert!(r.satisfies(&v("1.3.0")));
    }

    #[test]
    fn test_satisfies_huge_components_do_not_overflow() {
        let max = u64::MAX;
        let r = range(&format!("^{}.0.0", max));
        assert!(r.satisfies(&v(&format!("{}.5.0", max))));

        let r = range(&format!("~{}", max));
        assert!(r.satisfies(&v(&format!("{}.9.9", max))));

        let r = range(&format!(">{}", max));
        assert!(!r.satisfies(&v(&format!("{}.9.9", max))));

        let r = range(&format!("1.0.0 - {}", max));
        assert!(r.satisfies(&v(&format!("{}.9.9", max))));
    }

    #[test]
    fn test_satisfies_bare_and_wildcard() {
        assert!(range("1.2.3").satisfies(&v("1.2.3")));
        assert!(!range("1.2.3").satisfies(&v("1.2.4")));
        assert!(range("1.2.x").satisfies(&v("1.2.9")));
        assert!(range("*").satisfies(&v("9.9.9")));
    }

    #[test]
    fn test_satisfies_hyphen() {
        let r = range("1.0.0 - 2.0.0");
        assert!(r.satisfies(&v("1.5.0")));
        assert!(r.satisfies(&v("2.0.0")));
        assert!(!r.satisfies(&v("2.0.1")));
        assert!(!r.satisfies(&v("0.9.9")));
    }

    #[test]
    fn test_satisfies_hyphen_partial_upper() {
        // partial upper bound is exclusive of the next increment
        let r = range("1.0.0 - 2.0");
        assert!(r.satisfies(&v("2.0.9")));
        assert!(!r.satisfies(&v("2.1.0")));
    }

    #[test]
    fn test_names_prerelease_either_hyphen_bound() {
        assert!(range("1.0.0-rc.1 - 2.0.0").names_prerelease());
        assert!(range("1.0.0 - 2.0.0-beta.1").names_prerelease());
        assert!(!range("1.0.0 - 2.0.0").names_prerelease());
        assert!(range("^1.0.0-rc.1").names_prerelease());
    }

    #[test]
    fn test_is_upgradable() {
        assert!(range("^1.2.3").is_upgradable());
        assert!(range("~1.2.3").is_upgradable());
        assert!(range(">=1.0.0").is_upgradable());
        assert!(range("1.0.0 - 2.0.0").is_upgradable());
        assert!(!range("1.2.3").is_upgradable());
        assert!(!range("=1.2.3").is_upgradable());
        assert!(!range("<=2.0.0").is_upgradable());
    }

    #[test]
    fn test_update_toward_unary_keeps_operator() {
        let edit = range("^1.2.3").update_toward(&v("1.5.0"), false).unwrap();
        assert_eq!(edit.text(), "^1.5.0");
        assert_eq!(edit.direction(), UpdateDirection::Forward);
    }

    #[test]
    fn test_update_toward_tilde_within_range_unchanged() {
        let edit = range("~2.0.0").update_toward(&v("2.0.9"), false).unwrap();
        assert_eq!(edit.direction(), UpdateDirection::Unchanged);
        assert_eq!(edit.text(), "~2.0.0");
    }

    #[test]
    fn test_update_toward_hyphen_upper() {
        let edit = range("1.0.0 - 2.0.0")
            .update_toward(&v("2.5.0"), false)
            .unwrap();
        assert_eq!(edit.text(), "1.0.0 - 2.5.0");
        assert_eq!(edit.direction(), UpdateDirection::Forward);
    }

    #[test]
    fn test_update_toward_hyphen_lower_downgrade() {
        let edit = range("1.0.0 - 2.0.0")
            .update_toward(&v("0.9.0"), false)
            .unwrap();
        assert_eq!(edit.text(), "0.9.0 - 2.0.0");
        assert_eq!(edit.direction(), UpdateDirection::Backward);
    }

    #[test]
    fn test_update_toward_hyphen_inside_unchanged() {
        let edit = range("1.0.0 - 2.0.0")
            .update_toward(&v("1.5.0"), false)
            .unwrap();
        assert_eq!(edit.direction(), UpdateDirection::Unchanged);
        assert_eq!(edit.text(), "1.0.0 - 2.0.0");
    }

    #[test]
    fn test_update_toward_compound_refused() {
        assert!(range("1 || 2").update_toward(&v("3.0.0"), false).is_none());
    }

    #[test]
    fn test_to_text_round_trip() {
        for text in ["^1.2.3", "~1.2", ">=1.0.0", "1.0.0 - 2.0.0", "1.x", "*"] {
            assert_eq!(range(text).to_text().unwrap(), *text);
        }
    }

    #[test]
    fn test_floor() {
        assert_eq!(range("^1.2.3").floor().unwrap(), v("1.2.3"));
        assert_eq!(range("1.0.0 - 2.0.0").floor().unwrap(), v("1.0.0"));
        assert!(range("1 || 2").floor().is_none());
    }
}

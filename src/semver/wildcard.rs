//! Wildcard-or-number field values for range bases

use crate::error::ParseError;
use std::fmt;

/// Characters accepted as a wildcard component.
pub const WILDCARD_CHARS: [char; 3] = ['*', 'x', 'X'];

/// One dotted component of a range base.
///
/// A wildcard keeps the character it was written with so that
/// re-serialization is byte-identical. `Number(0)` is a real value, distinct
/// from "unspecified" - absence is tracked by the `include_*` flags on
/// `RangeBase`, never by a sentinel here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    Wildcard(char),
    Number(u64),
}

impl FieldValue {
    /// Parse a component token: a wildcard character or an unsigned integer.
    pub fn parse(token: &str) -> Result<Self, ParseError> {
        let mut chars = token.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if WILDCARD_CHARS.contains(&c) {
                return Ok(FieldValue::Wildcard(c));
            }
        }
        token
            .parse::<u64>()
            .map(FieldValue::Number)
            .map_err(|_| ParseError::malformed_range_component(token))
    }

    pub fn is_wildcard(self) -> bool {
        matches!(self, FieldValue::Wildcard(_))
    }

    /// The numeric value, with wildcards treated as zero (range floor).
    pub fn floor(self) -> u64 {
        match self {
            FieldValue::Wildcard(_) => 0,
            FieldValue::Number(n) => n,
        }
    }

    /// True when this field equals a concrete number. Wildcards match
    /// nothing here; the caller decides whether a wildcard absorbs.
    pub fn is_number(self, n: u64) -> bool {
        self == FieldValue::Number(n)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Wildcard(c) => write!(f, "{}", c),
            FieldValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// True if the first character of a fragment can start a range base.
pub fn starts_range_base(c: char) -> bool {
    c.is_ascii_digit() || WILDCARD_CHARS.contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(FieldValue::parse("0").unwrap(), FieldValue::Number(0));
        assert_eq!(FieldValue::parse("42").unwrap(), FieldValue::Number(42));
    }

    #[test]
    fn test_parse_wildcards_keep_char() {
        for c in WILDCARD_CHARS {
            let parsed = FieldValue::parse(&c.to_string()).unwrap();
            assert_eq!(parsed, FieldValue::Wildcard(c));
            assert_eq!(parsed.to_string(), c.to_string());
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(FieldValue::parse("abc").is_err());
        assert!(FieldValue::parse("-1").is_err());
        assert!(FieldValue::parse("").is_err());
        assert!(FieldValue::parse("xx").is_err());
    }

    #[test]
    fn test_floor() {
        assert_eq!(FieldValue::Number(7).floor(), 7);
        assert_eq!(FieldValue::Wildcard('*').floor(), 0);
    }

    #[test]
    fn test_zero_is_not_wildcard() {
        assert!(!FieldValue::Number(0).is_wildcard());
        assert!(FieldValue::Wildcard('x').is_wildcard());
    }
}

//! Numeric conversion for the argv index control variable.

use crate::error::KeysafeError;

/// Parse an unsigned base-10 integer, `strtoul` style but strict.
///
/// The first byte must be a digit (no sign, no leading whitespace) and the
/// whole input must be consumed. Returns `None` on overflow.
#[must_use]
pub fn parse_decimal(s: &[u8]) -> Option<usize> {
    if !s.first().is_some_and(u8::is_ascii_digit) {
        return None;
    }

    let mut acc: usize = 0;
    for &b in s {
        if !b.is_ascii_digit() {
            return None;
        }
        acc = acc.checked_mul(10)?.checked_add(usize::from(b - b'0'))?;
    }
    Some(acc)
}

/// Validate the index control variable against `argc`.
///
/// Slot 0 holds the program name and is never eligible, so the result is
/// always in `1..argc`.
pub fn parse_arg_index(raw: &[u8], argc: usize) -> Result<usize, KeysafeError> {
    match parse_decimal(raw) {
        Some(index) if 0 < index && index < argc => Ok(index),
        _ => Err(KeysafeError::invalid_index(raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_basic() {
        assert_eq!(parse_decimal(b"0"), Some(0));
        assert_eq!(parse_decimal(b"7"), Some(7));
        assert_eq!(parse_decimal(b"007"), Some(7));
        assert_eq!(parse_decimal(b"4096"), Some(4096));
    }

    #[test]
    fn decimal_rejects_non_digits() {
        assert_eq!(parse_decimal(b""), None);
        assert_eq!(parse_decimal(b" 1"), None);
        assert_eq!(parse_decimal(b"+1"), None);
        assert_eq!(parse_decimal(b"-1"), None);
        assert_eq!(parse_decimal(b"1 "), None);
        assert_eq!(parse_decimal(b"12x"), None);
        assert_eq!(parse_decimal(b"0x10"), None);
    }

    #[test]
    fn decimal_overflow() {
        let max = usize::MAX.to_string();
        assert_eq!(parse_decimal(max.as_bytes()), Some(usize::MAX));
        let over = format!("{max}0");
        assert_eq!(parse_decimal(over.as_bytes()), None);
    }

    #[test]
    fn index_in_range() {
        assert_eq!(parse_arg_index(b"1", 2).unwrap(), 1);
        assert_eq!(parse_arg_index(b"3", 4).unwrap(), 3);
    }

    #[test]
    fn index_zero_rejected() {
        assert!(matches!(
            parse_arg_index(b"0", 4),
            Err(KeysafeError::InvalidIndex { .. })
        ));
    }

    #[test]
    fn index_at_or_past_argc_rejected() {
        assert!(parse_arg_index(b"4", 4).is_err());
        assert!(parse_arg_index(b"99", 4).is_err());
        assert!(parse_arg_index(b"1", 1).is_err());
        assert!(parse_arg_index(b"1", 0).is_err());
    }

    #[test]
    fn index_non_numeric_rejected() {
        let err = parse_arg_index(b"two", 4).unwrap_err();
        assert_eq!(err.to_string(), "Unable to parse argument index - two");
    }
}

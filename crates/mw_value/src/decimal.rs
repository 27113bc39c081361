use alloc::string::{String, ToString};
use core::fmt;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid decimal literal `{0}`")]
pub struct DecimalError(pub String);

/// An arbitrary-precision decimal number, kept as its literal text.
///
/// Accepts what Python's `decimal.Decimal` accepts from a string: an
/// optional sign, digits with an optional fraction and exponent, or one of
/// `Infinity`, `Inf`, `NaN`, `sNaN` in any case.
///
/// Equality is numeric: `1.0 == 1.00` and `-0 == 0`, while a NaN is equal
/// to nothing. The text is written out unchanged.
///
/// # Examples
///
/// ```
/// # use mw_value::Decimal;
/// let price = Decimal::parse("19.990").unwrap();
/// assert_eq!(price.as_str(), "19.990");
///
/// assert_eq!(price, Decimal::parse("1999e-2").unwrap());
/// assert!(Decimal::parse("1.2.3").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Decimal(String);

impl Decimal {
    pub fn parse(text: &str) -> Result<Self, DecimalError> {
        if is_decimal_literal(text) {
            Ok(Self(text.to_string()))
        } else {
            Err(DecimalError(text.to_string()))
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        match (Number::of(&self.0), Number::of(&other.0)) {
            (Some(Number::NaN), _) | (_, Some(Number::NaN)) => false,
            (Some(a), Some(b)) => a == b,
            // Exponents beyond `i64` are only compared as written.
            _ => self.0.eq_ignore_ascii_case(&other.0),
        }
    }
}

impl fmt::Display for Decimal {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// -----------------------------------------------------------------------------
// Number

/// The numeric value of a literal: `digits * 10^exponent` with no leading or
/// trailing zeros in `digits`. Zero has empty digits and no sign.
#[derive(Debug, PartialEq, Eq)]
enum Number {
    NaN,
    Infinity { negative: bool },
    Finite { negative: bool, digits: String, exponent: i64 },
}

impl Number {
    fn of(text: &str) -> Option<Self> {
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        if ["nan", "snan"].iter().any(|s| unsigned.eq_ignore_ascii_case(s)) {
            return Some(Self::NaN);
        }
        if ["inf", "infinity"].iter().any(|s| unsigned.eq_ignore_ascii_case(s)) {
            return Some(Self::Infinity { negative });
        }

        let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
            Some(index) => (&unsigned[..index], unsigned[index + 1..].parse::<i64>().ok()?),
            None => (unsigned, 0),
        };
        let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let frac_len = i64::try_from(frac_part.len()).ok()?;

        let all: String = [int_part, frac_part].concat();
        let trimmed = all.trim_start_matches('0');
        let significant = trimmed.trim_end_matches('0');
        let trailing = i64::try_from(trimmed.len() - significant.len()).ok()?;

        if significant.is_empty() {
            return Some(Self::Finite {
                negative: false,
                digits: String::new(),
                exponent: 0,
            });
        }
        Some(Self::Finite {
            negative,
            digits: significant.to_string(),
            exponent: exponent.checked_sub(frac_len)?.checked_add(trailing)?,
        })
    }
}

fn is_decimal_literal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);

    const SPECIAL: [&str; 4] = ["infinity", "inf", "nan", "snan"];
    if SPECIAL.iter().any(|s| unsigned.eq_ignore_ascii_case(s)) {
        return true;
    }

    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(index) => (&unsigned[..index], Some(&unsigned[index + 1..])),
        None => (unsigned, None),
    };

    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (mantissa, ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if int_part.is_empty() && frac_part.is_empty() {
        return false;
    }
    if !all_digits(int_part) || !all_digits(frac_part) {
        return false;
    }

    match exponent {
        None => true,
        Some(exp) => {
            let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !digits.is_empty() && all_digits(digits)
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Decimal;

    #[test]
    fn accepts() {
        for text in ["0", "-1.5", "+.5", "5.", "1e10", "1.25E-3", "NaN", "-Infinity", "sNaN"] {
            assert!(Decimal::parse(text).is_ok(), "{text}");
        }
    }

    #[test]
    fn numeric_equality() {
        let d = |text: &str| Decimal::parse(text).unwrap();
        assert_eq!(d("1.0"), d("1.00"));
        assert_eq!(d("1.5"), d("15e-1"));
        assert_eq!(d("-0"), d("0.000"));
        assert_eq!(d("100"), d("1E+2"));
        assert_eq!(d("Infinity"), d("inf"));
        assert_ne!(d("-Infinity"), d("Infinity"));
        assert_ne!(d("1.01"), d("1.1"));
        assert_ne!(d("-1"), d("1"));
        assert_ne!(d("NaN"), d("NaN"));
    }

    #[test]
    fn rejects() {
        for text in ["", ".", "-", "1e", "1.2.3", "abc", "1_000", " 1"] {
            assert!(Decimal::parse(text).is_err(), "{text}");
        }
    }
}

//! Python literal syntax for scalars.

use alloc::format;
use alloc::string::String;

/// `'text'` with Python's escaping rules.
///
/// Single quotes are used unless the text contains a single quote and no
/// double quote. Printable non-ASCII characters are written as they are.
pub(crate) fn str_literal(text: &str) -> String {
    let quote = pick_quote(text.contains('\''), text.contains('"'));

    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if is_printable(c) => out.push(c),
            c => {
                let code = c as u32;
                if code <= 0xff {
                    out.push_str(&format!("\\x{code:02x}"));
                } else if code <= 0xffff {
                    out.push_str(&format!("\\u{code:04x}"));
                } else {
                    out.push_str(&format!("\\U{code:08x}"));
                }
            }
        }
    }
    out.push(quote);
    out
}

/// `b'bytes'` with Python's escaping rules; everything outside printable ASCII is `\xNN`.
pub(crate) fn bytes_literal(bytes: &[u8]) -> String {
    let quote = pick_quote(bytes.contains(&b'\''), bytes.contains(&b'"'));

    let mut out = String::with_capacity(bytes.len() + 3);
    out.push('b');
    out.push(quote);
    for &byte in bytes {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b if char::from(b) == quote => {
                out.push('\\');
                out.push(quote);
            }
            0x20..=0x7e => out.push(char::from(byte)),
            _ => out.push_str(&format!("\\x{byte:02x}")),
        }
    }
    out.push(quote);
    out
}

/// The shortest text that reads back as the same `float`, in Python's `repr` format.
///
/// Non-finite values have no literal and are written as `float('inf')` and friends.
pub(crate) fn float_literal(value: f64) -> String {
    if value.is_nan() {
        return String::from("float('nan')");
    }
    if value.is_infinite() {
        return String::from(if value > 0.0 {
            "float('inf')"
        } else {
            "float('-inf')"
        });
    }

    // `{:e}` prints the shortest round-trip digits, e.g. `-1.2345e3`.
    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };

    if (-4..16).contains(&exponent) {
        let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
        let body = if exponent >= 0 {
            let int_len = exponent as usize + 1;
            if digits.len() <= int_len {
                format!("{digits:0<int_len$}.0")
            } else {
                format!("{}.{}", &digits[..int_len], &digits[int_len..])
            }
        } else {
            let zeros = (-exponent - 1) as usize;
            format!("0.{:0>width$}", digits, width = zeros + digits.len())
        };
        format!("{sign}{body}")
    } else {
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        format!("{sign}{mantissa}e{exp_sign}{:02}", exponent.unsigned_abs())
    }
}

fn pick_quote(has_single: bool, has_double: bool) -> char {
    if has_single && !has_double { '"' } else { '\'' }
}

fn is_printable(c: char) -> bool {
    !c.is_control() && (c == ' ' || !c.is_whitespace())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{bytes_literal, float_literal, str_literal};

    #[test]
    fn strings() {
        assert_eq!(str_literal("foobar"), "'foobar'");
        assert_eq!(str_literal("föobár"), "'föobár'");
        assert_eq!(str_literal("it's"), "\"it's\"");
        assert_eq!(str_literal("'\""), "'\\'\"'");
        assert_eq!(str_literal(r"^\w+$"), r"'^\\w+$'");
        assert_eq!(str_literal("a\nb\t\u{7}"), "'a\\nb\\t\\x07'");
        assert_eq!(str_literal("\u{a0}\u{2028}"), "'\\xa0\\u2028'");
    }

    #[test]
    fn bytes() {
        assert_eq!(bytes_literal(b"foobar"), "b'foobar'");
        assert_eq!(bytes_literal(b"it's"), "b\"it's\"");
        assert_eq!(bytes_literal(&[0, 0x7f, 0xff, b'\\']), "b'\\x00\\x7f\\xff\\\\'");
    }

    #[test]
    fn floats() {
        assert_eq!(float_literal(1.0), "1.0");
        assert_eq!(float_literal(-1.5), "-1.5");
        assert_eq!(float_literal(0.0), "0.0");
        assert_eq!(float_literal(-0.0), "-0.0");
        assert_eq!(float_literal(1234.5), "1234.5");
        assert_eq!(float_literal(0.001), "0.001");
        assert_eq!(float_literal(0.0001), "0.0001");
        assert_eq!(float_literal(0.00001), "1e-05");
        assert_eq!(float_literal(1e15), "1000000000000000.0");
        assert_eq!(float_literal(1e16), "1e+16");
        assert_eq!(float_literal(1.5e300), "1.5e+300");
        assert_eq!(float_literal(f64::INFINITY), "float('inf')");
        assert_eq!(float_literal(f64::NEG_INFINITY), "float('-inf')");
        assert_eq!(float_literal(f64::NAN), "float('nan')");
    }
}

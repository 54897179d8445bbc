//! Conversion of captured text into typed argument values.
//!
//! Integers are unbounded: the decimal text is normalized and kept as a
//! `serde_json::Number` (built with `arbitrary_precision`), so a 30-digit
//! ticket number is emitted exactly as written.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Number;
use thiserror::Error;

use crate::rules::ArgType;

/// Any Unicode decimal digit (`\p{Nd}`), the same class `\d` matches.
static DECIMAL_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d$").expect("static pattern"));

/// A coerced argument value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    Integer(Number),
    Str(String),
}

impl ArgValue {
    pub fn integer(value: i64) -> Self {
        ArgValue::Integer(Number::from(value))
    }
}

/// Failure to coerce a captured substring.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    #[error("`{raw}` is not a base-10 integer")]
    NotAnInteger { raw: String },
}

/// Coerce `raw` to the value type named by `tag`.
pub fn coerce(tag: ArgType, raw: &str) -> Result<ArgValue, CoerceError> {
    match tag {
        ArgType::Integer => parse_integer(raw)
            .map(ArgValue::Integer)
            .ok_or_else(|| CoerceError::NotAnInteger {
                raw: raw.to_string(),
            }),
        ArgType::String => Ok(ArgValue::Str(raw.to_string())),
    }
}

/// Parse a base-10 integer of any size.
///
/// Accepted: surrounding whitespace, one leading `+` or `-`, Unicode decimal
/// digits, and single underscores between digits.
fn parse_integer(raw: &str) -> Option<Number> {
    let text = raw.trim();
    let (negative, body) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if body.is_empty() || body.starts_with('_') || body.ends_with('_') || body.contains("__") {
        return None;
    }

    let mut digits = String::with_capacity(body.len() + 1);
    for ch in body.chars().filter(|&c| c != '_') {
        let value = decimal_value(ch)?;
        if digits.is_empty() && value == 0 {
            continue;
        }
        digits.push(char::from(b'0' + value));
    }

    if digits.is_empty() {
        digits.push('0');
    } else if negative {
        digits.insert(0, '-');
    }
    digits.parse().ok()
}

fn is_decimal_digit(ch: char) -> bool {
    let mut buf = [0u8; 4];
    DECIMAL_DIGIT.is_match(ch.encode_utf8(&mut buf))
}

/// Numeric value of a decimal digit in any script.
///
/// Decimal digits are encoded as contiguous runs of whole `0..=9` blocks,
/// so the offset from the start of the run gives the value.
fn decimal_value(ch: char) -> Option<u8> {
    if let Some(value) = ch.to_digit(10) {
        return u8::try_from(value).ok();
    }
    if !is_decimal_digit(ch) {
        return None;
    }

    let code = u32::from(ch);
    let mut start = code;
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        start -= 1;
    }
    u8::try_from((code - start) % 10).ok()
}

//! Scalar normalization helpers shared by every query normalizer.
//!
//! Raw query input is modelled as a JSON map so that the same code accepts
//! strings, numbers and repeated keys (arrays) regardless of whether it came
//! from a query string, a CLI or a test.

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::api::ApiError;

/// Untyped query parameters keyed by name.
pub type RawQuery = Map<String, Value>;

/// Upper bound on area and genre code length.
pub const MAX_CODE_LENGTH: usize = 16;

/// Builds a [`RawQuery`] from decoded query-string pairs.
///
/// A key seen more than once becomes an array in arrival order. A trailing
/// `[]` on a key (`genres[]=G001`) is stripped.
pub fn raw_query_from_pairs<I>(pairs: I) -> RawQuery
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut query = RawQuery::new();
    for (key, value) in pairs {
        let key = key.strip_suffix("[]").map_or(key.clone(), ToOwned::to_owned);
        let value = Value::String(value);
        match query.get_mut(&key) {
            None => {
                query.insert(key, value);
            }
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
        }
    }
    query
}

/// Normalizes a single-valued code parameter (area code, genre code).
///
/// Returns `Ok(None)` for an absent optional value and the trimmed code
/// otherwise.
///
/// # Errors
///
/// Returns a `VALIDATION_ERROR` when a required value is missing, when the
/// value is an array or not a string, when it is blank, or when it is longer
/// than [`MAX_CODE_LENGTH`] characters.
pub fn normalize_code(
    value: Option<&Value>,
    field: &str,
    required: bool,
) -> Result<Option<String>, ApiError> {
    let raw = match value {
        None | Some(Value::Null) => return missing(field, required),
        Some(Value::String(s)) if s.is_empty() => return missing(field, required),
        Some(Value::Array(_)) => {
            return Err(ApiError::invalid_field(
                field,
                format!("{field} must be a single value"),
            ))
        }
        Some(Value::String(s)) => s,
        Some(_) => {
            return Err(ApiError::invalid_field(
                field,
                format!("{field} must be a string"),
            ))
        }
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        if required {
            return missing(field, true);
        }
        return Err(ApiError::invalid_field(
            field,
            format!("{field} must not be blank"),
        ));
    }

    if trimmed.chars().count() > MAX_CODE_LENGTH {
        return Err(ApiError::invalid_field(
            field,
            format!("{field} must be at most {MAX_CODE_LENGTH} characters"),
        ));
    }

    Ok(Some(trimmed.to_owned()))
}

fn missing(field: &str, required: bool) -> Result<Option<String>, ApiError> {
    if required {
        Err(ApiError::invalid_field(field, format!("{field} is required")))
    } else {
        Ok(None)
    }
}

/// Collapses every whitespace run to a single space and trims both ends.
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Renders a scalar the way a loosely-typed query layer would stringify it.
///
/// Arrays join their elements with commas; `null` and objects yield `None`.
pub fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
        Value::Array(items) => Some(Cow::Owned(
            items
                .iter()
                .map(|item| scalar_text(item).map(Cow::into_owned).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        )),
        Value::Null | Value::Object(_) => None,
    }
}

/// Parses the leading base-10 integer of `text`, ignoring leading whitespace
/// and any trailing garbage (`"12abc"` → 12). Saturates instead of overflowing.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut seen_digit = false;
    let mut acc: i64 = 0;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        acc = acc.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }

    seen_digit.then_some(if negative { -acc } else { acc })
}

/// Parses the leading decimal number of `text` (`"35.65abc"` → 35.65).
///
/// Returns `None` when there is no numeric prefix or the result is not finite.
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'-' | b'+')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    trimmed[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Reads an integer and keeps it when it is at least `min`, capping at `max`.
/// Anything unparseable or below `min` yields `fallback`.
pub fn clamp_integer(value: Option<&Value>, min: i64, max: i64, fallback: i64) -> i64 {
    value
        .and_then(scalar_text)
        .and_then(|text| parse_leading_int(&text))
        .filter(|parsed| *parsed >= min)
        .map_or(fallback, |parsed| parsed.min(max))
}

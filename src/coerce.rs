//! Field coercion
//!
//! Total conversions from raw scalar/JSON values into typed, nullable domain
//! values. Every function here returns `Option` and never fails: null, empty,
//! and unparseable inputs all coerce to `None` so a single dirty field can
//! never propagate an error out of a record.

use crate::types::JsonValue;

/// Coerce a raw value to an integer.
///
/// Numeric strings are parsed as floats first and truncated, so values
/// exported with a trailing `.0` still land as integers. NaN markers
/// (textual or numeric) coerce to `None`.
pub fn to_int(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Null => None,
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else {
                n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)
            }
        }
        JsonValue::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            // Parse as float first, then truncate: tolerates "7.0" exports.
            // A textual "NaN" parses to a non-finite float and falls out here.
            s.parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }
        _ => None,
    }
}

/// Coerce a raw value to a float. NaN markers coerce to `None`.
pub fn to_float(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Null => None,
        JsonValue::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        JsonValue::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok().filter(|f| f.is_finite())
        }
        _ => None,
    }
}

/// Coerce a raw value to a trimmed string. Empty values coerce to `None`.
pub fn to_str(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        // Structured values in a string column keep their serialized form.
        other => serde_json::to_string(other).ok(),
    }
}

/// Coerce a raw value to a serialized JSON blob.
///
/// Absent, empty-string, and empty-structure values all coerce to `None`
/// rather than an empty-structure sentinel; anything else serializes to its
/// compact JSON form.
pub fn to_json(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) if s.trim().is_empty() => None,
        JsonValue::Array(a) if a.is_empty() => None,
        JsonValue::Object(o) if o.is_empty() => None,
        other => serde_json::to_string(other).ok(),
    }
}

/// Coerce a raw value to a date string.
///
/// Timestamps keep only the date part (everything before `T`).
pub fn to_date(value: &JsonValue) -> Option<String> {
    let s = to_str(value)?;
    match s.split_once('T') {
        Some((date, _)) => {
            if date.is_empty() {
                None
            } else {
                Some(date.to_string())
            }
        }
        None => Some(s),
    }
}

//! Lenient field coercion for loosely typed document input.
//!
//! Documents arrive as JSON produced by peers, HTTP clients, or the local
//! block generator, often half-built. Construction must never fail, so every
//! accessor here is total: malformed or missing values collapse to `0`, an
//! empty string, an empty list, or `None`.

use serde_json::{Map, Value};

/// Empty object used when the input is not a JSON object at all.
pub(crate) fn as_object(value: &Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

/// Parse the leading integer of a string the way `parseInt` does: optional
/// leading whitespace and sign, then as many decimal digits as present.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude = digits[..end].parse::<i64>().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse the leading decimal number of a string the way `parseFloat` does.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start || has_digits {
            has_digits |= frac_end > frac_start;
            end = frac_end;
        }
    }
    if !has_digits {
        return None;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'-' | b'+')) {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().ok()
}

/// Coerce any JSON value to a non-negative integer; anything unusable is `0`.
pub fn int_value(value: Option<&Value>) -> u64 {
    let parsed = match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
        Some(Value::String(s)) => parse_int_prefix(s).and_then(|i| u64::try_from(i).ok()),
        _ => None,
    };
    parsed.unwrap_or(0)
}

/// Integer field of an object, coerced with [`int_value`].
pub fn int_field(obj: &Map<String, Value>, key: &str) -> u64 {
    int_value(obj.get(key))
}

/// Integer field where both absence and zero mean "not set".
pub fn optional_int_field(obj: &Map<String, Value>, key: &str) -> Option<u64> {
    Some(int_field(obj, key)).filter(|v| *v != 0)
}

/// Textual field; numbers are rendered, everything else is empty.
pub fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Non-empty textual field.
pub fn optional_string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    Some(string_field(obj, key)).filter(|s| !s.is_empty())
}

/// One line of a document collection: either a bare string or an already
/// expanded record carrying its original text under `raw`.
fn line_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(o) => o
            .get("raw")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// Ordered list of lines; a missing or non-array field is an empty list.
pub fn string_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().map(line_value).collect())
        .unwrap_or_default()
}

/// Presence test used for shape-based classification: `null`, `false`, `0`,
/// and the empty string are absent; arrays and objects are always present,
/// even when empty.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

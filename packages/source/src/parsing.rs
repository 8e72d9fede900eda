//! Value coercion helpers for loosely-typed feed rows.
//!
//! Socrata publishes numbers as either JSON numbers or numeric strings
//! depending on the column type, so everything goes through these.

use serde_json::Value;

/// Parses a coordinate from a JSON number or numeric string.
///
/// Returns `None` for anything else, including blank strings and
/// non-finite numbers.
#[must_use]
pub fn parse_coordinate(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    parsed.is_finite().then_some(parsed)
}

/// Renders a scalar JSON value as a trimmed string.
///
/// Returns `None` for null, arrays, objects, and blank strings.
#[must_use]
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

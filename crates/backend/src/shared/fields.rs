//! Tolerant accessors over raw marketplace JSON.
//!
//! Upstream payloads name the same value differently between API versions, so
//! every lookup takes an ordered list of candidate keys. Malformed values never
//! fail: they degrade to a typed default.

use serde_json::{Map, Value};

pub type JsonObject = Map<String, Value>;

/// Coerce a raw value into an amount.
///
/// Numbers are taken as is, numeric strings are parsed, anything else
/// (null, bool, array, object, non-numeric text, NaN/inf) becomes 0.0.
pub fn as_amount(value: Option<&Value>) -> f64 {
    let amount = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    amount.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// First candidate key that is present with a non-null value
pub fn pick<'a>(obj: &'a JsonObject, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| obj.get(*key).filter(|value| !value.is_null()))
}

/// First present candidate coerced to an amount, `default` on total miss
pub fn pick_amount(obj: &JsonObject, keys: &[&str], default: f64) -> f64 {
    match pick(obj, keys) {
        Some(value) => as_amount(Some(value)),
        None => default,
    }
}

/// Текстовое значение: строка (без пробелов по краям) или число
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First candidate key whose value reads as non-empty text
pub fn pick_text(obj: &JsonObject, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find_map(as_text)
}

/// Round a money amount to 2 decimals for output
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

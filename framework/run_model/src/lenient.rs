//! Tolerant readers for the optional run parameters in `metadata.json`.
//!
//! Only the run window decides whether a file is usable. A parameter of the wrong shape, such as
//! `5000.0` or `"100"` for a count, is read as best as possible and otherwise left unset.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A non-negative whole number, also accepted as a whole float or a numeric string.
pub fn count<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let count = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(whole)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole))
        }
        _ => None,
    };
    Ok(count.and_then(|count| T::try_from(count).ok()))
}

/// A number, also accepted as a numeric string.
pub fn float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let float = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(float.filter(|f| f.is_finite()))
}

/// A string, with numbers and booleans rendered as text and anything else read as empty.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn whole(f: f64) -> Option<u64> {
    (f.fract() == 0.0 && f >= 0.0 && f <= u64::MAX as f64).then_some(f as u64)
}

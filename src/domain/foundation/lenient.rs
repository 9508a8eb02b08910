//! Tolerant readers for loosely-typed JSON coming from chat clients and LLMs.
//!
//! Clients echo back whatever they received (sometimes with `""` or `null`
//! in place of a missing value) and language models return numbers as
//! strings. These helpers normalize both into `Option`s.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Non-blank text, trimmed. Numbers are rendered as text; everything else is absent.
pub fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A strictly positive whole number.
///
/// Accepts JSON numbers and numeric strings, including full-width digits
/// and a trailing `名`/`人` counter. Zero, negatives, fractions and
/// anything non-numeric are absent.
pub fn positive_int_of(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                return u32::try_from(v).ok().filter(|v| *v > 0);
            }
            let f = n.as_f64()?;
            if f > 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 {
                Some(f as u32)
            } else {
                None
            }
        }
        Value::String(s) => positive_int_from_text(s),
        _ => None,
    }
}

/// Parses `"3"`, `"３"`, `"3名"`, `"4人"` and the like.
pub fn positive_int_from_text(text: &str) -> Option<u32> {
    let normalized: String = text
        .trim()
        .chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
            other => other,
        })
        .collect();
    let digits = normalized
        .trim_end_matches('様')
        .trim_end_matches(['名', '人'])
        .trim();
    digits.parse::<u32>().ok().filter(|v| *v > 0)
}

/// A finite number, or absent.
pub fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

/// `deserialize_with` adapter for optional text fields.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(text_of))
}

/// `deserialize_with` adapter for optional positive integers.
pub fn positive_int<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(positive_int_of))
}

/// `deserialize_with` adapter for numbers that default to zero.
pub fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_of).unwrap_or(0.0))
}

/// `deserialize_with` adapter for counts that default to zero.
pub fn count_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_of)
        .filter(|f| *f >= 0.0)
        .map(|f| f.min(u32::MAX as f64) as u32)
        .unwrap_or(0))
}

//! Field deserializers for JSON callers. A value that does not parse into
//! something usable becomes absent instead of failing the whole payload.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::domain::{Comparator, ComparatorScope, OfstedBand, SubjectScore};
use super::normalizer::{parse_band, parse_date, parse_percentage};

fn percentage_from(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number
            .as_f64()
            .and_then(|value| parse_percentage(&value.to_string())),
        Value::String(text) => parse_percentage(text),
        _ => None,
    }
}

fn number_from(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn comparator_from(value: &Value) -> Option<Comparator> {
    let value = value.as_object()?;
    Some(Comparator {
        value: percentage_from(value.get("value")?)?,
        scope: ComparatorScope::deserialize(value.get("scope")?.clone()).ok()?,
    })
}

pub(crate) fn band<'de, D>(deserializer: D) -> Result<Option<OfstedBand>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::Number(number) => number
            .as_f64()
            .and_then(|band| parse_band(&band.to_string())),
        Value::String(text) => parse_band(&text),
        _ => None,
    }))
}

/// 0-100 inclusive, as a number or numeric text.
pub(crate) fn percentage<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(percentage_from))
}

/// Any finite number.
pub(crate) fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from))
}

/// Whole percent. Anything above 100 or fractional counts as no data.
pub(crate) fn completeness<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_from)
        .filter(|value| value.fract() == 0.0 && (0.0..=100.0).contains(value))
        .map(|value| value as u8)
        .unwrap_or(0))
}

/// A subject whose own percentage is unusable is dropped along with its
/// comparator.
pub(crate) fn subject<'de, D>(deserializer: D) -> Result<Option<SubjectScore>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| {
        let fields = value.as_object()?;
        Some(SubjectScore {
            school_pct: percentage_from(fields.get("school_pct")?)?,
            comparator: fields.get("comparator").and_then(comparator_from),
        })
    }))
}

pub(crate) fn comparator<'de, D>(deserializer: D) -> Result<Option<Comparator>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(comparator_from))
}

pub(crate) fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => parse_date(&text),
        _ => None,
    })
}

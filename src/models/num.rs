//! Tolerant numeric wire fields.
//!
//! The backend serializes numeric columns as JSON strings while ticker
//! payloads mix raw numbers and strings, so every price-ish field accepts
//! both. Values that cannot be read become `None`/empty rather than failing
//! the whole payload.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Num(f64),
    Text(String),
    Null,
}

/// Keeps the raw text form so "is this numeric?" can be decided at use time.
pub(crate) fn num_string<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Scalar::deserialize(d)? {
        Scalar::Num(n) => n.to_string(),
        Scalar::Text(s) => s,
        Scalar::Null => String::new(),
    })
}

pub(crate) fn opt_f64<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Scalar::deserialize(d)? {
        Scalar::Num(n) => Some(n),
        Scalar::Text(s) => s.trim().parse::<f64>().ok(),
        Scalar::Null => None,
    };
    Ok(parsed.filter(|n| n.is_finite()))
}

pub(crate) fn loose_f64<'de, D>(d: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_f64(d)?.unwrap_or(0.0))
}

/// Epoch seconds, also accepting RFC 3339 text (with or without an offset).
pub(crate) fn opt_epoch<'de, D>(d: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Scalar::deserialize(d)? {
        Scalar::Num(n) => Some(n as i64),
        Scalar::Text(s) => parse_epoch(&s),
        Scalar::Null => None,
    })
}

fn parse_epoch(raw: &str) -> Option<i64> {
    let raw = raw.trim();

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp());
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc().timestamp());
    }

    raw.parse::<i64>().ok()
}

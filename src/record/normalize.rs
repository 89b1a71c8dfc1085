//! Total conversion from untyped maps to [`SendRecord`].

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::Error;

use super::types::{SendRecord, Status, defaults};

/// An untyped record as supplied by a client or document store.
pub type RawRecord = Map<String, Value>;

/// Normalize a raw record, defaulting a missing timestamp to the current time.
pub fn normalize(id: &str, raw: &RawRecord) -> SendRecord {
    normalize_at(id, raw, Utc::now())
}

/// Normalize a raw record with an explicit ingestion instant.
///
/// Every field that is absent or carries the wrong JSON type falls back to
/// its documented default. This function never fails.
pub fn normalize_at(id: &str, raw: &RawRecord, now: DateTime<Utc>) -> SendRecord {
    SendRecord {
        id: id.to_string(),
        color: string_field(raw, "color", defaults::COLOR),
        grade: string_field(raw, "grade", defaults::GRADE),
        status: Status::parse(&string_field(raw, "status", "")),
        attempts: string_field(raw, "attempts", defaults::ATTEMPTS),
        feeling: string_field(raw, "feeling", ""),
        image_url: string_field(raw, "imageUrl", ""),
        user_id: string_field(raw, "userId", defaults::USER_ID),
        user_name: string_field(raw, "userName", ""),
        user_email: string_field(raw, "userEmail", defaults::USER_EMAIL),
        timestamp: raw.get("timestamp").and_then(parse_timestamp).unwrap_or(now),
        is_shared: raw.get("isShared").and_then(Value::as_bool).unwrap_or(false),
    }
}

/// Normalize a batch of `(id, raw)` pairs, preserving order.
pub fn normalize_all<'a, I>(records: I, now: DateTime<Utc>) -> Vec<SendRecord>
where
    I: IntoIterator<Item = (&'a str, &'a RawRecord)>,
{
    records
        .into_iter()
        .map(|(id, raw)| normalize_at(id, raw, now))
        .collect()
}

/// Parse JSON text holding a single record object.
pub fn raw_from_json(text: &str) -> crate::Result<RawRecord> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::invalid_record(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Parse JSON text holding an array of record objects.
///
/// Each object's `id` field is used as its identifier; objects without one
/// are identified by their position in the array.
pub fn raw_batch_from_json(text: &str) -> crate::Result<Vec<(String, RawRecord)>> {
    let Value::Array(items) = serde_json::from_str::<Value>(text)? else {
        return Err(Error::invalid_record("expected a JSON array of records"));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => {
                let id = map
                    .get("id")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| i.to_string());
                Ok((id, map))
            }
            other => Err(Error::invalid_record(format!(
                "record {} is {}, expected an object",
                i,
                json_kind(&other)
            ))),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn string_field(raw: &RawRecord, key: &str, default: &str) -> String {
    raw.get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

/// Accepts RFC 3339 text, epoch seconds (integer or fractional), or a
/// `{seconds, nanoseconds}` object.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => {
            if let Some(secs) = n.as_i64() {
                DateTime::from_timestamp(secs, 0)
            } else {
                let secs = n.as_f64()?;
                if !secs.is_finite() {
                    return None;
                }
                let whole = secs.floor();
                let nanos = ((secs - whole) * 1e9) as u32;
                DateTime::from_timestamp(whole as i64, nanos)
            }
        }
        Value::Object(fields) => {
            let secs = fields.get("seconds").and_then(Value::as_i64)?;
            let nanos = fields
                .get("nanoseconds")
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0);
            DateTime::from_timestamp(secs, nanos)
        }
        _ => None,
    }
}

//! Conversion of backend timestamp wrappers into RFC 3339 strings.
//!
//! Hosted document stores export timestamps as small wrapper objects rather
//! than strings. Record parsing only understands RFC 3339, so snapshots pass
//! through [`normalize_timestamps`] before they reach the schema parser.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::document::Document;

/// Replace every top-level timestamp wrapper in `document` with an RFC 3339 string.
///
/// Returns the number of fields converted. Values that merely resemble a
/// wrapper (wrong types, out-of-range seconds) are left untouched.
pub fn normalize_timestamps(document: &mut Document) -> usize {
    let mut converted = 0;
    for value in document.values_mut() {
        if let Some(timestamp) = value.as_object().and_then(wrapped_timestamp) {
            *value = Value::String(timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true));
            converted += 1;
        }
    }
    converted
}

/// Copy of `document` with timestamp wrappers converted.
#[must_use]
pub fn normalized(document: &Document) -> Document {
    let mut copy = document.clone();
    normalize_timestamps(&mut copy);
    copy
}

fn wrapped_timestamp(object: &Map<String, Value>) -> Option<DateTime<Utc>> {
    if object.len() == 1
        && let Some(Value::String(raw)) = object.get("timestampValue")
    {
        return DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|value| value.with_timezone(&Utc));
    }
    if object.len() == 2 {
        if let Some(parsed) = seconds_and_nanos(object, "_seconds", "_nanoseconds") {
            return Some(parsed);
        }
        return seconds_and_nanos(object, "seconds", "nanos");
    }
    None
}

fn seconds_and_nanos(
    object: &Map<String, Value>,
    seconds_key: &str,
    nanos_key: &str,
) -> Option<DateTime<Utc>> {
    let seconds = integer(object.get(seconds_key)?)?;
    let nanos = u32::try_from(integer(object.get(nanos_key)?)?).ok()?;
    if nanos >= 1_000_000_000 {
        return None;
    }
    DateTime::from_timestamp(seconds, nanos)
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        // Protobuf JSON renders int64 seconds as a string.
        Value::String(raw) => raw.parse().ok(),
        _ => None,
    }
}

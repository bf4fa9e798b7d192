//! Schema validation for raw app-config documents.
//!
//! Input is a loosely typed JSON object as read from storage, after any
//! backend-specific timestamp wrappers have been converted to RFC 3339 strings.
//! Unknown keys are ignored; every failing field is collected so callers can
//! report the full set at once.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::defaults::{
    FIELD_ENV, FIELD_MAINTENANCE_BACKDOOR, FIELD_MAINTENANCE_END, FIELD_MAINTENANCE_REASON,
    FIELD_MAINTENANCE_START, FIELD_PLATFORM, FIELD_REVIEW_VERSION, FIELD_VERSION_MINIMUM,
    FIELD_VERSION_NEXT, FIELD_VERSION_NEXT_UPDATE_TIME,
};
use crate::error::{FieldIssue, SchemaViolation};
use crate::model::{ConfigRecord, Env, MaintenanceWindow, Platform, ReviewPolicy, VersionPolicy};
use crate::version::AppVersion;

const REASON_NOT_OBJECT: &str = "must be an object";
const REASON_REQUIRED: &str = "is required";
const REASON_ENV: &str = "must be one of dev, stg, prod";
const REASON_PLATFORM: &str = "must be one of web, ios, android";
const REASON_STRING: &str = "must be a string or null";
const REASON_BOOLEAN: &str = "must be a boolean";
const REASON_TIMESTAMP: &str = "must be an RFC 3339 timestamp or null";
const REASON_SEMVER: &str = "is not a valid semantic version";

/// Validate a raw document against the record schema.
///
/// # Errors
///
/// Returns a [`SchemaViolation`] listing every field that failed validation.
pub fn parse(raw: &Value) -> Result<ConfigRecord, SchemaViolation> {
    let Some(map) = raw.as_object() else {
        return Err(SchemaViolation {
            issues: vec![FieldIssue::new("", REASON_NOT_OBJECT)],
        });
    };
    parse_document(map)
}

/// Validate an already-unwrapped document map against the record schema.
///
/// # Errors
///
/// Returns a [`SchemaViolation`] listing every field that failed validation.
pub fn parse_document(map: &Map<String, Value>) -> Result<ConfigRecord, SchemaViolation> {
    let mut fields = FieldReader {
        map,
        issues: Vec::new(),
    };

    let env = fields.enumeration::<Env>(FIELD_ENV, REASON_ENV);
    let platform = fields.enumeration::<Platform>(FIELD_PLATFORM, REASON_PLATFORM);
    let maintenance = MaintenanceWindow {
        start_time: fields.timestamp(FIELD_MAINTENANCE_START),
        end_time: fields.timestamp(FIELD_MAINTENANCE_END),
        reason: fields.string(FIELD_MAINTENANCE_REASON),
        allowed_backdoor: fields.boolean(FIELD_MAINTENANCE_BACKDOOR),
    };
    let version = VersionPolicy {
        minimum: fields.string(FIELD_VERSION_MINIMUM),
        next: fields.string(FIELD_VERSION_NEXT),
        next_update_time: fields.timestamp(FIELD_VERSION_NEXT_UPDATE_TIME),
    };
    let review = ReviewPolicy {
        version: fields.string(FIELD_REVIEW_VERSION),
    };

    match (env, platform) {
        (Some(env), Some(platform)) if fields.issues.is_empty() => Ok(ConfigRecord {
            env,
            platform,
            maintenance,
            version,
            review,
        }),
        _ => Err(SchemaViolation {
            issues: fields.issues,
        }),
    }
}

/// Flag version fields that are present but not valid semantic versions.
///
/// These do not invalidate the record: evaluators treat such fields as absent.
#[must_use]
pub fn version_warnings(record: &ConfigRecord) -> Vec<FieldIssue> {
    [
        (FIELD_VERSION_MINIMUM, record.version.minimum.as_deref()),
        (FIELD_VERSION_NEXT, record.version.next.as_deref()),
        (FIELD_REVIEW_VERSION, record.review.version.as_deref()),
    ]
    .into_iter()
    .filter_map(|(path, value)| {
        let value = value?;
        AppVersion::parse(value)
            .is_err()
            .then(|| FieldIssue::new(path, REASON_SEMVER))
    })
    .collect()
}

struct FieldReader<'a> {
    map: &'a Map<String, Value>,
    issues: Vec<FieldIssue>,
}

impl FieldReader<'_> {
    fn enumeration<T: std::str::FromStr>(
        &mut self,
        key: &'static str,
        reason: &'static str,
    ) -> Option<T> {
        match self.map.get(key) {
            None | Some(Value::Null) => {
                self.issues.push(FieldIssue::new(key, REASON_REQUIRED));
                None
            }
            Some(Value::String(raw)) => {
                let parsed = raw.parse::<T>().ok();
                if parsed.is_none() {
                    self.issues.push(FieldIssue::new(key, reason));
                }
                parsed
            }
            Some(_) => {
                self.issues.push(FieldIssue::new(key, reason));
                None
            }
        }
    }

    fn string(&mut self, key: &'static str) -> Option<String> {
        match self.map.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(raw)) => Some(raw.clone()),
            Some(_) => {
                self.issues.push(FieldIssue::new(key, REASON_STRING));
                None
            }
        }
    }

    fn boolean(&mut self, key: &'static str) -> bool {
        match self.map.get(key) {
            None => false,
            Some(Value::Bool(flag)) => *flag,
            Some(_) => {
                self.issues.push(FieldIssue::new(key, REASON_BOOLEAN));
                false
            }
        }
    }

    fn timestamp(&mut self, key: &'static str) -> Option<DateTime<Utc>> {
        match self.map.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(raw)) => {
                let parsed = DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|value| value.with_timezone(&Utc));
                if parsed.is_none() {
                    self.issues.push(FieldIssue::new(key, REASON_TIMESTAMP));
                }
                parsed
            }
            Some(_) => {
                self.issues.push(FieldIssue::new(key, REASON_TIMESTAMP));
                None
            }
        }
    }
}

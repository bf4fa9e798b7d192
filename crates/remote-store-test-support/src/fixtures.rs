//! Clocks, record builders and raw documents for tests.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, TimeZone, Utc};
use remote_store_config::{Clock, ConfigRecord, DocumentKey, Env, Platform};
use remote_store_data::Document;
use serde_json::Value;

/// Reference instant shared by suites: 2024-06-15T12:00:00Z.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// `now` shifted by a signed number of days.
#[must_use]
pub fn days_from(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now + Duration::days(days)
}

/// `now` shifted by a signed number of minutes.
#[must_use]
pub fn minutes_from(now: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
    now + Duration::minutes(minutes)
}

/// Manually driven [`Clock`].
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Clock frozen at `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Move the clock to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    /// Move the clock forward (or back, for negative values).
    pub fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *guard += by;
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new(fixed_now())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Chainable builder for [`ConfigRecord`] fixtures.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: ConfigRecord,
}

impl RecordBuilder {
    /// Start from the default record for the pair.
    #[must_use]
    pub fn new(env: Env, platform: Platform) -> Self {
        Self {
            record: ConfigRecord::new(env, platform),
        }
    }

    /// Set the maintenance window edges.
    #[must_use]
    pub fn maintenance(
        mut self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        self.record.maintenance.start_time = start;
        self.record.maintenance.end_time = end;
        self
    }

    /// Set the maintenance reason.
    #[must_use]
    pub fn reason(mut self, reason: &str) -> Self {
        self.record.maintenance.reason = Some(reason.to_string());
        self
    }

    /// Set the minimum supported version.
    #[must_use]
    pub fn minimum(mut self, version: &str) -> Self {
        self.record.version.minimum = Some(version.to_string());
        self
    }

    /// Set the next version and its activation time.
    #[must_use]
    pub fn next(mut self, version: &str, at: Option<DateTime<Utc>>) -> Self {
        self.record.version.next = Some(version.to_string());
        self.record.version.next_update_time = at;
        self
    }

    /// Set the version under store review.
    #[must_use]
    pub fn review(mut self, version: &str) -> Self {
        self.record.review.version = Some(version.to_string());
        self
    }

    /// Finish the record.
    #[must_use]
    pub fn build(self) -> ConfigRecord {
        self.record
    }

    /// Finish as the flat stored document.
    #[must_use]
    pub fn document(self) -> Document {
        self.record.to_document()
    }
}

/// Canonical path of the pair's document.
#[must_use]
pub fn path_of(env: Env, platform: Platform) -> String {
    DocumentKey::new(env, platform).path()
}

/// Raw document from a JSON object literal; non-objects yield an empty document.
#[must_use]
pub fn document(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fixed_clock_moves_only_when_told() {
        let clock = FixedClock::default();
        assert_eq!(clock.now(), fixed_now());
        clock.advance(Duration::minutes(5));
        assert_eq!(clock.now(), minutes_from(fixed_now(), 5));
        clock.set(days_from(fixed_now(), -1));
        assert_eq!(clock.now(), fixed_now() - Duration::days(1));
    }

    #[test]
    fn builder_sets_requested_fields() {
        let record = RecordBuilder::new(Env::Prod, Platform::Ios)
            .minimum("1.0.0")
            .next("2.0.0", Some(fixed_now()))
            .review("1.5.0")
            .reason("upgrade")
            .build();
        assert_eq!(record.version.minimum.as_deref(), Some("1.0.0"));
        assert_eq!(record.version.next_update_time, Some(fixed_now()));
        assert_eq!(record.review.version.as_deref(), Some("1.5.0"));
        assert_eq!(record.maintenance.reason.as_deref(), Some("upgrade"));
        assert_eq!(path_of(Env::Prod, Platform::Ios), "app_config/prod:ios");
    }

    #[test]
    fn document_accepts_only_objects() {
        assert_eq!(document(json!({"a": 1})).len(), 1);
        assert!(document(json!([1, 2])).is_empty());
    }
}

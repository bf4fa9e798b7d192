//! Combine an observed record with a client version into client-facing decisions.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::ConfigRecord;
use crate::policy::{UpdateType, check_update, is_review_build, is_under_maintenance};

/// Decisions derived from one observed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ConfigGetters {
    /// Backend is inside its maintenance window.
    pub maintenance: bool,
    /// Client build is the one under store review.
    pub review_mode: bool,
    /// Update requirement for the client build.
    pub update_type: UpdateType,
}

/// One observation delivered to subscribers: the record (if any) and its decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigChange {
    /// Record as observed; `None` when the document is absent or failed validation.
    pub record: Option<ConfigRecord>,
    /// Decisions computed for the caller's version.
    #[serde(flatten)]
    pub getters: ConfigGetters,
}

/// Evaluate every policy for `record` independently.
#[must_use]
pub fn evaluate(
    record: Option<&ConfigRecord>,
    current_version: &str,
    now: DateTime<Utc>,
) -> ConfigGetters {
    ConfigGetters {
        maintenance: is_under_maintenance(record, now),
        review_mode: is_review_build(record, current_version),
        update_type: check_update(record, current_version, now),
    }
}

/// Project an observed record into the change delivered to subscribers.
#[must_use]
pub fn project(
    record: Option<ConfigRecord>,
    current_version: &str,
    now: DateTime<Utc>,
) -> ConfigChange {
    let getters = evaluate(record.as_ref(), current_version, now);
    ConfigChange { record, getters }
}

//! Pure policy evaluators over an optional app-config record.
//!
//! # Design
//! - Every evaluator is a deterministic function of its arguments; `now` is
//!   always supplied by the caller.
//! - A missing record, or a field that cannot be interpreted, degrades to the
//!   most conservative outcome instead of failing.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::ConfigRecord;
use crate::version::AppVersion;

/// Outcome of comparing a client version against the stored update policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateType {
    /// No update is requested.
    #[default]
    None,
    /// An update is available and recommended.
    Optional,
    /// The client must update before continuing.
    Required,
}

impl UpdateType {
    #[must_use]
    /// Render the update type as its lowercase string representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Optional => "optional",
            Self::Required => "required",
        }
    }
}

/// Whether the backend is inside its maintenance window at `now`.
///
/// An end time that is not strictly after the start time is ignored, leaving
/// the window open-ended.
#[must_use]
pub fn is_under_maintenance(record: Option<&ConfigRecord>, now: DateTime<Utc>) -> bool {
    let Some(record) = record else {
        return false;
    };
    let Some(start) = record.maintenance.start_time else {
        return false;
    };
    if now < start {
        return false;
    }
    if let Some(end) = record.maintenance.end_time
        && start < end
        && end <= now
    {
        return false;
    }
    true
}

/// Classify whether `current_version` must, should, or need not update.
#[must_use]
pub fn check_update(
    record: Option<&ConfigRecord>,
    current_version: &str,
    now: DateTime<Utc>,
) -> UpdateType {
    let Some(record) = record else {
        return UpdateType::None;
    };
    let Ok(current) = AppVersion::parse(current_version) else {
        return UpdateType::None;
    };

    let minimum = AppVersion::parse_field(record.version.minimum.as_deref());
    let next = AppVersion::parse_field(record.version.next.as_deref());

    if current.meets_all([minimum.as_ref(), next.as_ref()]) {
        return UpdateType::None;
    }

    let Some(next_update_time) = record.version.next_update_time else {
        return match &minimum {
            Some(minimum) if current < *minimum => UpdateType::Required,
            _ => UpdateType::None,
        };
    };

    match next {
        Some(next) if next_update_time <= now => match &minimum {
            Some(minimum) if next <= *minimum => UpdateType::Required,
            _ => UpdateType::Optional,
        },
        _ => UpdateType::None,
    }
}

/// Whether `current_version` is exactly the build marked as under store review.
///
/// An empty review marker counts as absent.
#[must_use]
pub fn is_review_build(record: Option<&ConfigRecord>, current_version: &str) -> bool {
    record
        .and_then(|record| record.review.version.as_deref())
        .filter(|review| !review.is_empty())
        .is_some_and(|review| review == current_version)
}

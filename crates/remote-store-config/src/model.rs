//! Typed app-config record and identity enumerations.
//!
//! # Design
//! - Pure data carriers; parsing lives in `validate.rs`, decisions in `policy.rs`.
//! - Serialization produces the flat stored document (every key present, `null`
//!   for absent values) so a default record can be written as-is.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::defaults::{FIELD_ENV, FIELD_PLATFORM};
use crate::error::ConfigError;

/// Deployment environment a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Env {
    /// Development.
    Dev,
    /// Staging.
    Stg,
    /// Production.
    Prod,
}

impl Env {
    /// Every environment, in declaration order.
    pub const ALL: [Self; 3] = [Self::Dev, Self::Stg, Self::Prod];

    #[must_use]
    /// Render the environment as its lowercase string representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Stg => "stg",
            Self::Prod => "prod",
        }
    }
}

impl FromStr for Env {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Self::Dev),
            "stg" => Ok(Self::Stg),
            "prod" => Ok(Self::Prod),
            other => Err(ConfigError::InvalidIdentity {
                field: FIELD_ENV,
                value: (!other.is_empty()).then(|| other.to_string()),
            }),
        }
    }
}

impl Display for Env {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Client platform a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Browser clients.
    Web,
    /// Apple mobile clients.
    Ios,
    /// Android clients.
    Android,
}

impl Platform {
    /// Every platform, in declaration order.
    pub const ALL: [Self; 3] = [Self::Web, Self::Ios, Self::Android];

    #[must_use]
    /// Render the platform as its lowercase string representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Ios => "ios",
            Self::Android => "android",
        }
    }
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "web" => Ok(Self::Web),
            "ios" => Ok(Self::Ios),
            "android" => Ok(Self::Android),
            other => Err(ConfigError::InvalidIdentity {
                field: FIELD_PLATFORM,
                value: (!other.is_empty()).then(|| other.to_string()),
            }),
        }
    }
}

impl Display for Platform {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Scheduled maintenance window and its informational metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaintenanceWindow {
    /// Window open edge (inclusive).
    #[serde(rename = "system_maintenance:start_time")]
    pub start_time: Option<DateTime<Utc>>,
    /// Window close edge; ignored unless strictly after `start_time`.
    #[serde(rename = "system_maintenance:end_time")]
    pub end_time: Option<DateTime<Utc>>,
    /// Human-readable cause.
    #[serde(rename = "system_maintenance:reason")]
    pub reason: Option<String>,
    /// Escape-hatch flag surfaced to clients; evaluators ignore it.
    #[serde(rename = "system_maintenance:allowed_backdoor")]
    pub allowed_backdoor: bool,
}

/// Update policy versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VersionPolicy {
    /// Lowest version still permitted to run.
    #[serde(rename = "version:minimum")]
    pub minimum: Option<String>,
    /// Version being rolled toward.
    #[serde(rename = "version:next")]
    pub next: Option<String>,
    /// Moment the `next` policy becomes active.
    #[serde(rename = "version:next_update_time")]
    pub next_update_time: Option<DateTime<Utc>>,
}

/// Store-review marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewPolicy {
    /// Exact version string that denotes a build under store review.
    #[serde(rename = "review:version")]
    pub version: Option<String>,
}

/// Configuration record stored for one environment/platform pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigRecord {
    /// Deployment environment.
    pub env: Env,
    /// Client platform.
    pub platform: Platform,
    /// Maintenance window fields.
    #[serde(flatten)]
    pub maintenance: MaintenanceWindow,
    /// Update policy fields.
    #[serde(flatten)]
    pub version: VersionPolicy,
    /// Review marker fields.
    #[serde(flatten)]
    pub review: ReviewPolicy,
}

impl ConfigRecord {
    /// Build a record with every optional field at its default.
    #[must_use]
    pub fn new(env: Env, platform: Platform) -> Self {
        Self {
            env,
            platform,
            maintenance: MaintenanceWindow::default(),
            version: VersionPolicy::default(),
            review: ReviewPolicy::default(),
        }
    }

    /// Render the record as the flat JSON object written to storage.
    #[must_use]
    pub fn to_document(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }
}

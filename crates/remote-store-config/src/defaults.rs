//! Collection name and stored field keys for app-config records.
//!
//! # Design
//! - Stored documents use flat, colon-separated keys; keep every key here so the
//!   parser, the serializer and administrative queries agree byte-for-byte.

/// Collection holding one document per environment/platform pair.
pub const APP_CONFIG_COLLECTION: &str = "app_config";

/// Stored key for the deployment environment.
pub const FIELD_ENV: &str = "env";
/// Stored key for the client platform.
pub const FIELD_PLATFORM: &str = "platform";
/// Stored key for the maintenance window start.
pub const FIELD_MAINTENANCE_START: &str = "system_maintenance:start_time";
/// Stored key for the maintenance window end.
pub const FIELD_MAINTENANCE_END: &str = "system_maintenance:end_time";
/// Stored key for the maintenance reason.
pub const FIELD_MAINTENANCE_REASON: &str = "system_maintenance:reason";
/// Stored key for the maintenance backdoor flag.
pub const FIELD_MAINTENANCE_BACKDOOR: &str = "system_maintenance:allowed_backdoor";
/// Stored key for the minimum supported version.
pub const FIELD_VERSION_MINIMUM: &str = "version:minimum";
/// Stored key for the version being rolled toward.
pub const FIELD_VERSION_NEXT: &str = "version:next";
/// Stored key for the moment the next version becomes active.
pub const FIELD_VERSION_NEXT_UPDATE_TIME: &str = "version:next_update_time";
/// Stored key for the store-review build marker.
pub const FIELD_REVIEW_VERSION: &str = "review:version";

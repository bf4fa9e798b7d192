#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(missing_docs, unreachable_pub, unused)]
#![allow(clippy::module_name_repetitions)]

//! Remote app-config record model and policy evaluation engine.
//!
//! Layout: `model.rs` (typed record and identity enums), `validate.rs` (schema
//! parsing), `key.rs` (document key derivation), `version.rs` (semantic
//! versions), `policy.rs` (maintenance/update/review evaluators),
//! `projection.rs` (combined decisions handed to subscribers).

pub mod clock;
pub mod defaults;
pub mod error;
pub mod key;
pub mod model;
pub mod policy;
pub mod projection;
pub mod validate;
pub mod version;

pub use clock::{Clock, SystemClock};
pub use defaults::APP_CONFIG_COLLECTION;
pub use error::{ConfigError, ConfigResult, FieldIssue, SchemaViolation};
pub use key::{DocumentKey, derive_key, derive_path};
pub use model::{ConfigRecord, Env, MaintenanceWindow, Platform, ReviewPolicy, VersionPolicy};
pub use policy::{UpdateType, check_update, is_review_build, is_under_maintenance};
pub use projection::{ConfigChange, ConfigGetters, evaluate, project};
pub use validate::{parse, parse_document, version_warnings};
pub use version::AppVersion;

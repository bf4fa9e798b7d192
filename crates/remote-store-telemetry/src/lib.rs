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

//! Telemetry primitives shared across the remote-store workspace.
//!
//! Centralises subscriber installation and the timed-operation wrapper so the
//! CLI and library callers log the same way.

pub mod error;
pub mod init;
pub mod timing;

pub use error::{Result, TelemetryError};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging};
pub use timing::{format_elapsed, timed};

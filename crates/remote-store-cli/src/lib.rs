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
#![allow(clippy::redundant_pub_crate)]

//! Administrative CLI for remote-store app-config records.
//!
//! Layout:
//! - `cli.rs`: argument parsing and command dispatch
//! - `admin.rs`: check/migrate/clean over any document store
//! - `commands/`: command handlers grouped by concern
//! - `client.rs`: errors and the shared command context
//! - `output.rs`: renderers and formatting helpers
//! - `main.rs`: thin entrypoint delegating to `run()`

pub mod admin;
pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod output;

pub use admin::{AppConfigAdmin, MigrationReport, RecordReport};
pub use cli::run;

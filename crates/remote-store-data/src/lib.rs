#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(missing_docs, unreachable_pub, unused)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]

//! Document store boundary for remote-store: snapshots, write batches,
//! watchers, backend timestamp adapters, and in-memory/file backends.

pub mod adapter;
pub mod document;
pub mod error;
pub mod file;
pub mod store;

pub use adapter::{normalize_timestamps, normalized};
pub use document::{
    CommitSummary, Document, DocumentSnapshot, DocumentWatch, WriteBatch, WriteOp, split_path,
};
pub use error::{DataError, Result as DataResult};
pub use file::{DEFAULT_POLL_INTERVAL, FileStore};
pub use store::{DocumentStore, MemoryStore};

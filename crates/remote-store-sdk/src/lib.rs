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

//! Client library for remote-store app-config records.
//!
//! [`RemoteStore`] reads a record once, streams projected changes through an
//! [`AppConfigWatcher`], or pushes them to a callback via an
//! [`AppConfigSubscription`].

pub mod client;
pub mod decode;
pub mod error;
pub mod options;
pub mod request;
pub mod subscription;

pub use client::RemoteStore;
pub use decode::decode_snapshot;
pub use error::{SdkError, SdkResult};
pub use options::{RemoteStoreOptions, SDK_VERSION};
pub use request::AppConfigRequest;
pub use subscription::{AppConfigSubscription, AppConfigWatcher, SubscriptionHandle};

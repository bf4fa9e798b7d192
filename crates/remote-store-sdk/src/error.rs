//! Client error primitives.

use remote_store_config::ConfigError;
use remote_store_data::DataError;
use thiserror::Error;

/// Errors surfaced by the client.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Request identity could not be turned into a document key.
    #[error("invalid app-config request")]
    Config(#[from] ConfigError),
    /// The document store failed to serve the request.
    #[error("document store request failed")]
    Store(#[from] DataError),
}

/// Result wrapper for client operations.
pub type SdkResult<T> = Result<T, SdkError>;

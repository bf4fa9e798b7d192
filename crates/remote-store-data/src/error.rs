//! Error types for the document store layer.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

/// Result alias for document store operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors raised by the document store layer.
#[derive(Debug)]
pub enum DataError {
    /// Reading or writing the backing file failed.
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// File involved in the failure.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// The backing file did not contain a valid store document.
    Corrupt {
        /// File that failed to decode.
        path: PathBuf,
        /// Underlying serde error.
        source: serde_json::Error,
    },
    /// Encoding the store for persistence failed.
    Encode {
        /// Underlying serde error.
        source: serde_json::Error,
    },
    /// A document path did not have the `<collection>/<id>` shape.
    InvalidPath {
        /// Offending path.
        path: String,
    },
}

impl Display for DataError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { operation, .. } => write!(formatter, "store io failed during {operation}"),
            Self::Corrupt { .. } => formatter.write_str("store file is not a valid document map"),
            Self::Encode { .. } => formatter.write_str("failed to encode store documents"),
            Self::InvalidPath { path } => write!(formatter, "invalid document path '{path}'"),
        }
    }
}

impl Error for DataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Corrupt { source, .. } | Self::Encode { source } => Some(source),
            Self::InvalidPath { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        match serde_json::from_str::<serde_json::Value>("{") {
            Ok(_) => unreachable!("input is not valid json"),
            Err(err) => err,
        }
    }

    #[test]
    fn data_error_display_and_source() {
        let io = DataError::Io {
            operation: "commit",
            path: PathBuf::from("store.json"),
            source: std::io::Error::other("disk"),
        };
        assert_eq!(io.to_string(), "store io failed during commit");
        assert!(io.source().is_some());

        let corrupt = DataError::Corrupt {
            path: PathBuf::from("store.json"),
            source: json_error(),
        };
        assert_eq!(corrupt.to_string(), "store file is not a valid document map");
        assert!(corrupt.source().is_some());

        let encode = DataError::Encode {
            source: json_error(),
        };
        assert!(encode.source().is_some());

        let path = DataError::InvalidPath {
            path: "app_config".into(),
        };
        assert_eq!(path.to_string(), "invalid document path 'app_config'");
        assert!(path.source().is_none());
    }
}

//! Document snapshots, write batches and watch streams shared by every store.

use serde_json::{Map, Value};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;

use crate::error::{DataError, Result};

/// Raw document body: a flat JSON object.
pub type Document = Map<String, Value>;

/// One observation of a document path.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    /// Full document path (`<collection>/<id>`).
    pub path: String,
    /// Document body; `None` when the document does not exist.
    pub data: Option<Document>,
}

impl DocumentSnapshot {
    /// Snapshot of an existing document.
    #[must_use]
    pub fn present(path: impl Into<String>, data: Document) -> Self {
        Self {
            path: path.into(),
            data: Some(data),
        }
    }

    /// Snapshot of a path with no document.
    #[must_use]
    pub fn missing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            data: None,
        }
    }

    /// Whether the document exists.
    #[must_use]
    pub const fn exists(&self) -> bool {
        self.data.is_some()
    }

    /// Document identifier (the path segment after the collection).
    #[must_use]
    pub fn id(&self) -> &str {
        self.path
            .split_once('/')
            .map_or(self.path.as_str(), |(_, id)| id)
    }
}

/// Split a document path into its collection and identifier.
///
/// # Errors
///
/// Returns [`DataError::InvalidPath`] unless the path is exactly
/// `<collection>/<id>` with both segments non-empty.
pub fn split_path(path: &str) -> Result<(&str, &str)> {
    match path.split_once('/') {
        Some((collection, id)) if !collection.is_empty() && !id.is_empty() && !id.contains('/') => {
            Ok((collection, id))
        }
        _ => Err(DataError::InvalidPath {
            path: path.to_string(),
        }),
    }
}

/// A single operation inside a [`WriteBatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Create or overwrite the document at `path`.
    Set {
        /// Target document path.
        path: String,
        /// Full document body.
        data: Document,
    },
    /// Remove the document at `path` if present.
    Delete {
        /// Target document path.
        path: String,
    },
}

impl WriteOp {
    /// Path targeted by the operation.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Set { path, .. } | Self::Delete { path } => path,
        }
    }
}

/// Ordered set of writes applied all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    /// Empty batch.
    #[must_use]
    pub const fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Queue a create-or-overwrite.
    pub fn set(&mut self, path: impl Into<String>, data: Document) -> &mut Self {
        self.ops.push(WriteOp::Set {
            path: path.into(),
            data,
        });
        self
    }

    /// Queue a delete.
    pub fn delete(&mut self, path: impl Into<String>) -> &mut Self {
        self.ops.push(WriteOp::Delete { path: path.into() });
        self
    }

    /// Queued operations in application order.
    #[must_use]
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    /// Whether the batch holds no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Check every path before anything is applied.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InvalidPath`] for the first malformed path.
    pub fn validate(&self) -> Result<()> {
        for op in &self.ops {
            split_path(op.path())?;
        }
        Ok(())
    }

    pub(crate) fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

/// Counts reported after a batch commits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    /// Number of set operations applied.
    pub written: usize,
    /// Number of delete operations applied.
    pub deleted: usize,
}

/// Stream of snapshots for one document path.
///
/// Yields the current snapshot first, then each subsequent change. A slow
/// consumer observes only the most recent value.
pub struct DocumentWatch {
    stream: WatchStream<DocumentSnapshot>,
    poller: Option<JoinHandle<()>>,
}

impl DocumentWatch {
    /// Watch a channel owned by the store.
    #[must_use]
    pub fn new(receiver: watch::Receiver<DocumentSnapshot>) -> Self {
        Self {
            stream: WatchStream::new(receiver),
            poller: None,
        }
    }

    /// Watch a channel fed by a background task; the task stops with the watch.
    #[must_use]
    pub fn with_poller(
        receiver: watch::Receiver<DocumentSnapshot>,
        poller: JoinHandle<()>,
    ) -> Self {
        Self {
            stream: WatchStream::new(receiver),
            poller: Some(poller),
        }
    }

    /// Await the next snapshot; `None` once the store side has gone away.
    pub async fn next(&mut self) -> Option<DocumentSnapshot> {
        self.stream.next().await
    }
}

impl Drop for DocumentWatch {
    fn drop(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.abort();
        }
    }
}

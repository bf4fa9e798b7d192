//! JSON-file document store used by the administrative CLI.
//!
//! # Design
//! - The whole store is one JSON object keyed by document path.
//! - Commits rewrite a sibling temp file and rename it into place so a batch is
//!   never half-applied on disk.
//! - Watching polls the file; only real changes are published.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tokio::sync::{Mutex, watch};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::document::{CommitSummary, DocumentSnapshot, DocumentWatch, WriteBatch, split_path};
use crate::error::{DataError, Result};
use crate::store::{DocumentMap, DocumentStore, apply, publish, select, snapshot_of};

/// Default interval between file polls while watching.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Document store persisted as a single JSON file.
#[derive(Clone)]
pub struct FileStore {
    path: PathBuf,
    poll_interval: Duration,
    write_lock: Arc<Mutex<()>>,
}

impl FileStore {
    /// Store backed by `path`; the file is created on first commit.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Override the interval used by watchers to re-read the file.
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<DocumentMap> {
        let payload = match fs::read_to_string(&self.path).await {
            Ok(payload) => payload,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(DocumentMap::new()),
            Err(source) => {
                return Err(DataError::Io {
                    operation: "load",
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if payload.trim().is_empty() {
            return Ok(DocumentMap::new());
        }
        serde_json::from_str(&payload).map_err(|source| DataError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn save(&self, documents: &DocumentMap) -> Result<()> {
        let payload =
            serde_json::to_string_pretty(documents).map_err(|source| DataError::Encode { source })?;
        let staging = self.staging_path();
        fs::write(&staging, payload)
            .await
            .map_err(|source| DataError::Io {
                operation: "write",
                path: staging.clone(),
                source,
            })?;
        fs::rename(&staging, &self.path)
            .await
            .map_err(|source| DataError::Io {
                operation: "rename",
                path: self.path.clone(),
                source,
            })
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn get(&self, path: &str) -> Result<DocumentSnapshot> {
        split_path(path)?;
        Ok(snapshot_of(&self.load().await?, path))
    }

    async fn watch(&self, path: &str) -> Result<DocumentWatch> {
        let initial = self.get(path).await?;
        let (sender, receiver) = watch::channel(initial);
        let store = self.clone();
        let target = path.to_string();
        let poller = tokio::spawn(async move {
            loop {
                sleep(store.poll_interval).await;
                if sender.is_closed() {
                    debug!(path = %target, "file watch closed");
                    break;
                }
                match store.get(&target).await {
                    Ok(snapshot) => {
                        publish(&sender, snapshot);
                    }
                    Err(err) => warn!(path = %target, error = %err, "file watch poll failed"),
                }
            }
        });
        Ok(DocumentWatch::with_poller(receiver, poller))
    }

    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<DocumentSnapshot>> {
        Ok(select(&self.load().await?, collection, field, value))
    }

    async fn commit(&self, batch: WriteBatch) -> Result<CommitSummary> {
        batch.validate()?;
        let _guard = self.write_lock.lock().await;
        let mut documents = self.load().await?;
        let (summary, _) = apply(&mut documents, batch);
        self.save(&documents).await?;
        Ok(summary)
    }
}

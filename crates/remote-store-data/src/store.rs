//! Document store abstraction and the in-process implementation.
//!
//! # Design
//! - `DocumentStore` is the only seam the client and administrative layers use,
//!   so any key-value document source can drive them.
//! - `MemoryStore` keeps one `tokio::sync::watch` channel per watched path and
//!   publishes after every commit that changes that path.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::watch;

use crate::document::{
    CommitSummary, Document, DocumentSnapshot, DocumentWatch, WriteBatch, WriteOp, split_path,
};
use crate::error::Result;

#[async_trait]
/// Abstraction over document backends used by the client and admin surfaces.
pub trait DocumentStore: Send + Sync {
    /// Read the current snapshot of a document path.
    async fn get(&self, path: &str) -> Result<DocumentSnapshot>;
    /// Observe a document path: the current snapshot first, then each change.
    async fn watch(&self, path: &str) -> Result<DocumentWatch>;
    /// List documents of `collection` whose top-level `field` equals `value`.
    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<DocumentSnapshot>>;
    /// Apply every operation in `batch`, or none of them.
    async fn commit(&self, batch: WriteBatch) -> Result<CommitSummary>;
}

/// Document map keyed by full path.
pub(crate) type DocumentMap = BTreeMap<String, Document>;

pub(crate) fn snapshot_of(documents: &DocumentMap, path: &str) -> DocumentSnapshot {
    documents.get(path).map_or_else(
        || DocumentSnapshot::missing(path),
        |data| DocumentSnapshot::present(path, data.clone()),
    )
}

pub(crate) fn select(
    documents: &DocumentMap,
    collection: &str,
    field: &str,
    value: &Value,
) -> Vec<DocumentSnapshot> {
    documents
        .iter()
        .filter(|(path, data)| {
            split_path(path).is_ok_and(|(owner, _)| owner == collection)
                && data.get(field) == Some(value)
        })
        .map(|(path, data)| DocumentSnapshot::present(path.clone(), data.clone()))
        .collect()
}

/// Apply validated operations in order, returning the touched paths.
pub(crate) fn apply(
    documents: &mut DocumentMap,
    batch: WriteBatch,
) -> (CommitSummary, Vec<String>) {
    let mut summary = CommitSummary::default();
    let mut touched = Vec::new();
    for op in batch.into_ops() {
        match op {
            WriteOp::Set { path, data } => {
                documents.insert(path.clone(), data);
                summary.written += 1;
                touched.push(path);
            }
            WriteOp::Delete { path } => {
                documents.remove(&path);
                summary.deleted += 1;
                touched.push(path);
            }
        }
    }
    (summary, touched)
}

/// Publish `snapshot` unless subscribers already hold an equal value.
pub(crate) fn publish(
    sender: &watch::Sender<DocumentSnapshot>,
    snapshot: DocumentSnapshot,
) -> bool {
    sender.send_if_modified(|current| {
        if *current == snapshot {
            false
        } else {
            *current = snapshot;
            true
        }
    })
}

/// In-process document store with live watchers.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    documents: DocumentMap,
    watchers: HashMap<String, watch::Sender<DocumentSnapshot>>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or overwrite a single document.
    ///
    /// # Errors
    ///
    /// Returns an error when `path` is not a valid document path.
    pub async fn put(&self, path: &str, data: Document) -> Result<()> {
        let mut batch = WriteBatch::new();
        batch.set(path, data);
        self.commit(batch).await.map(|_| ())
    }

    /// Remove a single document.
    ///
    /// # Errors
    ///
    /// Returns an error when `path` is not a valid document path.
    pub async fn remove(&self, path: &str) -> Result<()> {
        let mut batch = WriteBatch::new();
        batch.delete(path);
        self.commit(batch).await.map(|_| ())
    }

    /// Number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().documents.len()
    }

    /// Whether the store holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &str) -> Result<DocumentSnapshot> {
        split_path(path)?;
        Ok(snapshot_of(&self.lock().documents, path))
    }

    async fn watch(&self, path: &str) -> Result<DocumentWatch> {
        split_path(path)?;
        let mut state = self.lock();
        let current = snapshot_of(&state.documents, path);
        let sender = state
            .watchers
            .entry(path.to_string())
            .or_insert_with(|| watch::channel(current).0);
        Ok(DocumentWatch::new(sender.subscribe()))
    }

    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<DocumentSnapshot>> {
        Ok(select(&self.lock().documents, collection, field, value))
    }

    async fn commit(&self, batch: WriteBatch) -> Result<CommitSummary> {
        batch.validate()?;
        let mut state = self.lock();
        let (summary, touched) = apply(&mut state.documents, batch);
        let MemoryState {
            documents,
            watchers,
        } = &mut *state;
        watchers.retain(|_, sender| !sender.is_closed());
        for path in touched {
            if let Some(sender) = watchers.get(&path) {
                publish(sender, snapshot_of(documents, &path));
            }
        }
        drop(state);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn get_distinguishes_missing_documents() -> Result<()> {
        let store = MemoryStore::new();
        assert_eq!(
            store.get("app_config/dev:web").await?,
            DocumentSnapshot::missing("app_config/dev:web")
        );
        store.put("app_config/dev:web", doc(json!({"env": "dev"}))).await?;
        assert!(store.get("app_config/dev:web").await?.exists());
        assert!(matches!(
            store.get("app_config").await,
            Err(DataError::InvalidPath { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn query_filters_by_collection_and_field() -> Result<()> {
        let store = MemoryStore::new();
        store.put("app_config/dev:web", doc(json!({"env": "dev"}))).await?;
        store.put("app_config/dev:ios", doc(json!({"env": "dev"}))).await?;
        store.put("app_config/prod:web", doc(json!({"env": "prod"}))).await?;
        store.put("other/dev:web", doc(json!({"env": "dev"}))).await?;

        let found = store.query("app_config", "env", &json!("dev")).await?;
        let ids: Vec<_> = found.iter().map(DocumentSnapshot::id).collect();
        assert_eq!(ids, vec!["dev:ios", "dev:web"]);
        Ok(())
    }

    #[tokio::test]
    async fn commit_is_all_or_nothing() -> Result<()> {
        let store = MemoryStore::new();
        let mut batch = WriteBatch::new();
        batch
            .set("app_config/dev:web", doc(json!({"env": "dev"})))
            .delete("not-a-path");
        assert!(store.commit(batch).await.is_err());
        assert!(store.is_empty());

        let mut batch = WriteBatch::new();
        batch
            .set("app_config/dev:web", doc(json!({"v": 1})))
            .delete("app_config/dev:web")
            .set("app_config/dev:web", doc(json!({"v": 2})));
        let summary = store.commit(batch).await?;
        assert_eq!(summary, CommitSummary { written: 2, deleted: 1 });
        assert_eq!(
            store.get("app_config/dev:web").await?.data,
            Some(doc(json!({"v": 2})))
        );
        Ok(())
    }

    #[tokio::test]
    async fn watch_emits_initial_and_changes() -> Result<()> {
        let store = MemoryStore::new();
        let mut watch = store.watch("app_config/dev:web").await?;
        assert_eq!(
            watch.next().await,
            Some(DocumentSnapshot::missing("app_config/dev:web"))
        );

        store.put("app_config/dev:web", doc(json!({"v": 1}))).await?;
        assert_eq!(watch.next().await.and_then(|s| s.data), Some(doc(json!({"v": 1}))));

        store.remove("app_config/dev:web").await?;
        assert_eq!(
            watch.next().await,
            Some(DocumentSnapshot::missing("app_config/dev:web"))
        );
        Ok(())
    }

    #[tokio::test]
    async fn late_watchers_see_current_value() -> Result<()> {
        let store = MemoryStore::new();
        let first = store.watch("app_config/dev:web").await?;
        drop(first);
        store.put("app_config/dev:web", doc(json!({"v": 3}))).await?;

        let mut watch = store.watch("app_config/dev:web").await?;
        assert_eq!(watch.next().await.and_then(|s| s.data), Some(doc(json!({"v": 3}))));
        Ok(())
    }
}

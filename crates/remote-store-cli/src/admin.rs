//! Administrative batch operations over the app-config collection.
//!
//! Every operation queries the documents of one environment, decides per
//! document, and applies its writes as a single all-or-nothing batch.

use std::collections::BTreeMap;
use std::sync::Arc;

use remote_store_config::{
    APP_CONFIG_COLLECTION, ConfigRecord, DocumentKey, Env, Platform, parse_document,
    version_warnings,
};
use remote_store_data::{
    CommitSummary, DataResult, Document, DocumentSnapshot, DocumentStore, WriteBatch, normalized,
};
use remote_store_telemetry::timed;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

/// Outcome of validating one stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordReport {
    /// Document identifier within the collection.
    pub id: String,
    /// Whether the document passes schema validation.
    pub valid: bool,
    /// Schema issues; empty when valid.
    pub issues: Vec<String>,
    /// Version fields that will be ignored by evaluators.
    pub warnings: Vec<String>,
}

/// Writes applied by [`AppConfigAdmin::migrate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Paths removed because they were invalid (or because of `force`).
    pub deleted: Vec<String>,
    /// Paths whose existing data was written back unchanged.
    pub preserved: Vec<String>,
    /// Paths that received a default record.
    pub created: Vec<String>,
}

/// Check, migrate and clean app-config documents held in `S`.
#[derive(Debug)]
pub struct AppConfigAdmin<S> {
    store: Arc<S>,
}

impl<S> AppConfigAdmin<S>
where
    S: DocumentStore,
{
    /// Administer the documents held in `store`.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Validate every document of `env`.
    ///
    /// # Errors
    ///
    /// Returns an error when the store query fails.
    pub async fn check(&self, env: Env) -> DataResult<Vec<RecordReport>> {
        timed("check", self.check_documents(env)).await
    }

    /// Normalise the documents of `env` to exactly one valid record per platform.
    ///
    /// Invalid documents are deleted (all of them when `force` is set). For
    /// each platform the surviving document is written back with its stored
    /// data, or a default record is created at the canonical path.
    ///
    /// # Errors
    ///
    /// Returns an error when the query or the batch commit fails; in that case
    /// nothing is written.
    pub async fn migrate(&self, env: Env, force: bool) -> DataResult<MigrationReport> {
        timed("migrate", self.migrate_documents(env, force)).await
    }

    /// Delete every document of `env`.
    ///
    /// # Errors
    ///
    /// Returns an error when the query or the batch commit fails.
    pub async fn clean(&self, env: Env) -> DataResult<CommitSummary> {
        timed("clean", self.clean_documents(env)).await
    }

    async fn check_documents(&self, env: Env) -> DataResult<Vec<RecordReport>> {
        let documents = self.documents_of(env).await?;
        Ok(documents.iter().map(report_for).collect())
    }

    async fn migrate_documents(&self, env: Env, force: bool) -> DataResult<MigrationReport> {
        let documents = self.documents_of(env).await?;
        let mut batch = WriteBatch::new();
        let mut report = MigrationReport::default();
        let mut survivors: BTreeMap<Platform, (String, Document)> = BTreeMap::new();

        for snapshot in documents {
            let Some(data) = snapshot.data else {
                continue;
            };
            match parse_document(&normalized(&data)) {
                Ok(record) if !force => {
                    survivors.insert(record.platform, (snapshot.path, data));
                }
                parsed => {
                    if let Err(violation) = parsed {
                        warn!(
                            path = %snapshot.path,
                            error = %violation,
                            "deleting invalid app-config document"
                        );
                    }
                    batch.delete(snapshot.path.clone());
                    report.deleted.push(snapshot.path);
                }
            }
        }

        for platform in Platform::ALL {
            if let Some((path, data)) = survivors.remove(&platform) {
                batch.set(path.clone(), data);
                report.preserved.push(path);
            } else {
                let path = DocumentKey::new(env, platform).path();
                batch.set(path.clone(), ConfigRecord::new(env, platform).to_document());
                report.created.push(path);
            }
        }

        let summary = self.store.commit(batch).await?;
        info!(
            env = %env,
            written = summary.written,
            deleted = summary.deleted,
            "app-config migration committed"
        );
        Ok(report)
    }

    async fn clean_documents(&self, env: Env) -> DataResult<CommitSummary> {
        let documents = self.documents_of(env).await?;
        let mut batch = WriteBatch::new();
        for snapshot in documents {
            batch.delete(snapshot.path);
        }
        let summary = self.store.commit(batch).await?;
        info!(env = %env, deleted = summary.deleted, "app-config documents removed");
        Ok(summary)
    }

    async fn documents_of(&self, env: Env) -> DataResult<Vec<DocumentSnapshot>> {
        self.store
            .query(
                APP_CONFIG_COLLECTION,
                "env",
                &Value::String(env.as_str().to_string()),
            )
            .await
    }
}

fn report_for(snapshot: &DocumentSnapshot) -> RecordReport {
    let id = snapshot.id().to_string();
    let Some(data) = &snapshot.data else {
        return RecordReport {
            id,
            valid: false,
            issues: vec!["document is missing".to_string()],
            warnings: Vec::new(),
        };
    };
    match parse_document(&normalized(data)) {
        Ok(record) => RecordReport {
            id,
            valid: true,
            issues: Vec::new(),
            warnings: version_warnings(&record)
                .iter()
                .map(ToString::to_string)
                .collect(),
        },
        Err(violation) => RecordReport {
            id,
            valid: false,
            issues: violation.issues.iter().map(ToString::to_string).collect(),
            warnings: Vec::new(),
        },
    }
}

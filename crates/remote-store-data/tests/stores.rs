use std::time::Duration;

use remote_store_data::{
    DataError, DataResult, Document, DocumentStore, FileStore, MemoryStore, WriteBatch,
};
use serde_json::{Value, json};
use tokio::time::timeout;

fn doc(value: Value) -> Document {
    value.as_object().cloned().unwrap_or_default()
}

async fn exercise<S: DocumentStore>(store: &S) -> DataResult<()> {
    let mut batch = WriteBatch::new();
    batch
        .set("app_config/dev:web", doc(json!({ "env": "dev", "platform": "web" })))
        .set("app_config/dev:ios", doc(json!({ "env": "dev", "platform": "ios" })))
        .set("app_config/prod:web", doc(json!({ "env": "prod", "platform": "web" })))
        .set("other/dev:web", doc(json!({ "env": "dev" })));
    let summary = store.commit(batch).await?;
    assert_eq!(summary.written, 4);

    let dev = store.query("app_config", "env", &json!("dev")).await?;
    let ids: Vec<&str> = dev.iter().map(|snapshot| snapshot.id()).collect();
    assert_eq!(ids, vec!["dev:ios", "dev:web"]);

    let mut watch = store.watch("app_config/dev:web").await?;
    let initial = timeout(Duration::from_secs(2), watch.next())
        .await
        .ok()
        .flatten();
    assert!(initial.is_some_and(|snapshot| snapshot.exists()));

    let mut batch = WriteBatch::new();
    batch.delete("app_config/dev:web");
    store.commit(batch).await?;
    let removed = timeout(Duration::from_secs(2), watch.next())
        .await
        .ok()
        .flatten();
    assert!(removed.is_some_and(|snapshot| !snapshot.exists()));

    let mut rejected = WriteBatch::new();
    rejected
        .delete("app_config/prod:web")
        .set("not-a-path", Document::new());
    assert!(matches!(
        store.commit(rejected).await,
        Err(DataError::InvalidPath { .. })
    ));
    assert!(store.get("app_config/prod:web").await?.exists());
    Ok(())
}

#[tokio::test]
async fn memory_store_honours_the_store_contract() -> DataResult<()> {
    exercise(&MemoryStore::new()).await
}

#[tokio::test]
async fn file_store_honours_the_store_contract() -> DataResult<()> {
    let dir = tempfile::tempdir().map_err(|source| DataError::Io {
        operation: "tempdir",
        path: std::env::temp_dir(),
        source,
    })?;
    let store = FileStore::new(dir.path().join("documents.json"))
        .with_poll_interval(Duration::from_millis(20));
    exercise(&store).await
}

//! Client entry point binding a document store to the app-config engine.

use std::fmt;
use std::sync::Arc;

use remote_store_config::{Clock, ConfigChange, ConfigGetters, ConfigRecord, SystemClock, project};
use remote_store_data::DocumentStore;
use tracing::debug;

use crate::decode::decode_snapshot;
use crate::error::SdkResult;
use crate::options::RemoteStoreOptions;
use crate::request::AppConfigRequest;
use crate::subscription::{AppConfigSubscription, AppConfigWatcher};

/// Reads and observes app-config records held in a [`DocumentStore`].
pub struct RemoteStore<S> {
    store: Arc<S>,
    options: RemoteStoreOptions,
    clock: Arc<dyn Clock>,
}

impl<S> RemoteStore<S>
where
    S: DocumentStore + 'static,
{
    /// Build a client over `store` using the wall clock.
    #[must_use]
    pub fn new(store: Arc<S>, options: RemoteStoreOptions) -> Self {
        Self {
            store,
            options,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used to evaluate time windows.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Version reported by this client.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.options.sdk_version
    }

    /// Read the current record once and project it for `request.version`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SdkError::Store`] when the read fails. A missing or
    /// invalid document is not an error and projects to defaults.
    pub async fn fetch_app_config(&self, request: &AppConfigRequest) -> SdkResult<ConfigChange> {
        let path = request.key().path();
        let snapshot = self.store.get(&path).await?;
        let record = decode_snapshot(&snapshot);
        Ok(project(record, &request.version, self.clock.now()))
    }

    /// Start observing the requested record.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SdkError::Store`] when the store refuses the watch.
    pub async fn watch_app_config(
        &self,
        request: &AppConfigRequest,
    ) -> SdkResult<AppConfigWatcher> {
        let key = request.key();
        let watch = self.store.watch(&key.path()).await?;
        let watcher = AppConfigWatcher::new(
            key,
            request.version.clone(),
            Arc::clone(&self.clock),
            watch,
        );
        debug!(
            watcher = %watcher.id(),
            key = %key,
            version = %request.version,
            "watching app-config"
        );
        Ok(watcher)
    }

    /// Deliver every observation of the requested record to `on_change`.
    ///
    /// The callback fires for the initial state and once per later change, in
    /// order, from a background task. Must be called inside a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SdkError::Store`] when the store refuses the watch.
    pub async fn subscribe_app_config<F>(
        &self,
        request: &AppConfigRequest,
        on_change: F,
    ) -> SdkResult<AppConfigSubscription>
    where
        F: FnMut(Option<&ConfigRecord>, &ConfigGetters) + Send + 'static,
    {
        let watcher = self.watch_app_config(request).await?;
        Ok(AppConfigSubscription::spawn(watcher, on_change))
    }
}

impl<S> fmt::Debug for RemoteStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteStore")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

//! Construction-time options for [`crate::RemoteStore`].

/// Version reported by this client library when none is configured.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Options supplied when constructing a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteStoreOptions {
    /// Version string the client reports about itself.
    pub sdk_version: String,
}

impl RemoteStoreOptions {
    /// Override the reported client version.
    #[must_use]
    pub fn with_sdk_version(mut self, sdk_version: impl Into<String>) -> Self {
        self.sdk_version = sdk_version.into();
        self
    }
}

impl Default for RemoteStoreOptions {
    fn default() -> Self {
        Self {
            sdk_version: SDK_VERSION.to_string(),
        }
    }
}

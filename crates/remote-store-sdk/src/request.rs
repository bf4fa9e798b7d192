//! Identity and client version of an app-config read or subscription.

use remote_store_config::{ConfigResult, DocumentKey, Env, Platform};

/// Which record to observe and which client version to evaluate it for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfigRequest {
    /// Deployment environment.
    pub env: Env,
    /// Client platform.
    pub platform: Platform,
    /// Running client version, compared against the record's policies.
    pub version: String,
}

impl AppConfigRequest {
    /// Build a request from typed identity.
    #[must_use]
    pub fn new(env: Env, platform: Platform, version: impl Into<String>) -> Self {
        Self {
            env,
            platform,
            version: version.into(),
        }
    }

    /// Build a request from raw identity strings.
    ///
    /// # Errors
    ///
    /// Returns [`remote_store_config::ConfigError::InvalidIdentity`] when either
    /// component is empty or unknown.
    pub fn from_raw(env: &str, platform: &str, version: impl Into<String>) -> ConfigResult<Self> {
        Ok(Self::new(env.parse()?, platform.parse()?, version))
    }

    /// Key of the observed document.
    #[must_use]
    pub const fn key(&self) -> DocumentKey {
        DocumentKey::new(self.env, self.platform)
    }
}

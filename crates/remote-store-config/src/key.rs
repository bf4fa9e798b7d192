//! Document key derivation for environment/platform pairs.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::defaults::APP_CONFIG_COLLECTION;
use crate::error::{ConfigError, ConfigResult};
use crate::model::{Env, Platform};

/// Typed identity of a stored app-config document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentKey {
    /// Deployment environment.
    pub env: Env,
    /// Client platform.
    pub platform: Platform,
}

impl DocumentKey {
    /// Construct a key from typed identity components.
    #[must_use]
    pub const fn new(env: Env, platform: Platform) -> Self {
        Self { env, platform }
    }

    /// Document identifier within the collection (`<env>:<platform>`).
    #[must_use]
    pub fn id(self) -> String {
        format!("{}:{}", self.env.as_str(), self.platform.as_str())
    }

    /// Full document path (`app_config/<env>:<platform>`).
    #[must_use]
    pub fn path(self) -> String {
        format!("{APP_CONFIG_COLLECTION}/{}", self.id())
    }
}

impl Display for DocumentKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.env, self.platform)
    }
}

impl FromStr for DocumentKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidDocumentKey {
            value: s.to_string(),
        };
        let (env, platform) = s.split_once(':').ok_or_else(invalid)?;
        let env = env.parse::<Env>().map_err(|_| invalid())?;
        let platform = platform.parse::<Platform>().map_err(|_| invalid())?;
        Ok(Self::new(env, platform))
    }
}

/// Validate raw identity components and derive the document identifier.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidIdentity`] when either component is empty or
/// outside its closed enumeration.
pub fn derive_key(env: &str, platform: &str) -> ConfigResult<String> {
    Ok(validate_identity(env, platform)?.id())
}

/// Validate raw identity components and derive the full document path.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidIdentity`] when either component is empty or
/// outside its closed enumeration.
pub fn derive_path(env: &str, platform: &str) -> ConfigResult<String> {
    Ok(validate_identity(env, platform)?.path())
}

fn validate_identity(env: &str, platform: &str) -> ConfigResult<DocumentKey> {
    Ok(DocumentKey::new(env.parse()?, platform.parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_key_covers_every_pair() {
        for env in Env::ALL {
            for platform in Platform::ALL {
                let expected = format!("{env}:{platform}");
                assert_eq!(
                    derive_key(env.as_str(), platform.as_str()),
                    Ok(expected.clone())
                );
                assert_eq!(
                    derive_path(env.as_str(), platform.as_str()),
                    Ok(format!("app_config/{expected}"))
                );
                let key = DocumentKey::new(env, platform);
                assert_eq!(key.id(), expected);
                assert_eq!(key.to_string(), expected);
                assert_eq!(expected.parse::<DocumentKey>(), Ok(key));
            }
        }
    }

    #[test]
    fn derive_rejects_unknown_or_missing_identity() {
        for (env, platform) in [("_", "_"), ("", ""), ("dev", ""), ("", "web"), ("prod", "mac")] {
            assert!(
                matches!(
                    derive_key(env, platform),
                    Err(ConfigError::InvalidIdentity { .. })
                ),
                "{env:?}/{platform:?} should be rejected"
            );
            assert!(matches!(
                derive_path(env, platform),
                Err(ConfigError::InvalidIdentity { .. })
            ));
        }
    }

    #[test]
    fn derive_reports_first_failing_component() {
        assert_eq!(
            derive_key("qa", "web"),
            Err(ConfigError::InvalidIdentity {
                field: "env",
                value: Some("qa".into())
            })
        );
        assert_eq!(
            derive_key("dev", "mac"),
            Err(ConfigError::InvalidIdentity {
                field: "platform",
                value: Some("mac".into())
            })
        );
    }

    #[test]
    fn document_key_rejects_malformed_ids() {
        for raw in ["dev", "dev:", ":web", "dev:web:extra", "dev/web", "DEV:WEB"] {
            assert_eq!(
                raw.parse::<DocumentKey>(),
                Err(ConfigError::InvalidDocumentKey {
                    value: raw.to_string()
                })
            );
        }
    }
}

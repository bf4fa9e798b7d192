//! Error types for record identity, schema and version handling.

use std::fmt::{self, Display, Formatter};

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Record identity (environment or platform) was missing or outside the
    /// closed enumerations.
    #[error("invalid record identity '{field}'")]
    InvalidIdentity {
        /// Identity component that failed validation (`env` or `platform`).
        field: &'static str,
        /// Offending value when one was supplied.
        value: Option<String>,
    },
    /// A document key did not have the `<env>:<platform>` shape.
    #[error("invalid document key '{value}'")]
    InvalidDocumentKey {
        /// Key payload provided by the caller.
        value: String,
    },
    /// Version string was not a valid semantic version.
    #[error("invalid semantic version '{value}'")]
    InvalidVersion {
        /// Version payload provided by the caller.
        value: String,
    },
    /// Stored record failed schema validation.
    #[error(transparent)]
    Schema(#[from] SchemaViolation),
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// A single field-level schema failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Stored key of the offending field; empty for the document root.
    pub path: String,
    /// Machine-readable reason for the failure.
    pub reason: &'static str,
}

impl FieldIssue {
    pub(crate) fn new(path: impl Into<String>, reason: &'static str) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }
}

impl Display for FieldIssue {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            formatter.write_str(self.reason)
        } else {
            write!(formatter, "{}: {}", self.path, self.reason)
        }
    }
}

/// Structured failure returned when a raw document does not match the record schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record failed schema validation: {}", render_issues(.issues))]
pub struct SchemaViolation {
    /// Every issue found, in field order.
    pub issues: Vec<FieldIssue>,
}

impl SchemaViolation {
    /// Whether the violation names the given stored key.
    #[must_use]
    pub fn mentions(&self, path: &str) -> bool {
        self.issues.iter().any(|issue| issue.path == path)
    }
}

fn render_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

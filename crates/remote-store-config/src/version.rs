//! Semantic version parsing and comparison for app versions.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use semver::{Prerelease, Version};

use crate::error::{ConfigError, ConfigResult};

/// A client or policy version parsed as a strict semantic version.
///
/// Equality and ordering follow semver precedence, so build metadata is
/// ignored when comparing.
#[derive(Debug, Clone)]
pub struct AppVersion(Version);

impl AppVersion {
    /// Parse a version string, tolerating surrounding whitespace and a single
    /// leading `v`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidVersion`] when the remainder is not a
    /// `major.minor.patch[-pre][+build]` version.
    pub fn parse(value: &str) -> ConfigResult<Self> {
        let trimmed = value.trim();
        let bare = trimmed.strip_prefix('v').unwrap_or(trimmed);
        Version::parse(bare)
            .map(Self)
            .map_err(|_| ConfigError::InvalidVersion {
                value: value.to_string(),
            })
    }

    /// Lenient form used by evaluators: absent or invalid input yields `None`.
    #[must_use]
    pub fn parse_field(value: Option<&str>) -> Option<Self> {
        value.and_then(|raw| Self::parse(raw).ok())
    }

    /// Whether this version satisfies `>=floor` for every supplied floor.
    ///
    /// Absent floors are skipped, so an empty set is vacuously satisfied. A
    /// prerelease only satisfies the set when at least one floor is a
    /// prerelease of the same `major.minor.patch`; `2.0.0-beta.1` does not
    /// meet `>=1.5.0`.
    #[must_use]
    pub fn meets_all<'a>(&self, floors: impl IntoIterator<Item = Option<&'a Self>>) -> bool {
        let floors: Vec<&Self> = floors.into_iter().flatten().collect();
        if floors.is_empty() {
            return true;
        }
        if !floors.iter().all(|floor| self >= *floor) {
            return false;
        }
        self.0.pre.is_empty()
            || floors
                .iter()
                .any(|floor| !floor.0.pre.is_empty() && floor.core() == self.core())
    }

    const fn core(&self) -> (u64, u64, u64) {
        (self.0.major, self.0.minor, self.0.patch)
    }

    fn precedence(&self) -> (u64, u64, u64, &Prerelease) {
        (self.0.major, self.0.minor, self.0.patch, &self.0.pre)
    }
}

impl PartialEq for AppVersion {
    fn eq(&self, other: &Self) -> bool {
        self.precedence() == other.precedence()
    }
}

impl Eq for AppVersion {}

impl PartialOrd for AppVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AppVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.precedence().cmp(&other.precedence())
    }
}

impl FromStr for AppVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for AppVersion {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, formatter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(raw: &str) -> AppVersion {
        AppVersion::parse(raw).expect("valid version")
    }

    #[test]
    fn parse_accepts_prefixes_and_whitespace() {
        assert_eq!(v(" v1.2.3 "), v("1.2.3"));
        assert_eq!(v("1.2.3").to_string(), "1.2.3");
    }

    #[test]
    fn parse_rejects_partial_versions() {
        for raw in ["", "1", "1.2", "1.2.3.4", "latest", "vv1.0.0", "=1.2.3", "V1.2.3"] {
            assert_eq!(
                AppVersion::parse(raw),
                Err(ConfigError::InvalidVersion {
                    value: raw.to_string()
                }),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn parse_field_swallows_invalid_input() {
        assert_eq!(AppVersion::parse_field(None), None);
        assert_eq!(AppVersion::parse_field(Some("nope")), None);
        assert_eq!(AppVersion::parse_field(Some("2.0.0")), Some(v("2.0.0")));
    }

    #[test]
    fn ordering_follows_semver_precedence() {
        assert!(v("1.10.0") > v("1.9.0"));
        assert!(v("1.0.0-beta.1") < v("1.0.0"));
        assert!(v("1.0.0-alpha") < v("1.0.0-beta"));
    }

    #[test]
    fn meets_all_skips_absent_floors() {
        let current = v("1.0.0");
        assert!(current.meets_all([None, None]));
        assert!(current.meets_all([Some(&v("0.9.0")), None]));
        assert!(current.meets_all([Some(&v("1.0.0")), Some(&v("0.1.0"))]));
        assert!(!current.meets_all([Some(&v("0.9.0")), Some(&v("1.5.0"))]));
    }

    #[test]
    fn prerelease_needs_a_matching_prerelease_floor() {
        let beta = v("2.0.0-beta.1");
        assert!(beta.meets_all([None, None]));
        assert!(!beta.meets_all([Some(&v("1.0.0")), Some(&v("1.5.0"))]));
        assert!(beta.meets_all([Some(&v("1.0.0")), Some(&v("2.0.0-alpha"))]));
        assert!(!beta.meets_all([Some(&v("2.0.0-beta.2"))]));
        assert!(!beta.meets_all([Some(&v("1.9.0-rc.1"))]));
    }

    #[test]
    fn build_metadata_does_not_affect_comparison() {
        assert_eq!(v("1.5.0+build.7"), v("1.5.0"));
        assert!(v("1.5.0").meets_all([Some(&v("1.5.0+build.7"))]));
    }
}

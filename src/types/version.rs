//! Version tag grammar.
//!
//! Tags follow the `v`-prefixed semver convention but may be partial:
//! `v1` and `v1.2` are accepted references that the resolver later pins to
//! an exact `vX.Y.Z` tag via the repository's tag list.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^v\d+(\.\d+){0,2}(-[0-9A-Za-z-]+(\.[0-9A-Za-z-]+)*)?(\+[0-9A-Za-z-]+(\.[0-9A-Za-z-]+)*)?$",
    )
    .expect("version regex")
});

static EXACT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^v\d+\.\d+\.\d+(-[0-9A-Za-z-]+(\.[0-9A-Za-z-]+)*)?(\+[0-9A-Za-z-]+(\.[0-9A-Za-z-]+)*)?$",
    )
    .expect("exact version regex")
});

/// Rejected version literal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid version '{0}': expected v<major>[.<minor>[.<patch>]][-prerelease][+build]")]
pub struct VersionError(String);

/// A `v`-prefixed version reference, possibly partial (`v1`, `v1.2`).
///
/// Optional `-prerelease` and `+build` parts use dot-separated
/// alphanumeric/hyphen groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SemanticVersion(String);

impl SemanticVersion {
    /// Parse a version reference, rejecting anything outside the grammar.
    pub fn parse(s: &str) -> Result<Self, VersionError> {
        if VERSION_RE.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(VersionError(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether major, minor, and patch are all present.
    pub fn is_exact(&self) -> bool {
        EXACT_RE.is_match(&self.0)
    }

    /// Refine into an exact version, if this reference already is one.
    pub fn to_exact(&self) -> Option<ExactSemanticVersion> {
        self.is_exact().then(|| ExactSemanticVersion(self.clone()))
    }
}

impl<'de> Deserialize<'de> for SemanticVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SemanticVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A version with major, minor, and patch all present.
///
/// A refinement of [`SemanticVersion`], not a separate representation:
/// release lookups only accept this type, so a partial reference must go
/// through the resolver first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ExactSemanticVersion(SemanticVersion);

impl ExactSemanticVersion {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Widen back to the general version type.
    pub fn as_version(&self) -> &SemanticVersion {
        &self.0
    }
}

impl std::fmt::Display for ExactSemanticVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ExactSemanticVersion {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<ExactSemanticVersion> for SemanticVersion {
    fn from(exact: ExactSemanticVersion) -> Self {
        exact.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_partial_versions() {
        for v in ["v1", "v1.2", "v1.2.3", "v0.10.4"] {
            assert!(SemanticVersion::parse(v).is_ok(), "{v}");
        }
    }

    #[test]
    fn accepts_prerelease_and_build() {
        for v in ["v1.2.3-rc.1", "v1.2.3-alpha", "v1.2.3+build.5", "v1.2.3-rc.1+sha.abc"] {
            assert!(SemanticVersion::parse(v).is_ok(), "{v}");
        }
    }

    #[test]
    fn rejects_missing_v_and_junk() {
        for v in ["1", "1.2.3", "v", "v1.2.3.4", "va.b", "v1 .2", ""] {
            assert!(SemanticVersion::parse(v).is_err(), "{v}");
        }
    }

    #[test]
    fn exactness_requires_three_components() {
        assert!(!SemanticVersion::parse("v1").unwrap().is_exact());
        assert!(!SemanticVersion::parse("v1.2").unwrap().is_exact());
        assert!(SemanticVersion::parse("v1.2.3").unwrap().is_exact());
        assert!(SemanticVersion::parse("v1.2.3-rc.1").unwrap().is_exact());
    }

    #[test]
    fn to_exact_round_trips() {
        let v = SemanticVersion::parse("v1.2.3").unwrap();
        let exact = v.to_exact().unwrap();
        assert_eq!(exact.as_version(), &v);
        assert!(SemanticVersion::parse("v1.2").unwrap().to_exact().is_none());
    }
}

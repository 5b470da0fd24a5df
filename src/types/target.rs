//! Target specifications.
//!
//! A target token names one binary to install:
//! `owner/repo[/binary]@tag[:sha256-<64 hex>]`. A batch of tokens is parsed
//! atomically: any malformed token fails the whole batch with diagnostics,
//! producing no partial results.

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::types::hash::Sha256Hash;
use crate::types::version::{SemanticVersion, VersionError};

/// Identifies a repository by owner and name. Equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepositorySlug {
    pub owner: String,
    pub repository: String,
}

impl RepositorySlug {
    pub fn new(owner: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repository: repository.into(),
        }
    }
}

impl std::fmt::Display for RepositorySlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repository)
    }
}

/// Non-empty base name of the executable to install.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BinaryName(String);

impl BinaryName {
    /// Create a binary name; rejects empty strings and names containing
    /// `/`, `@`, or whitespace.
    pub fn new(s: impl Into<String>) -> Option<Self> {
        let s = s.into();
        if s.is_empty() || s.contains(['/', '@']) || s.contains(char::is_whitespace) {
            None
        } else {
            Some(Self(s))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BinaryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for BinaryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One requested install target, as written by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetRelease {
    pub slug: RepositorySlug,
    pub binary_name: Option<BinaryName>,
    pub tag: SemanticVersion,
    pub checksum: Option<Sha256Hash>,
}

/// A single malformed target token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetTokenError {
    #[error("Invalid target '{token}': expected owner/repo[/binary]@tag[:sha256-<checksum>]")]
    Shape { token: String },

    #[error("Invalid target '{token}': {source}")]
    Version {
        token: String,
        source: VersionError,
    },

    #[error("Invalid target '{token}': checksum must be 'sha256-' followed by 64 lowercase hex chars")]
    Checksum { token: String },
}

impl FromStr for TargetRelease {
    type Err = TargetTokenError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let shape_err = || TargetTokenError::Shape {
            token: token.to_string(),
        };

        let (path, rest) = token.split_once('@').ok_or_else(shape_err)?;

        let (tag, checksum) = match rest.split_once(':') {
            Some((tag, checksum)) => (tag, Some(checksum)),
            None => (rest, None),
        };

        let segments: Vec<&str> = path.split('/').collect();
        let (owner, repository, binary) = match segments.as_slice() {
            [owner, repository] => (*owner, *repository, None),
            [owner, repository, binary] => (*owner, *repository, Some(*binary)),
            _ => return Err(shape_err()),
        };
        if owner.is_empty() || repository.is_empty() {
            return Err(shape_err());
        }
        let binary_name = match binary {
            Some(b) => Some(BinaryName::new(b).ok_or_else(shape_err)?),
            None => None,
        };

        let tag = SemanticVersion::parse(tag).map_err(|source| TargetTokenError::Version {
            token: token.to_string(),
            source,
        })?;

        let checksum = match checksum {
            Some(c) => {
                let hex = c
                    .strip_prefix("sha256-")
                    .ok_or_else(|| TargetTokenError::Checksum {
                        token: token.to_string(),
                    })?;
                Some(
                    Sha256Hash::new(hex).map_err(|_| TargetTokenError::Checksum {
                        token: token.to_string(),
                    })?,
                )
            }
            None => None,
        };

        Ok(Self {
            slug: RepositorySlug::new(owner, repository),
            binary_name,
            tag,
            checksum,
        })
    }
}

/// Batch parse failure; carries one diagnostic per offending token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", diagnostics.join("\n"))]
pub struct TargetParseError {
    pub diagnostics: Vec<String>,
}

/// Parse a whitespace-separated list of target tokens.
///
/// Surrounding whitespace (including newlines) is trimmed and tokens are
/// split on whitespace runs. Fails wholesale if the input is empty or any
/// token is malformed; on success the records preserve input order.
pub fn parse_target_releases(input: &str) -> Result<Vec<TargetRelease>, TargetParseError> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(TargetParseError {
            diagnostics: vec!["No install targets specified".to_string()],
        });
    }

    let mut targets = Vec::with_capacity(tokens.len());
    let mut diagnostics = Vec::new();
    for token in tokens {
        match token.parse::<TargetRelease>() {
            Ok(target) => targets.push(target),
            Err(e) => diagnostics.push(e.to_string()),
        }
    }

    if diagnostics.is_empty() {
        Ok(targets)
    } else {
        Err(TargetParseError { diagnostics })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_target() {
        let targets = parse_target_releases("owner/repo@v1").unwrap();
        assert_eq!(targets.len(), 1);
        let t = &targets[0];
        assert_eq!(t.slug, RepositorySlug::new("owner", "repo"));
        assert_eq!(t.binary_name, None);
        assert_eq!(t.tag.as_str(), "v1");
        assert_eq!(t.checksum, None);
    }

    #[test]
    fn parses_binary_and_checksum() {
        let hash = "ab".repeat(32);
        let input = format!("owner/repo/bin@v1.2.3:sha256-{hash}");
        let targets = parse_target_releases(&input).unwrap();
        let t = &targets[0];
        assert_eq!(t.binary_name.as_ref().unwrap().as_str(), "bin");
        assert_eq!(t.checksum.as_ref().unwrap().as_str(), hash);
    }

    #[test]
    fn splits_on_arbitrary_whitespace_and_preserves_order() {
        let input = "\n  a/b@v1 \t c/d@v2.0\n\ne/f/bin@v3.1.4  \n";
        let targets = parse_target_releases(input).unwrap();
        let repos: Vec<_> = targets.iter().map(|t| t.slug.to_string()).collect();
        assert_eq!(repos, ["a/b", "c/d", "e/f"]);
    }

    #[test]
    fn rejects_empty_input() {
        let err = parse_target_releases("").unwrap_err();
        assert_eq!(err.diagnostics.len(), 1);
        assert!(parse_target_releases("  \n ").is_err());
    }

    #[test]
    fn rejects_missing_tag_and_bad_version() {
        assert!(parse_target_releases("foo/bar").is_err());
        // missing `v` prefix
        assert!(parse_target_releases("foo/bar@1").is_err());
        assert!(parse_target_releases("foo/bar@v1.x").is_err());
    }

    #[test]
    fn rejects_malformed_checksum() {
        assert!(parse_target_releases("a/b@v1:sha256-short").is_err());
        assert!(parse_target_releases("a/b@v1:md5-abcd").is_err());
        let upper = "AB".repeat(32);
        assert!(parse_target_releases(&format!("a/b@v1:sha256-{upper}")).is_err());
    }

    #[test]
    fn fails_wholesale_with_one_diagnostic_per_bad_token() {
        let err = parse_target_releases("good/one@v1 bad bad2@nope").unwrap_err();
        assert_eq!(err.diagnostics.len(), 2);
    }

    #[test]
    fn rejects_extra_or_empty_path_segments() {
        assert!(parse_target_releases("a/b/c/d@v1").is_err());
        assert!(parse_target_releases("/b@v1").is_err());
        assert!(parse_target_releases("a/@v1").is_err());
        assert!(parse_target_releases("a/b/@v1").is_err());
    }

    #[test]
    fn parsing_is_pure() {
        let input = "owner/repo/bin@v1.2.3";
        assert_eq!(
            parse_target_releases(input).unwrap(),
            parse_target_releases(input).unwrap()
        );
    }
}

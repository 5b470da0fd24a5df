//! Version reference resolution.
//!
//! A target may pin a partial version like `v1`; release lookups need the
//! exact `vX.Y.Z` tag it denotes. The repository's tag list is ground
//! truth: the partial tag and its exact counterpart point at the same
//! commit, so a single pass over the list looking for a shared commit sha
//! resolves the reference no matter which of the two tags appears first.

use std::collections::HashMap;

use thiserror::Error;

use crate::registry::{RegistryError, Tag, TagSource};
use crate::types::version::ExactSemanticVersion;
use crate::types::{RepositorySlug, SemanticVersion, Sha1Hash};

/// Why a reference could not be pinned to an exact tag.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Could not resolve version {reference} for {slug}: no matching exact tag")]
    VersionNotFound {
        reference: SemanticVersion,
        slug: RepositorySlug,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Fold state for the tag scan.
///
/// Tracks the commit sha of the reference tag once seen, and the exact
/// tags recorded per sha so far. Explicit rather than closed over so the
/// scan can be exercised without a tag source.
#[derive(Debug, Default)]
pub struct TagScan {
    reference_sha: Option<Sha1Hash>,
    exact_by_sha: HashMap<Sha1Hash, Vec<ExactSemanticVersion>>,
}

impl TagScan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one tag into the scan; returns the resolved exact version as
    /// soon as the reference and an exact tag are known to share a sha.
    pub fn observe(
        &mut self,
        reference: &SemanticVersion,
        tag: &Tag,
    ) -> Option<ExactSemanticVersion> {
        if tag.name == *reference {
            self.reference_sha = Some(tag.sha.clone());
            return self
                .exact_by_sha
                .get(&tag.sha)
                .and_then(|exacts| exacts.first().cloned());
        }

        if let Some(exact) = tag.name.to_exact() {
            if self.reference_sha.as_ref() == Some(&tag.sha) {
                return Some(exact);
            }
            self.exact_by_sha.entry(tag.sha.clone()).or_default().push(exact);
        }

        // Neither the reference nor an exact version: ignored.
        None
    }
}

/// Pin a version reference to the exact tag it denotes.
///
/// An already-exact reference is returned as-is without consulting the
/// source. Otherwise tag pages are drained in order until the scan
/// resolves or the list is exhausted.
pub async fn resolve_exact_version<S: TagSource + Sync>(
    source: &S,
    slug: &RepositorySlug,
    reference: &SemanticVersion,
) -> Result<ExactSemanticVersion, ResolveError> {
    if let Some(exact) = reference.to_exact() {
        return Ok(exact);
    }

    let mut scan = TagScan::new();
    let mut page = 1;
    loop {
        let tags = source.tag_page(slug, page).await?;
        if tags.is_empty() {
            break;
        }
        for tag in &tags {
            if let Some(exact) = scan.observe(reference, tag) {
                tracing::debug!(%reference, %exact, %slug, "resolved version reference");
                return Ok(exact);
            }
        }
        page += 1;
    }

    Err(ResolveError::VersionNotFound {
        reference: reference.clone(),
        slug: slug.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct PagedTags(Vec<Vec<Tag>>);

    #[async_trait]
    impl TagSource for PagedTags {
        async fn tag_page(
            &self,
            _slug: &RepositorySlug,
            page: u32,
        ) -> Result<Vec<Tag>, RegistryError> {
            Ok(self.0.get(page as usize - 1).cloned().unwrap_or_default())
        }
    }

    struct FailingTags;

    #[async_trait]
    impl TagSource for FailingTags {
        async fn tag_page(
            &self,
            _slug: &RepositorySlug,
            _page: u32,
        ) -> Result<Vec<Tag>, RegistryError> {
            panic!("exact references must not touch the tag source");
        }
    }

    fn tag(name: &str, sha: char) -> Tag {
        Tag {
            name: SemanticVersion::parse(name).unwrap(),
            sha: Sha1Hash::new(sha.to_string().repeat(40)).unwrap(),
        }
    }

    fn slug() -> RepositorySlug {
        RepositorySlug::new("octo", "tool")
    }

    fn reference(s: &str) -> SemanticVersion {
        SemanticVersion::parse(s).unwrap()
    }

    #[tokio::test]
    async fn exact_reference_passes_through_without_lookup() {
        let resolved = resolve_exact_version(&FailingTags, &slug(), &reference("v1.2.3"))
            .await
            .unwrap();
        assert_eq!(resolved.as_str(), "v1.2.3");
    }

    #[tokio::test]
    async fn resolves_when_reference_tag_comes_first() {
        let source = PagedTags(vec![vec![
            tag("v1", 'a'),
            tag("v2.0.0", 'b'),
            tag("v1.2.3", 'a'),
        ]]);
        let resolved = resolve_exact_version(&source, &slug(), &reference("v1"))
            .await
            .unwrap();
        assert_eq!(resolved.as_str(), "v1.2.3");
    }

    #[tokio::test]
    async fn resolves_when_exact_tag_comes_first() {
        let source = PagedTags(vec![vec![
            tag("v1.2.3", 'a'),
            tag("v2.0.0", 'b'),
            tag("v1", 'a'),
        ]]);
        let resolved = resolve_exact_version(&source, &slug(), &reference("v1"))
            .await
            .unwrap();
        assert_eq!(resolved.as_str(), "v1.2.3");
    }

    #[tokio::test]
    async fn resolves_across_page_boundaries() {
        let source = PagedTags(vec![
            vec![tag("v0.9.0", 'c'), tag("v1", 'a')],
            vec![tag("v1.2.3", 'a')],
        ]);
        let resolved = resolve_exact_version(&source, &slug(), &reference("v1"))
            .await
            .unwrap();
        assert_eq!(resolved.as_str(), "v1.2.3");
    }

    #[tokio::test]
    async fn partial_tags_on_other_commits_are_ignored() {
        let source = PagedTags(vec![vec![
            tag("v2", 'b'),
            tag("v1", 'a'),
            tag("v2.0.0", 'b'),
            tag("v1.2.3", 'a'),
        ]]);
        let resolved = resolve_exact_version(&source, &slug(), &reference("v1"))
            .await
            .unwrap();
        assert_eq!(resolved.as_str(), "v1.2.3");
    }

    #[tokio::test]
    async fn exhausted_stream_is_not_found() {
        let source = PagedTags(vec![vec![tag("v2.0.0", 'b'), tag("v3", 'c')]]);
        let err = resolve_exact_version(&source, &slug(), &reference("v1"))
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("v1"), "{msg}");
        assert!(msg.contains("octo/tool"), "{msg}");
    }

    #[test]
    fn scan_keeps_first_exact_tag_per_sha() {
        let mut scan = TagScan::new();
        let reference = reference("v1");
        assert!(scan.observe(&reference, &tag("v1.2.3", 'a')).is_none());
        assert!(scan.observe(&reference, &tag("v1.2.4", 'a')).is_none());
        let resolved = scan.observe(&reference, &tag("v1", 'a')).unwrap();
        assert_eq!(resolved.as_str(), "v1.2.3");
    }
}

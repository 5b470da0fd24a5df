//! Release registry access.
//!
//! The core resolution logic never talks to the network directly; it
//! consumes the [`TagSource`] and [`ReleaseSource`] traits defined here.
//! [`github::GithubClient`] is the live implementation.

pub mod github;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header;
use thiserror::Error;

use crate::types::version::ExactSemanticVersion;
use crate::types::{RepositorySlug, SemanticVersion, Sha1Hash};

/// One entry from a repository's tag list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: SemanticVersion,
    pub sha: Sha1Hash,
}

/// One downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAsset {
    pub label: Option<String>,
    pub name: Option<String>,
    pub url: String,
}

/// Release metadata for an exact tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub assets: Vec<ReleaseAsset>,
}

/// Registry communication failure.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Registry returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
}

/// Ordered, paginated tag listing for a repository.
///
/// Pages are numbered from 1; an empty page means the list is exhausted.
/// Order matters: the version resolver folds over tags strictly in the
/// order this source yields them.
#[async_trait]
pub trait TagSource {
    async fn tag_page(&self, slug: &RepositorySlug, page: u32) -> Result<Vec<Tag>, RegistryError>;
}

/// Release metadata lookup for an exact tag.
#[async_trait]
pub trait ReleaseSource {
    async fn release_by_tag(
        &self,
        slug: &RepositorySlug,
        tag: &ExactSemanticVersion,
    ) -> Result<Release, RegistryError>;
}

/// Build an authenticated GitHub client.
pub fn build_github_client(token: Option<&str>) -> Result<reqwest::Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        header::HeaderValue::from_static(crate::USER_AGENT),
    );

    if let Some(t) = token {
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {t}"))?,
        );
    }

    Ok(reqwest::Client::builder()
        .default_headers(headers)
        .build()?)
}

//! GitHub REST implementations of the registry traits.

use async_trait::async_trait;
use serde::Deserialize;

use crate::registry::{Release, ReleaseAsset, ReleaseSource, RegistryError, Tag, TagSource};
use crate::types::version::ExactSemanticVersion;
use crate::types::{RepositorySlug, SemanticVersion, Sha1Hash};

const API_BASE: &str = "https://api.github.com";
const TAGS_PER_PAGE: u32 = 100;

#[derive(Debug, Deserialize)]
struct GithubTag {
    name: String,
    commit: GithubCommit,
}

#[derive(Debug, Deserialize)]
struct GithubCommit {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct GithubRelease {
    assets: Vec<GithubAsset>,
}

#[derive(Debug, Deserialize)]
struct GithubAsset {
    label: Option<String>,
    name: Option<String>,
    browser_download_url: String,
}

/// GitHub REST API client for tag listings and release metadata.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: reqwest::Client,
    base_url: String,
}

impl GithubClient {
    /// Client against the public GitHub API.
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, API_BASE)
    }

    /// Client against an alternate API root (tests, GitHub Enterprise).
    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
    ) -> Result<T, RegistryError> {
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(RegistryError::Status { status, url });
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl TagSource for GithubClient {
    async fn tag_page(&self, slug: &RepositorySlug, page: u32) -> Result<Vec<Tag>, RegistryError> {
        let url = format!(
            "{}/repos/{}/{}/tags?per_page={TAGS_PER_PAGE}&page={page}",
            self.base_url, slug.owner, slug.repository
        );
        let raw: Vec<GithubTag> = self.get_json(url).await?;

        // Tags outside the version grammar can never resolve a reference;
        // drop them here so the fold only sees well-formed entries.
        let mut tags = Vec::with_capacity(raw.len());
        for t in raw {
            match (SemanticVersion::parse(&t.name), Sha1Hash::new(t.commit.sha)) {
                (Ok(name), Ok(sha)) => tags.push(Tag { name, sha }),
                _ => tracing::debug!(tag = %t.name, %slug, "skipping non-version tag"),
            }
        }
        Ok(tags)
    }
}

#[async_trait]
impl ReleaseSource for GithubClient {
    async fn release_by_tag(
        &self,
        slug: &RepositorySlug,
        tag: &ExactSemanticVersion,
    ) -> Result<Release, RegistryError> {
        let url = format!(
            "{}/repos/{}/{}/releases/tags/{tag}",
            self.base_url, slug.owner, slug.repository
        );
        let raw: GithubRelease = self.get_json(url).await?;
        Ok(Release {
            assets: raw
                .assets
                .into_iter()
                .map(|a| ReleaseAsset {
                    label: a.label,
                    name: a.name,
                    url: a.browser_download_url,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn page_query(page: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("per_page".into(), "100".into()),
            Matcher::UrlEncoded("page".into(), page.into()),
        ])
    }

    #[tokio::test]
    async fn lists_tags_and_skips_non_version_names() {
        let mut server = mockito::Server::new_async().await;
        let sha = "1".repeat(40);
        let body = serde_json::json!([
            {"name": "v1.2.3", "commit": {"sha": sha}},
            {"name": "nightly", "commit": {"sha": sha}},
            {"name": "v1", "commit": {"sha": sha}},
        ])
        .to_string();
        let mock = server
            .mock("GET", "/repos/octo/tool/tags")
            .match_query(page_query("1"))
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let client = GithubClient::with_base_url(reqwest::Client::new(), server.url());
        let slug = RepositorySlug::new("octo", "tool");
        let tags = client.tag_page(&slug, 1).await.unwrap();

        mock.assert_async().await;
        let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["v1.2.3", "v1"]);
    }

    #[tokio::test]
    async fn empty_page_signals_exhaustion() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/octo/tool/tags")
            .match_query(page_query("7"))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = GithubClient::with_base_url(reqwest::Client::new(), server.url());
        let slug = RepositorySlug::new("octo", "tool");
        assert!(client.tag_page(&slug, 7).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetches_release_assets_by_tag() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/octo/tool/releases/tags/v1.2.3")
            .with_status(200)
            .with_body(
                r#"{"assets": [
                    {"label": "tool-darwin-arm64", "name": "tool.zip",
                     "browser_download_url": "https://example.com/tool.zip"},
                    {"label": null, "name": "checksums.txt",
                     "browser_download_url": "https://example.com/checksums.txt"}
                ]}"#,
            )
            .create_async()
            .await;

        let client = GithubClient::with_base_url(reqwest::Client::new(), server.url());
        let slug = RepositorySlug::new("octo", "tool");
        let tag = SemanticVersion::parse("v1.2.3").unwrap().to_exact().unwrap();
        let release = client.release_by_tag(&slug, &tag).await.unwrap();

        assert_eq!(release.assets.len(), 2);
        assert_eq!(
            release.assets[0].label.as_deref(),
            Some("tool-darwin-arm64")
        );
        assert_eq!(release.assets[1].label, None);
    }

    #[tokio::test]
    async fn surfaces_api_status_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/octo/tool/releases/tags/v9.9.9")
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;

        let client = GithubClient::with_base_url(reqwest::Client::new(), server.url());
        let slug = RepositorySlug::new("octo", "tool");
        let tag = SemanticVersion::parse("v9.9.9").unwrap().to_exact().unwrap();
        let err = client.release_by_tag(&slug, &tag).await.unwrap_err();
        assert!(matches!(err, RegistryError::Status { status, .. } if status == 404));
    }
}

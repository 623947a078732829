//! GitHub source implementation.

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use crate::http::HttpClient;

use super::{Release, ReleaseAsset, RepoId, Source};

/// Default GitHub REST API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub API response types (internal).
mod api {
    use chrono::{DateTime, Utc};
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct Release {
        pub tag_name: String,
        pub name: Option<String>,
        pub published_at: Option<DateTime<Utc>>,
        #[serde(default)]
        pub prerelease: bool,
        pub body: Option<String>,
        #[serde(default)]
        pub assets: Vec<Asset>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Asset {
        pub name: String,
        pub size: u64,
        pub browser_download_url: String,
    }
}

/// GitHub source implementation.
#[derive(Debug)]
pub struct GitHubSource {
    http_client: HttpClient,
    api_url: String,
}

impl GitHubSource {
    /// Create a GitHub source rooted at `api_url` (e.g. [`DEFAULT_API_URL`]).
    pub fn with_api_url(client: Client, api_url: &str) -> Self {
        Self {
            http_client: HttpClient::new(client),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    // A single page: the first page GitHub returns is all that is shown.
    async fn fetch_releases(&self, repo: &RepoId) -> Result<Vec<api::Release>> {
        let url = format!("{}/repos/{}/{}/releases", self.api_url, repo.owner, repo.repo);
        debug!("Fetching releases from {}...", url);
        self.http_client.get_json(&url).await
    }
}

#[async_trait]
impl Source for GitHubSource {
    #[tracing::instrument(skip(self))]
    async fn get_releases(&self, repo: &RepoId) -> Result<Vec<Release>> {
        let releases = self.fetch_releases(repo).await?;
        debug!("Fetched {} releases for {}", releases.len(), repo);
        Ok(releases.into_iter().map(|r| r.into()).collect())
    }
}

impl From<api::Release> for Release {
    fn from(r: api::Release) -> Self {
        Release {
            tag: r.tag_name,
            name: r.name,
            published_at: r.published_at,
            prerelease: r.prerelease,
            body: r.body.unwrap_or_default(),
            assets: r.assets.into_iter().map(|a| a.into()).collect(),
        }
    }
}

impl From<api::Asset> for ReleaseAsset {
    fn from(a: api::Asset) -> Self {
        ReleaseAsset {
            name: a.name,
            size: a.size,
            download_url: a.browser_download_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn test_repo() -> RepoId {
        RepoId {
            owner: "test-owner".to_string(),
            repo: "test-repo".to_string(),
        }
    }

    #[tokio::test]
    async fn test_get_releases_with_trailing_slash_api_url() {
        let mut server = mockito::Server::new_async().await;
        let url = format!("{}/", server.url());

        let mock = server
            .mock("GET", "/repos/test-owner/test-repo/releases")
            .with_status(200)
            .with_body("[]")
            .expect(1)
            .create_async()
            .await;

        let source = GitHubSource::with_api_url(Client::new(), &url);
        let releases = source.get_releases(&test_repo()).await.unwrap();

        mock.assert_async().await;
        assert!(releases.is_empty());
    }

    #[tokio::test]
    async fn test_get_releases() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/repos/test-owner/test-repo/releases")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {
                        "name": "v1.0",
                        "tag_name": "v1.0",
                        "published_at": "2024-01-15T00:00:00Z",
                        "prerelease": false,
                        "body": "Notes",
                        "html_url": "https://github.com/test-owner/test-repo/releases/tag/v1.0",
                        "assets": [
                            {
                                "name": "app.zip",
                                "size": 2097152,
                                "browser_download_url": "https://x/app.zip",
                                "download_count": 3
                            }
                        ]
                    },
                    {
                        "name": null,
                        "tag_name": "v0.9.0-rc.1",
                        "published_at": "2023-12-01T10:30:00Z",
                        "prerelease": true,
                        "body": null,
                        "assets": []
                    }
                ]"#,
            )
            .create_async()
            .await;

        let source = GitHubSource::with_api_url(Client::new(), &url);
        let releases = source.get_releases(&test_repo()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(releases.len(), 2);

        assert_eq!(releases[0].tag, "v1.0");
        assert_eq!(releases[0].name.as_deref(), Some("v1.0"));
        assert_eq!(
            releases[0].published_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap())
        );
        assert!(!releases[0].prerelease);
        assert_eq!(releases[0].body, "Notes");
        assert_eq!(
            releases[0].assets,
            vec![ReleaseAsset {
                name: "app.zip".to_string(),
                size: 2097152,
                download_url: "https://x/app.zip".to_string(),
            }]
        );

        assert_eq!(releases[1].tag, "v0.9.0-rc.1");
        assert_eq!(releases[1].name, None);
        assert!(releases[1].prerelease);
        assert_eq!(releases[1].body, "");
        assert!(releases[1].assets.is_empty());
    }

    #[tokio::test]
    async fn test_get_releases_keeps_source_order() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        // Deliberately not newest-first, and with a duplicate tag
        let mock = server
            .mock("GET", "/repos/test-owner/test-repo/releases")
            .with_status(200)
            .with_body(
                r#"[
                    {"tag_name": "v0.1.0", "published_at": "2020-01-01T00:00:00Z", "body": "", "assets": []},
                    {"tag_name": "v2.0.0", "published_at": "2022-01-01T00:00:00Z", "body": "", "assets": []},
                    {"tag_name": "v0.1.0", "published_at": "2020-01-01T00:00:00Z", "body": "", "assets": []}
                ]"#,
            )
            .create_async()
            .await;

        let source = GitHubSource::with_api_url(Client::new(), &url);
        let releases = source.get_releases(&test_repo()).await.unwrap();

        mock.assert_async().await;
        let tags: Vec<&str> = releases.iter().map(|r| r.tag.as_str()).collect();
        assert_eq!(tags, vec!["v0.1.0", "v2.0.0", "v0.1.0"]);
    }

    #[tokio::test]
    async fn test_get_releases_empty() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/repos/test-owner/test-repo/releases")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let source = GitHubSource::with_api_url(Client::new(), &url);
        let releases = source.get_releases(&test_repo()).await.unwrap();

        mock.assert_async().await;
        assert!(releases.is_empty());
    }

    #[tokio::test]
    async fn test_get_releases_not_found() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/repos/test-owner/test-repo/releases")
            .with_status(404)
            .create_async()
            .await;

        let source = GitHubSource::with_api_url(Client::new(), &url);
        let result = source.get_releases(&test_repo()).await;

        mock.assert_async().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_get_releases_rejects_malformed_date() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/repos/test-owner/test-repo/releases")
            .with_status(200)
            .with_body(r#"[{"tag_name": "v1", "published_at": "yesterday", "assets": []}]"#)
            .create_async()
            .await;

        let source = GitHubSource::with_api_url(Client::new(), &url);
        let result = source.get_releases(&test_repo()).await;

        mock.assert_async().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_get_releases_rejects_non_array() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/repos/test-owner/test-repo/releases")
            .with_status(200)
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;

        let source = GitHubSource::with_api_url(Client::new(), &url);
        let result = source.get_releases(&test_repo()).await;

        mock.assert_async().await;
        assert!(result.is_err());
    }
}

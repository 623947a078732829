//! Release sources.
//!
//! A [`Source`] is the fetch capability the renderer depends on: given a
//! repository it returns that repository's releases in the order the remote
//! side lists them. [`GitHubSource`] talks to the GitHub REST API.

mod github;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

pub use github::{DEFAULT_API_URL, GitHubSource};

/// Repository identifier (owner/repo format).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl RepoId {
    /// Public page listing the repository's releases.
    pub fn releases_page_url(&self) -> String {
        format!("https://github.com/{}/{}/releases", self.owner, self.repo)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            anyhow::bail!("Invalid repository format. Expected 'owner/repo'.")
        } else {
            Ok(RepoId {
                owner: parts[0].to_string(),
                repo: parts[1].to_string(),
            })
        }
    }
}

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseAsset {
    pub name: String,
    pub size: u64,
    pub download_url: String,
}

/// A release from the source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Release {
    /// Version tag (e.g., "v1.0.0")
    pub tag: String,
    /// Release name/title
    pub name: Option<String>,
    /// Publication time, absent for unpublished releases
    pub published_at: Option<DateTime<Utc>>,
    /// Whether this is a pre-release
    pub prerelease: bool,
    /// Release notes (Markdown)
    pub body: String,
    /// Downloadable assets, in source order
    pub assets: Vec<ReleaseAsset>,
}

impl Release {
    /// Display title: the release name, or the tag when the name is missing or empty.
    pub fn title(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.tag,
        }
    }
}

/// Fetch capability for release lists.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Source: Send + Sync {
    /// Fetch the releases of a repository, in the order the source returns them.
    async fn get_releases(&self, repo: &RepoId) -> Result<Vec<Release>>;
}

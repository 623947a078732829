use anyhow::Result;
use log::debug;
use reqwest::Client;

use crate::{
    markdown::{ComrakMarkdown, MarkdownRenderer},
    runtime::Runtime,
    source::{DEFAULT_API_URL, GitHubSource, Source},
};

/// User agent sent with every API request; GitHub rejects requests without one.
pub const USER_AGENT: &str = "releasepage-cli";

pub struct Config<R: Runtime, S: Source, M: MarkdownRenderer> {
    pub runtime: R,
    pub source: S,
    pub markdown: M,
}

impl<R: Runtime> Config<R, GitHubSource, ComrakMarkdown> {
    pub fn new(runtime: R, api_url: Option<String>) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        let api_url = api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        debug!("Using API URL: {}", api_url);

        Ok(Self {
            runtime,
            source: GitHubSource::with_api_url(client, &api_url),
            markdown: ComrakMarkdown,
        })
    }
}

//! HTTP client for JSON endpoints.

use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Thin wrapper around a reqwest Client for one-shot JSON requests.
///
/// Requests are issued exactly once. A failed request is reported to the
/// caller as-is; there is no retry.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Performs a GET request and deserializes the JSON response.
    ///
    /// Non-2xx responses are errors, as are bodies that do not decode into `T`.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET JSON from {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        let response = response
            .error_for_status()
            .context("Server responded with an error status")?;

        response
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }
}

use std::time::Duration;

use super::picker::{FetchFuture, PeerFetcher};
use super::protocol::fetch_url;
use crate::error::FetchError;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(3);

/// Fetches values from one remote peer over HTTP.
///
/// Every request carries a deadline so that a hung peer costs the caller at
/// most `timeout` before it falls back to a local load.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new(), DEFAULT_FETCH_TIMEOUT)
    }

    /// Builds a fetcher that reuses an existing connection pool.
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            client,
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get(&self, group: &str, key: &str) -> Result<Vec<u8>, FetchError> {
        let url = fetch_url(&self.base_url, group, key);

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(FetchError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status });
        }

        let body = response.bytes().await.map_err(FetchError::Body)?;
        Ok(body.to_vec())
    }
}

impl PeerFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, group: &'a str, key: &'a str) -> FetchFuture<'a> {
        Box::pin(self.get(group, key))
    }
}

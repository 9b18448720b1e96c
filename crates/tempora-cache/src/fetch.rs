//! The transport seam the HTTP clients are generic over.
//!
//! `NetFetcher` is the plain transport; `CacheWorker` implements the same
//! trait with the offline policies applied, so the cache sits beneath the
//! clients without them knowing.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// A completed GET request, from the network or from the cache.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    /// When the body was produced: now for network responses, the original
    /// store time for cached copies. Surfaces the "last updated" timestamp
    /// of the prior success when stale data is served.
    pub fetched_at: DateTime<Utc>,
    pub served_from_cache: bool,
}

impl FetchedResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Transport and cache-storage errors.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    /// Transport failed and no cached copy exists for the request.
    #[error("Offline and no cached copy for {0}")]
    Offline(String),

    #[error("Cache storage error: {0}")]
    Storage(String),
}

/// GET-only fetch abstraction.
pub trait Fetch: Send + Sync {
    fn get(&self, url: Url) -> impl Future<Output = Result<FetchedResponse, FetchError>> + Send;
}

/// Plain network transport with a bounded timeout.
#[derive(Debug, Clone)]
pub struct NetFetcher {
    client: reqwest::Client,
}

impl NetFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub(crate) async fn get_response(&self, url: &Url) -> Result<FetchedResponse, reqwest::Error> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.bytes().await?.to_vec();

        Ok(FetchedResponse {
            status,
            content_type,
            body,
            fetched_at: Utc::now(),
            served_from_cache: false,
        })
    }
}

impl Fetch for NetFetcher {
    async fn get(&self, url: Url) -> Result<FetchedResponse, FetchError> {
        Ok(self.get_response(&url).await?)
    }
}

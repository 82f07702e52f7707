//! Point set sources: the HTTP point set manager client and a fixed source.

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use thiserror::Error;

/// Default timeout for point set fetches (10 seconds)
const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of retry attempts for transient failures
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Default base delay for exponential backoff (200 milliseconds)
const DEFAULT_BASE_DELAY_MS: u64 = 200;

/// Point set served by [`StaticPointSetSource::default`]: the triangle
/// `(0, 0), (1, 0), (0, 1)`.
pub const DEFAULT_MOCK_POINTSET: &[u8] = b"\x00\x00\x00\x03\
\x00\x00\x00\x00\x00\x00\x00\x00\
\x3f\x80\x00\x00\x00\x00\x00\x00\
\x00\x00\x00\x00\x3f\x80\x00\x00";

/// Errors raised while fetching a point set.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("point set {0} not found")]
    NotFound(String),

    #[error("point set manager unavailable: {0}")]
    Unavailable(String),

    #[error("point set fetch timed out after {0}s")]
    Timeout(u64),

    #[error("point set manager returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("invalid point set URL: {0}")]
    InvalidUrl(String),

    #[error("point set request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// Anything that can produce encoded point sets by id.
pub trait PointSetSource: Send + Sync {
    fn fetch<'a>(&'a self, pointset_id: &'a str) -> BoxFuture<'a, Result<Vec<u8>, FetchError>>;
}

/// HTTP client for the point set manager.
///
/// Fetches `GET {base_url}/pointsets/{id}` and returns the raw body. Connection
/// errors and 5xx responses are retried with exponential backoff.
pub struct PointSetClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    max_retries: u32,
    base_delay_ms: u64,
}

impl PointSetClient {
    /// Create a client for the point set manager at `base_url`
    /// (e.g. "http://pointset-manager:5000").
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_FETCH_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the base delay for exponential backoff (in milliseconds)
    pub fn with_base_delay_ms(mut self, delay_ms: u64) -> Self {
        self.base_delay_ms = delay_ms;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base_url}/pointsets/{id}` with the id percent-encoded as a single
    /// path segment.
    fn pointset_url(&self, pointset_id: &str) -> Result<Url, FetchError> {
        if matches!(pointset_id, "" | "." | "..") {
            return Err(FetchError::InvalidUrl(format!(
                "{pointset_id:?} is not a valid point set id"
            )));
        }

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .push("pointsets")
            .push(pointset_id);
        Ok(url)
    }

    /// Fetch the encoded point set stored under `pointset_id`.
    ///
    /// # Errors
    ///
    /// - `FetchError::NotFound` - the manager answered 404
    /// - `FetchError::Unavailable` - connection failed or 503, after retries
    /// - `FetchError::Timeout` - the request exceeded the timeout
    /// - `FetchError::Upstream` - any other non-success status
    /// - `FetchError::InvalidUrl` - the base URL or id cannot form a request URL
    pub async fn fetch_pointset(&self, pointset_id: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.pointset_url(pointset_id)?;
        let mut attempt = 0;

        loop {
            let response = self
                .client
                .get(url.clone())
                .timeout(self.timeout)
                .send()
                .await;

            let retryable = match response {
                Ok(resp) => {
                    let status = resp.status();

                    if status.is_success() {
                        let body = resp.bytes().await?;
                        return Ok(body.to_vec());
                    }

                    if status == StatusCode::NOT_FOUND {
                        return Err(FetchError::NotFound(pointset_id.to_string()));
                    }

                    let message = resp
                        .text()
                        .await
                        .unwrap_or_else(|_| status.to_string());

                    if !status.is_server_error() {
                        return Err(FetchError::Upstream {
                            status: status.as_u16(),
                            message,
                        });
                    }

                    if status == StatusCode::SERVICE_UNAVAILABLE {
                        FetchError::Unavailable(message)
                    } else {
                        FetchError::Upstream {
                            status: status.as_u16(),
                            message,
                        }
                    }
                }
                Err(e) => {
                    if e.is_timeout() {
                        return Err(FetchError::Timeout(self.timeout.as_secs()));
                    }
                    if !e.is_connect() {
                        return Err(FetchError::RequestFailed(e));
                    }
                    FetchError::Unavailable(format!(
                        "failed to connect to {} after {} attempts",
                        self.base_url,
                        attempt + 1
                    ))
                }
            };

            if attempt >= self.max_retries {
                return Err(retryable);
            }

            let delay = self.calculate_backoff_delay(attempt);
            tracing::debug!(
                "Retrying point set {} in {:?} ({})",
                pointset_id,
                delay,
                retryable
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Calculate exponential backoff delay for retry attempts
    fn calculate_backoff_delay(&self, attempt: u32) -> Duration {
        let delay_ms = self.base_delay_ms.saturating_mul(2u64.saturating_pow(attempt));
        Duration::from_millis(delay_ms)
    }
}

impl PointSetSource for PointSetClient {
    fn fetch<'a>(&'a self, pointset_id: &'a str) -> BoxFuture<'a, Result<Vec<u8>, FetchError>> {
        self.fetch_pointset(pointset_id).boxed()
    }
}

/// Source that answers every id with the same buffer.
#[derive(Debug, Clone)]
pub struct StaticPointSetSource {
    data: Vec<u8>,
}

impl StaticPointSetSource {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

impl Default for StaticPointSetSource {
    fn default() -> Self {
        Self::new(DEFAULT_MOCK_POINTSET)
    }
}

impl PointSetSource for StaticPointSetSource {
    fn fetch<'a>(&'a self, _pointset_id: &'a str) -> BoxFuture<'a, Result<Vec<u8>, FetchError>> {
        futures::future::ready(Ok(self.data.clone())).boxed()
    }
}

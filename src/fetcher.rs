//! Single-URL fetch with a hard deadline
//!
//! [`Fetcher`] issues one GET per URL and turns whatever happens into a
//! [`FetchOutcome`]. It never returns an error to its caller: a malformed URL,
//! a timeout, a refused connection and a 404 are all just outcomes.
//!
//! Content length comes from the `Content-Length` header when the server
//! declares one. Otherwise the body is streamed and its bytes are counted, so
//! the response is never held in memory as a whole.

use reqwest::header::CONTENT_LENGTH;
use reqwest::{Client, Response, StatusCode};
use std::time::{Duration, Instant};
use url::Url;

use crate::config::DEFAULT_REQUEST_TIMEOUT;
use crate::error::{FetchError, Result};
use crate::types::{FetchOutcome, FetchResult};

/// User agent sent with every request
const USER_AGENT: &str = concat!("durl/", env!("CARGO_PKG_VERSION"));

/// Timeout-bounded HTTP GET for a single URL
///
/// Cloning is cheap: clones share the underlying `reqwest::Client` and its
/// connection pool.
#[derive(Clone, Debug)]
pub struct Fetcher {
    client: Client,
    timeout: Duration,
}

impl Fetcher {
    /// Create a fetcher with its own HTTP client
    ///
    /// A zero `timeout` selects [`DEFAULT_REQUEST_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`](crate::Error::Http) if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_client(client, timeout))
    }

    /// Create a fetcher around an existing client
    ///
    /// A zero `timeout` selects [`DEFAULT_REQUEST_TIMEOUT`].
    #[must_use]
    pub fn with_client(client: Client, timeout: Duration) -> Self {
        let timeout = if timeout.is_zero() {
            DEFAULT_REQUEST_TIMEOUT
        } else {
            timeout
        };
        Self { client, timeout }
    }

    /// The deadline applied to each request
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch `url` and report the outcome with the time it took
    pub async fn fetch(&self, url: &str) -> (FetchOutcome, Duration) {
        let started = Instant::now();
        let outcome = FetchOutcome::from(self.content_length(url).await);
        (outcome, started.elapsed())
    }

    /// Fetch the URL at `index` of the input list and build its [`FetchResult`]
    pub async fn fetch_indexed(&self, index: usize, url: String) -> FetchResult {
        let (outcome, elapsed) = self.fetch(&url).await;

        match &outcome {
            FetchOutcome::Success { content_length } => tracing::debug!(
                index,
                url = %url,
                content_length,
                elapsed_ms = elapsed.as_millis() as u64,
                "fetch succeeded"
            ),
            FetchOutcome::Failure { kind, message } => tracing::debug!(
                index,
                url = %url,
                kind = %kind,
                error = %message,
                elapsed_ms = elapsed.as_millis() as u64,
                "fetch failed"
            ),
        }

        FetchResult::new(index, url, outcome, elapsed)
    }

    /// Resolve the content length of `url`, bounded by the request deadline
    async fn content_length(&self, url: &str) -> std::result::Result<u64, FetchError> {
        let url = parse_url(url)?;

        // The client-side timeout covers the request; the outer one also covers
        // a fallback body read.
        let request = self
            .client
            .get(url)
            .timeout(self.timeout)
            .build()
            .map_err(|e| FetchError::from_reqwest(&e))?;

        match tokio::time::timeout(self.timeout, self.execute(request)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout),
        }
    }

    async fn execute(&self, request: reqwest::Request) -> std::result::Result<u64, FetchError> {
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| FetchError::from_reqwest(&e))?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::UnexpectedStatus(response.status().as_u16()));
        }

        match declared_length(&response) {
            Some(len) => Ok(len),
            None => count_body_bytes(response).await,
        }
    }
}

/// Parse and check a URL before any network activity
fn parse_url(raw: &str) -> std::result::Result<Url, FetchError> {
    let url = Url::parse(raw).map_err(|e| FetchError::InvalidRequest(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(FetchError::InvalidRequest(format!(
            "URL scheme '{}' is not supported; only http and https are",
            scheme
        ))),
    }
}

/// `Content-Length` as declared by the server, if present and numeric
fn declared_length(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Read the body to the end, counting bytes without keeping them
async fn count_body_bytes(mut response: Response) -> std::result::Result<u64, FetchError> {
    let mut total: u64 = 0;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| FetchError::from_reqwest(&e))?
    {
        total += chunk.len() as u64;
    }
    Ok(total)
}

//! Page fetching: the pipeline's only network boundary.
//!
//! The [`Fetch`] trait abstracts "URL in, raw HTML out" so the scraping
//! pipeline can be driven by canned documents in tests. [`HttpFetcher`] is
//! the production implementation: a single `reqwest` client with an explicit
//! request timeout, sending a randomized browser `User-Agent` on every
//! request.
//!
//! There is deliberately no retry or backoff here — a failed fetch is
//! reported once and the caller decides how much of the run it takes down.

use rand::{Rng, rng};
use reqwest::StatusCode;
use reqwest::header::USER_AGENT;
use std::time::Duration;
use tracing::{debug, instrument};

/// Browser identities rotated across outbound requests.
///
/// Picking a realistic identity at random per request is an incidental
/// anti-blocking measure, not a correctness concern; swap in a different
/// [`Fetch`] implementation to change the strategy.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
];

/// Pick a random entry from [`USER_AGENTS`].
pub fn random_user_agent() -> &'static str {
    USER_AGENTS[rng().random_range(0..USER_AGENTS.len())]
}

/// Failure retrieving a page.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The HTTP client itself could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// Transport-level failure: connection refused, DNS, TLS, timeout.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("{url} returned status {status}")]
    Status { url: String, status: StatusCode },
}

/// Retrieves raw page content for a URL.
///
/// Implementors return the response body as text on a 2xx status and a
/// [`FetchError`] otherwise. Tests substitute stub implementations serving
/// canned HTML.
pub trait Fetch {
    /// Fetch `url` and return the response body.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Production [`Fetch`] implementation over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Default request timeout applied by [`HttpFetcher::new`].
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

    /// Build a fetcher with the default timeout.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }

    /// Build a fetcher with an explicit request timeout.
    ///
    /// The timeout covers the whole request; expiry surfaces as
    /// [`FetchError::Transport`].
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .use_rustls_tls()
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, random_user_agent())
            .send()
            .await
            .map_err(|source| FetchError::Transport { url: url.to_string(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: url.to_string(), status });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Transport { url: url.to_string(), source })?;

        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

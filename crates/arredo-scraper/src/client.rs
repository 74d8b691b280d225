use std::time::Duration;

use reqwest::Client;

use arredo_core::AppConfig;

use crate::error::ScrapeError;
use crate::page::{FragmentSource, PageSession};
use crate::rate_limit::retry_with_backoff;

/// HTTP client for catalog product pages and auxiliary documents.
///
/// Wraps a `reqwest::Client` with the configured timeout, `User-Agent`, and
/// retry policy. Transient errors (429, network failures) are retried with
/// exponential backoff; any other non-success page response is not an error
/// here — it produces an unreachable [`PageSession`] so the record builder
/// can short-circuit to a FAILED record.
pub struct PageClient {
    http: Client,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff.
    backoff_base_secs: u64,
    /// Bounded wait for lazily-revealed fragments.
    reveal_timeout: Duration,
}

impl PageClient {
    /// Creates a `PageClient` with configured timeout, `User-Agent`, retry
    /// policy, and reveal timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
        reveal_timeout_secs: u64,
    ) -> Result<Self, ScrapeError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            http,
            max_retries,
            backoff_base_secs,
            reveal_timeout: Duration::from_secs(reveal_timeout_secs),
        })
    }

    /// Creates a `PageClient` from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScrapeError> {
        Self::new(
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_secs,
            config.reveal_timeout_secs,
        )
    }

    /// Acquire a rendered-page session for `url`.
    ///
    /// A success response yields a live session with remote fragment
    /// capability; any other status yields an unreachable session. 429s and
    /// network failures are retried per the configured policy before giving
    /// up.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::RateLimited`] — HTTP 429 after all retries exhausted.
    /// - [`ScrapeError::Http`] — network or TLS failure after all retries
    ///   exhausted.
    pub async fn open(&self, url: &str) -> Result<PageSession, ScrapeError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.to_owned();
            async move {
                let response = self.http.get(&url).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(ScrapeError::RateLimited {
                        domain: extract_domain(&url),
                        retry_after_secs,
                    });
                }

                if !status.is_success() {
                    tracing::warn!(url = %url, status = status.as_u16(), "page unreachable");
                    return Ok(PageSession::unreachable(&url, status.as_u16()));
                }

                let body = response.text().await?;
                tracing::debug!(url = %url, bytes = body.len(), "page delivered");
                Ok(PageSession::live(
                    &url,
                    body,
                    FragmentSource::Remote {
                        http: self.http.clone(),
                        timeout: self.reveal_timeout,
                    },
                ))
            }
        })
        .await
    }

    /// Fetch an auxiliary text document (e.g. the sitemap URL index).
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::UnexpectedStatus`] — any non-2xx status.
    /// - [`ScrapeError::RateLimited`] / [`ScrapeError::Http`] — transient
    ///   failures after all retries exhausted.
    pub async fn fetch_text(&self, url: &str) -> Result<String, ScrapeError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.to_owned();
            async move {
                let response = self.http.get(&url).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    return Err(ScrapeError::RateLimited {
                        domain: extract_domain(&url),
                        retry_after_secs: 60,
                    });
                }
                if !status.is_success() {
                    return Err(ScrapeError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                Ok(response.text().await?)
            }
        })
        .await
    }
}

/// Extracts the hostname from a URL for use in error messages.
///
/// Falls back to the full URL string if it has no recognizable scheme.
fn extract_domain(url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    without_scheme
        .split('/')
        .next()
        .unwrap_or(url)
        .to_owned()
}

//! Core HTTP operations with rate limiting and retry logic
//!
//! Every request goes through a rate limiter, and transient failures
//! (transport errors, 429, 503) are retried with exponential backoff.
//! Other error statuses are mapped to typed errors without retrying.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{clock::DefaultClock, state::InMemoryState, Jitter, Quota, RateLimiter};
use reqwest::{Client, Response, StatusCode};
use url::Url;

use crate::app::client::config::ClientConfig;
use crate::errors::{DownloadError, DownloadResult};

type DirectRateLimiter = RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>;

/// HTTP operations handler with resilience patterns
#[derive(Debug)]
pub struct HttpHandler {
    client: Client,
    rate_limiter: DirectRateLimiter,
    config: ClientConfig,
}

impl HttpHandler {
    /// Creates a new HttpHandler from the client configuration
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the client cannot be built
    pub fn new(config: ClientConfig) -> DownloadResult<Self> {
        let client = config.build_http_client()?;
        let rate_limiter = Self::build_rate_limiter(config.rate_limit_rps);
        Ok(Self {
            client,
            rate_limiter,
            config,
        })
    }

    /// Builds the rate limiter; a zero rate is clamped to one request per second
    fn build_rate_limiter(rate_limit_rps: u32) -> DirectRateLimiter {
        let rate = NonZeroU32::new(rate_limit_rps).unwrap_or(NonZeroU32::MIN);
        RateLimiter::direct(Quota::per_second(rate))
    }

    /// Fetches a successful HTTP response
    ///
    /// # Errors
    ///
    /// Returns `DownloadError::NotFound` / `Forbidden` / `ServerError` for
    /// error statuses, and `MaxRetriesExceeded` when transient failures
    /// persist after all retries.
    pub async fn get_response(&self, url: &Url) -> DownloadResult<Response> {
        let max_retries = self.config.max_retries;
        let mut retries = 0;
        loop {
            self.rate_limiter
                .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(50)))
                .await;

            let error = match self.client.get(url.as_str()).send().await {
                Ok(response) => match check_status(url, response) {
                    Ok(response) => {
                        tracing::debug!("Successfully fetched response: {}", url);
                        return Ok(response);
                    }
                    Err(e) => e,
                },
                Err(e) => DownloadError::Http(e),
            };

            if !error.is_retryable() {
                return Err(error);
            }

            if retries >= max_retries {
                tracing::error!(
                    "Request to {} failed after {} retries: {}",
                    url,
                    max_retries,
                    error
                );
                return Err(DownloadError::MaxRetriesExceeded {
                    max_retries,
                });
            }

            retries += 1;
            let delay = self.config.retry_delay(retries);
            tracing::warn!(
                "Request failed (attempt {}/{}): {}. Retrying in {}ms",
                retries,
                max_retries,
                error,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Fetches the response body as text
    pub async fn get_text(&self, url: &Url) -> DownloadResult<String> {
        let response = self.get_response(url).await?;
        let text = response.text().await?;
        Ok(text)
    }

    /// Fetches the response body as bytes
    pub async fn get_bytes(&self, url: &Url) -> DownloadResult<Vec<u8>> {
        let response = self.get_response(url).await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

/// Map error statuses to typed errors
fn check_status(url: &Url, response: Response) -> DownloadResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(match status {
        StatusCode::NOT_FOUND => DownloadError::NotFound {
            url: url.to_string(),
        },
        StatusCode::FORBIDDEN => DownloadError::Forbidden {
            url: url.to_string(),
        },
        StatusCode::TOO_MANY_REQUESTS => DownloadError::RateLimitExceeded,
        StatusCode::SERVICE_UNAVAILABLE => DownloadError::ServerOverloaded,
        other => DownloadError::ServerError {
            status: other.as_u16(),
        },
    })
}

//! HTTP client configuration and building logic
//!
//! This module handles the configuration and construction of the HTTP
//! client used for catalog fetches and archive downloads.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::constants::{http, limits};
use crate::errors::{DownloadError, DownloadResult};

/// Configuration for the HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Request timeout
    pub request_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Connection pool idle timeout
    pub pool_idle_timeout: Option<Duration>,
    /// Rate limit (requests per second)
    pub rate_limit_rps: u32,
    /// Retry attempts for transient failures
    pub max_retries: u32,
    /// Base delay for exponential backoff
    pub retry_base_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            pool_idle_timeout: Some(http::POOL_IDLE_TIMEOUT),
            rate_limit_rps: limits::DEFAULT_RATE_LIMIT_RPS,
            max_retries: limits::MAX_RETRIES,
            retry_base_delay: Duration::from_millis(limits::RETRY_BASE_DELAY_MS),
        }
    }
}

impl ClientConfig {
    /// Builds the HTTP client with the specified configuration
    pub fn build_http_client(&self) -> DownloadResult<Client> {
        let mut client_builder = Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(http::USER_AGENT);

        if let Some(idle_timeout) = self.pool_idle_timeout {
            client_builder = client_builder.pool_idle_timeout(idle_timeout);
        }

        client_builder.build().map_err(DownloadError::Http)
    }

    /// Backoff delay before retry number `attempt` (1-based), capped at
    /// `MAX_RETRY_DELAY_SECS`
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let cap = Duration::from_secs(limits::MAX_RETRY_DELAY_SECS);
        self.retry_base_delay
            .checked_mul(2_u32.saturating_pow(attempt))
            .map_or(cap, |delay| delay.min(cap))
    }
}

//! HTTP client for the driver catalogs and archive downloads
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: Core HTTP operations with rate limiting and retries
//! - `download`: Archive downloads with atomic writes

use std::path::Path;

use url::Url;

use crate::errors::{DownloadError, DownloadResult};

pub mod config;
pub mod download;
pub mod http;

pub use config::ClientConfig;

use download::DownloadHandler;
use http::HttpHandler;

/// HTTP client shared by catalog fetches and installs
#[derive(Debug)]
pub struct DriverClient {
    http_handler: HttpHandler,
}

impl DriverClient {
    /// Creates a client with default configuration
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if HTTP client creation fails
    pub fn new() -> DownloadResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client with custom configuration
    pub fn with_config(config: ClientConfig) -> DownloadResult<Self> {
        let http_handler = HttpHandler::new(config)?;
        Ok(Self { http_handler })
    }

    /// Fetch a URL as text
    pub async fn get_text(&self, url: &str) -> DownloadResult<String> {
        self.http_handler.get_text(&parse_url(url)?).await
    }

    /// Fetch a URL as bytes
    pub async fn get_bytes(&self, url: &str) -> DownloadResult<Vec<u8>> {
        self.http_handler.get_bytes(&parse_url(url)?).await
    }

    /// Download a URL to `destination`, returning the number of bytes written
    pub async fn download_file(&self, url: &str, destination: &Path) -> DownloadResult<u64> {
        let download_handler = DownloadHandler::new(&self.http_handler);
        download_handler
            .download_file(&parse_url(url)?, destination)
            .await
    }

    pub fn config(&self) -> &ClientConfig {
        self.http_handler.config()
    }
}

/// Parse a URL, mapping failures to `DownloadError::InvalidUrl`
pub fn parse_url(url: &str) -> DownloadResult<Url> {
    Url::parse(url).map_err(|e| DownloadError::InvalidUrl {
        url: url.to_string(),
        error: e.to_string(),
    })
}

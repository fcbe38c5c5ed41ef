//! File download operations with atomic writes
//!
//! Archives are written to a temporary sibling file and renamed into place,
//! so an interrupted download never leaves a truncated archive behind.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::app::client::http::HttpHandler;
use crate::constants::files;
use crate::errors::{DownloadError, DownloadResult};

/// File download operations handler
pub struct DownloadHandler<'a> {
    http_handler: &'a HttpHandler,
}

impl<'a> DownloadHandler<'a> {
    /// Creates a new DownloadHandler with the given HTTP handler
    pub fn new(http_handler: &'a HttpHandler) -> Self {
        Self { http_handler }
    }

    /// Downloads a file to the specified path with an atomic rename
    ///
    /// Existing files at `destination` are replaced. Retries for transient
    /// failures happen inside the HTTP handler.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the request fails or the file cannot be written
    pub async fn download_file(&self, url: &Url, destination: &Path) -> DownloadResult<u64> {
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp_path = temp_path_for(destination);
        let bytes = match self.write_temp(url, &temp_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                if temp_path.exists() {
                    let _ = tokio::fs::remove_file(&temp_path).await;
                }
                return Err(e);
            }
        };

        tokio::fs::rename(&temp_path, destination)
            .await
            .map_err(|_e| DownloadError::AtomicOperationFailed {
                temp_path: temp_path.clone(),
                final_path: destination.to_path_buf(),
            })?;

        tracing::debug!(
            "Downloaded {} bytes to {}",
            bytes,
            destination.display()
        );
        Ok(bytes)
    }

    /// Stream the response body into `temp_path` chunk by chunk
    async fn write_temp(&self, url: &Url, temp_path: &Path) -> DownloadResult<u64> {
        let mut response = self.http_handler.get_response(url).await?;

        let mut file = File::create(temp_path).await?;
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }
}

/// Temporary path next to `destination` (`chromedriver.zip` -> `chromedriver.zip.tmp`)
fn temp_path_for(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(files::TEMP_FILE_SUFFIX);
    destination.with_file_name(name)
}

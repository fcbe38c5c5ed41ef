//! Error types for ChromeDriver Fetcher
//!
//! This module defines the error types for every component of the application.
//! Catalog errors abort a command, while install errors are scoped to a single
//! driver version so that batch operations can carry on.

use std::path::PathBuf;
use thiserror::Error;

/// Download and HTTP client errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error during file operations
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid URL provided
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Server returned error status
    #[error("Server error: HTTP {status}")]
    ServerError { status: u16 },

    /// Resource not found (HTTP 404)
    #[error("Resource not found: {url}")]
    NotFound { url: String },

    /// Access denied (HTTP 403)
    #[error("Access forbidden: {url}")]
    Forbidden { url: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded. Server responded with HTTP 429")]
    RateLimitExceeded,

    /// Server overloaded
    #[error("Server overloaded. Server responded with HTTP 503")]
    ServerOverloaded,

    /// Atomic file operation failed
    #[error("Atomic file operation failed: could not rename {temp_path} to {final_path}")]
    AtomicOperationFailed {
        temp_path: PathBuf,
        final_path: PathBuf,
    },

    /// Maximum retries exceeded
    #[error("Maximum retry attempts ({max_retries}) exceeded for request")]
    MaxRetriesExceeded { max_retries: u32 },
}

impl DownloadError {
    /// Whether retrying the same request could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            DownloadError::Http(_)
            | DownloadError::RateLimitExceeded
            | DownloadError::ServerOverloaded => true,
            DownloadError::ServerError { status } => *status >= 500,
            _ => false,
        }
    }
}

/// Errors raised while fetching or parsing an upstream catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog could not be fetched
    #[error("Failed to fetch {catalog} catalog: {source}")]
    Network {
        catalog: &'static str,
        #[source]
        source: DownloadError,
    },

    /// The modern catalog is not valid JSON
    #[error("Malformed JSON in modern catalog: {0}")]
    Json(#[from] serde_json::Error),

    /// The legacy listing is not valid XML
    #[error("Malformed XML in legacy catalog: {reason}")]
    Xml { reason: String },

    /// The document parsed but has the wrong shape
    #[error("Invalid {catalog} catalog document: {reason}")]
    InvalidDocument {
        catalog: &'static str,
        reason: String,
    },
}

impl CatalogError {
    /// True for parse failures, false for transport failures
    pub fn is_parse_error(&self) -> bool {
        !matches!(self, CatalogError::Network { .. })
    }
}

/// Version comparison and selection errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// A version segment is not an unsigned integer
    #[error("Malformed version string: '{version}'")]
    MalformedVersion { version: String },

    /// No record matches the requested version, platform and architecture
    #[error("{}", not_found_message(.requested, .platform, .candidates))]
    NotFound {
        requested: String,
        platform: String,
        candidates: Vec<String>,
    },

    /// `--select` points past the end of the candidate list
    #[error("Selection {index} is out of range (1-{available} available)")]
    SelectionOutOfRange { index: usize, available: usize },
}

fn not_found_message(requested: &str, platform: &str, candidates: &[String]) -> String {
    if candidates.is_empty() {
        format!("Version {} not found for {}", requested, platform)
    } else {
        format!(
            "Version {} not found for {}. Candidates: {} (use --select N or --latest)",
            requested,
            platform,
            candidates.join(", ")
        )
    }
}

/// Errors installing a single driver version
#[derive(Error, Debug)]
pub enum InstallError {
    /// Archive download failed
    #[error("Archive download failed: {0}")]
    Download(#[from] DownloadError),

    /// Corrupt or unreadable zip archive
    #[error("Corrupt archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Archive contained nothing to install
    #[error("Archive {url} contains no files")]
    EmptyArchive { url: String },

    /// Archive entry would escape the extraction directory
    #[error("Archive entry has an unsafe path: {name}")]
    UnsafeEntry { name: String },

    /// Filesystem operation failed
    #[error("Filesystem error at {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Blocking extraction task failed to complete
    #[error("Install task failed: {reason}")]
    Task { reason: String },
}

impl InstallError {
    /// Wrap an I/O error with the path it occurred at
    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP error outside catalog resolution
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Catalog fetch or parse error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Version error
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Install error
    #[error(transparent)]
    Install(#[from] InstallError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error is recoverable (transient)
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Download(e) => e.is_retryable(),
            AppError::Catalog(CatalogError::Network { source, .. }) => source.is_retryable(),
            AppError::Install(InstallError::Download(e)) => e.is_retryable(),
            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Download(_) => "network",
            AppError::Catalog(e) if e.is_parse_error() => "parse",
            AppError::Catalog(_) => "network",
            AppError::Version(VersionError::MalformedVersion { .. }) => "parse",
            AppError::Version(_) => "not_found",
            AppError::Install(InstallError::Download(_)) => "network",
            AppError::Install(InstallError::Filesystem { .. }) => "filesystem",
            AppError::Install(_) => "archive",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Download result type alias
pub type DownloadResult<T> = std::result::Result<T, DownloadError>;

/// Catalog result type alias
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Version result type alias
pub type VersionResult<T> = std::result::Result<T, VersionError>;

/// Install result type alias
pub type InstallResult<T> = std::result::Result<T, InstallError>;

/// Config result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

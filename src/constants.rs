//! Application constants for ChromeDriver Fetcher
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain.

use std::time::Duration;

/// Environment variable names for catalog overrides
pub mod env {
    /// Overrides the modern catalog URL
    pub const MODERN_URL: &str = "CHROMEDRIVER_MODERN_URL";

    /// Overrides the legacy catalog base URL
    pub const LEGACY_URL: &str = "CHROMEDRIVER_LEGACY_URL";
}

/// Upstream catalog endpoints
pub mod catalog {
    /// Modern "known good versions with downloads" JSON feed
    pub const MODERN_URL: &str =
        "https://googlechromelabs.github.io/chrome-for-testing/known-good-versions-with-downloads.json";

    /// Legacy bucket base URL (also the prefix for legacy archive downloads)
    pub const LEGACY_URL: &str = "https://chromedriver.storage.googleapis.com/";

    /// XML namespace of the legacy bucket listing
    pub const LEGACY_XML_NAMESPACE: &str = "http://doc.s3.amazonaws.com/2006-03-01";

    /// Catalog name used in errors and logs
    pub const MODERN_NAME: &str = "modern";

    /// Catalog name used in errors and logs
    pub const LEGACY_NAME: &str = "legacy";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = "ChromeDriver-Fetcher/0.1.0 (Driver Cache Tool)";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
}

/// Rate limiting and retry configuration
pub mod limits {
    /// Default rate limit for upstream requests (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 10;

    /// Maximum retry attempts for failed requests
    pub const MAX_RETRIES: u32 = 3;

    /// Base delay for exponential backoff (milliseconds)
    pub const RETRY_BASE_DELAY_MS: u64 = 500;

    /// Upper bound on a single backoff sleep (seconds)
    pub const MAX_RETRY_DELAY_SECS: u64 = 60;

    /// Largest retry count accepted from configuration
    pub const MAX_CONFIGURED_RETRIES: u32 = 10;
}

/// File and layout constants
pub mod files {
    /// Default output directory for downloaded drivers
    pub const DEFAULT_OUTPUT_DIR: &str = "./drivers";

    /// Temporary file suffix for atomic operations
    pub const TEMP_FILE_SUFFIX: &str = ".tmp";

    /// Prefix of the per-install temporary directory
    pub const TEMP_DIR_PREFIX: &str = ".chromedriver-";

    /// File name of the downloaded archive inside the temporary directory
    pub const ARCHIVE_FILE_NAME: &str = "chromedriver.zip";

    /// Directory the archive is extracted into, inside the temporary directory
    pub const EXTRACT_DIR_NAME: &str = "extract";

    /// Payload directories inside modern archives, tried in order
    pub const PAYLOAD_DIR_CANDIDATES: &[&str] = &[
        "chromedriver-win64",
        "chromedriver-win32",
        "chromedriver-linux64",
        "chromedriver",
    ];
}

/// Configuration file locations
pub mod config {
    /// Project-local configuration file
    pub const LOCAL_FILE_NAME: &str = "chromedriver-fetcher.toml";

    /// Directory name under the user config directory
    pub const APP_DIR_NAME: &str = "chromedriver-fetcher";

    /// File name under the user config directory
    pub const USER_FILE_NAME: &str = "config.toml";
}

/// Logging constants
pub mod logging {
    /// Default log level
    pub const DEFAULT_LOG_LEVEL: &str = "warn";
}

/// Display limits
pub mod display {
    /// Maximum number of candidate versions quoted in a not-found error
    pub const MAX_CANDIDATES_SHOWN: usize = 10;
}

// Re-export commonly used constants for convenience
pub use catalog::{LEGACY_URL, MODERN_URL};
pub use files::{DEFAULT_OUTPUT_DIR, PAYLOAD_DIR_CANDIDATES};
pub use http::USER_AGENT;
pub use limits::{DEFAULT_RATE_LIMIT_RPS, MAX_RETRIES, RETRY_BASE_DELAY_MS};

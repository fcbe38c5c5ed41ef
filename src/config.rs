//! Configuration management for ChromeDriver Fetcher
//!
//! Settings come from built-in defaults, then an optional TOML file, then
//! environment overrides for the catalog endpoints. Every key is optional.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::client::parse_url;
use crate::app::{CatalogUrls, ClientConfig};
use crate::constants::{catalog, config as paths, env, files, http, limits, logging};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Catalog endpoints
    pub catalog: CatalogConfigToml,
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Install settings
    pub install: InstallConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly catalog configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfigToml {
    /// Modern JSON catalog URL
    pub modern_url: String,
    /// Legacy bucket base URL
    pub legacy_url: String,
}

impl Default for CatalogConfigToml {
    fn default() -> Self {
        Self {
            modern_url: catalog::MODERN_URL.to_string(),
            legacy_url: catalog::LEGACY_URL.to_string(),
        }
    }
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Rate limit (requests per second)
    pub rate_limit_rps: u32,
    /// Retry attempts for transient failures
    pub max_retries: u32,
    /// Base backoff delay in milliseconds
    pub retry_base_delay_ms: u64,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            request_timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
            rate_limit_rps: limits::DEFAULT_RATE_LIMIT_RPS,
            max_retries: limits::MAX_RETRIES,
            retry_base_delay_ms: limits::RETRY_BASE_DELAY_MS,
        }
    }
}

/// TOML-friendly install configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfigToml {
    /// Default output directory for `download`
    pub output_dir: PathBuf,
    /// Payload directories inside modern archives, tried in order
    pub payload_dirs: Vec<String>,
}

impl Default for InstallConfigToml {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(files::DEFAULT_OUTPUT_DIR),
            payload_dirs: files::PAYLOAD_DIR_CANDIDATES
                .iter()
                .map(|d| d.to_string())
                .collect(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no verbosity flag is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: logging::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration with multi-source precedence:
    /// 1. Default values
    /// 2. Config file (explicit path, else the first standard location found)
    /// 3. Environment variables
    ///
    /// # Errors
    ///
    /// Fails if an explicit config path does not exist, or if the file
    /// cannot be read, parsed or validated.
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        Self::load_with_env(config_file_override, |key| std::env::var(key).ok()).await
    }

    /// `load` with an injectable environment lookup
    pub async fn load_with_env<F>(config_file_override: Option<PathBuf>, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match config_file_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound { path });
                }
                Self::load_from_file(&path).await?
            }
            None => match Self::find_config_file() {
                Some(path) => Self::load_from_file(&path).await?,
                None => Self::default(),
            },
        };

        config.apply_env_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(format!("./{}", paths::LOCAL_FILE_NAME))];
        if let Some(user_path) = Self::get_default_config_path() {
            search_paths.push(user_path);
        }

        for path in search_paths {
            if path.exists() {
                debug!("Found config file: {}", path.display());
                return Some(path);
            }
        }

        debug!("No config file found in standard locations");
        None
    }

    /// Get the default config file path for the current user
    fn get_default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(paths::APP_DIR_NAME).join(paths::USER_FILE_NAME))
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig = toml::from_str(&content)?;

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Apply `CHROMEDRIVER_*_URL` environment overrides
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(env::MODERN_URL).filter(|v| !v.trim().is_empty()) {
            debug!("Modern catalog URL overridden by {}", env::MODERN_URL);
            self.catalog.modern_url = url;
        }
        if let Some(url) = lookup(env::LEGACY_URL).filter(|v| !v.trim().is_empty()) {
            debug!("Legacy catalog URL overridden by {}", env::LEGACY_URL);
            self.catalog.legacy_url = url;
        }
    }

    /// Reject values that would only fail later, mid-command
    pub fn validate(&self) -> ConfigResult<()> {
        for (field, value) in [
            ("catalog.modern_url", &self.catalog.modern_url),
            ("catalog.legacy_url", &self.catalog.legacy_url),
        ] {
            if let Err(e) = parse_url(value) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.clone(),
                    reason: e.to_string(),
                });
            }
        }

        if self.client.max_retries > limits::MAX_CONFIGURED_RETRIES {
            return Err(ConfigError::InvalidValue {
                field: "client.max_retries".to_string(),
                value: self.client.max_retries.to_string(),
                reason: format!("Must be at most {}", limits::MAX_CONFIGURED_RETRIES),
            });
        }

        if self.install.payload_dirs.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "install.payload_dirs".to_string(),
                value: "[]".to_string(),
                reason: "At least one payload directory is required".to_string(),
            });
        }

        Ok(())
    }

    /// Catalog endpoints for a `CatalogSession`
    pub fn catalog_urls(&self) -> CatalogUrls {
        CatalogUrls {
            modern_url: self.catalog.modern_url.clone(),
            legacy_url: self.catalog.legacy_url.clone(),
        }
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self) -> ClientConfig {
        ClientConfig {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            pool_idle_timeout: Some(http::POOL_IDLE_TIMEOUT),
            rate_limit_rps: self.rate_limit_rps,
            max_retries: self.max_retries,
            retry_base_delay: Duration::from_millis(self.retry_base_delay_ms),
        }
    }
}

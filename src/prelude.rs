//! Prelude module for ChromeDriver Fetcher Library
//!
//! Re-exports the items most integrations need, so a single
//! `use chromedriver_fetcher::prelude::*;` is enough for typical usage.
//!
//! # Usage
//!
//! ```rust,no_run
//! use chromedriver_fetcher::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let session = CatalogSession::new(DriverClient::new()?, CatalogUrls::default());
//!     let records = session.resolve(&FilterCriteria::default()).await?;
//!
//!     let inventory = LocalInventory::scan(Path::new("./drivers")).await?;
//!     let missing = find_missing(&records, &inventory);
//!
//!     let targets: Vec<InstallTarget> = missing.iter().map(InstallTarget::from).collect();
//!     let report = Installer::new(session.client())
//!         .install_all(&targets, Path::new("./drivers"))
//!         .await;
//!     println!("{} installed", report.installed.len());
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

pub use crate::app::{
    // Catalog access
    CatalogSession,
    CatalogUrls,
    ClientConfig,
    DriverClient,

    // Data types
    Arch,
    FilterCriteria,
    MissingEntry,
    Os,
    PlatformArchRequest,
    PlatformToken,
    RecordSource,
    VersionRecord,

    // Local state and installs
    InstallReport,
    InstallTarget,
    Installer,
    LocalInventory,

    compare_versions,
    find_missing,
    select_for_download,
    SelectionRequest,
};

pub use crate::config::AppConfig;

// Commonly used constants
pub use crate::constants::{DEFAULT_OUTPUT_DIR, LEGACY_URL, MODERN_URL};

pub use std::path::{Path, PathBuf};

pub use tokio;

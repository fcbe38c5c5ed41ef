//! Core application logic for ChromeDriver Fetcher
//!
//! This module contains the catalog parsers, the unified version index, the
//! local inventory and reconciliation, and the archive installer.
//!
//! # Examples
//!
//! ```rust,no_run
//! use chromedriver_fetcher::app::{CatalogSession, CatalogUrls, DriverClient, FilterCriteria};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = CatalogSession::new(DriverClient::new()?, CatalogUrls::default());
//!
//! let criteria = FilterCriteria {
//!     major_version: Some("114".to_string()),
//!     latest_only: true,
//!     ..Default::default()
//! };
//!
//! for record in session.resolve(&criteria).await? {
//!     println!("{} {} {}", record.version, record.platform, record.download_url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod client;
pub mod index;
pub mod installer;
pub mod inventory;
pub mod models;
pub mod reconcile;
pub mod selection;
pub mod session;
pub mod version;

// Re-export main public API
pub use catalog::{LegacyCatalog, ModernCatalog, ModernEntry, VersionProducer};
pub use client::{ClientConfig, DriverClient};
pub use index::{reduce_latest, VersionIndex};
pub use installer::{InstallReport, InstallTarget, Installer};
pub use inventory::LocalInventory;
pub use models::{
    Arch, FilterCriteria, MissingEntry, Os, PlatformArchRequest, PlatformToken, RecordSource,
    VersionRecord,
};
pub use reconcile::find_missing;
pub use selection::{select_for_download, SelectionRequest};
pub use session::{CatalogSession, CatalogUrls};
pub use version::compare_versions;

//! Per-invocation catalog session
//!
//! A `CatalogSession` owns the HTTP client and lazily fetches each catalog
//! at most once for the lifetime of the session. Snapshots are immutable
//! once populated. A failed modern fetch is returned to the caller each
//! time; a failed legacy fetch is remembered as "unavailable" so the
//! warning is only emitted once.

use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::app::catalog::{LegacyCatalog, ModernCatalog, VersionProducer};
use crate::app::client::{parse_url, DriverClient};
use crate::app::index::VersionIndex;
use crate::app::models::{FilterCriteria, VersionRecord};
use crate::constants::catalog;
use crate::errors::{CatalogError, CatalogResult};

/// Catalog endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogUrls {
    pub modern_url: String,
    /// Base URL of the legacy bucket; also the prefix for legacy archives
    pub legacy_url: String,
}

impl Default for CatalogUrls {
    fn default() -> Self {
        Self {
            modern_url: catalog::MODERN_URL.to_string(),
            legacy_url: catalog::LEGACY_URL.to_string(),
        }
    }
}

/// Lazily populated catalog snapshots for one run
#[derive(Debug)]
pub struct CatalogSession {
    client: DriverClient,
    urls: CatalogUrls,
    modern: OnceCell<ModernCatalog>,
    legacy: OnceCell<Option<LegacyCatalog>>,
}

impl CatalogSession {
    pub fn new(client: DriverClient, urls: CatalogUrls) -> Self {
        Self {
            client,
            urls,
            modern: OnceCell::new(),
            legacy: OnceCell::new(),
        }
    }

    /// The HTTP client, shared with the installer
    pub fn client(&self) -> &DriverClient {
        &self.client
    }

    pub fn urls(&self) -> &CatalogUrls {
        &self.urls
    }

    /// Modern catalog snapshot, fetched on first use
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the catalog cannot be fetched or parsed.
    pub async fn modern(&self) -> CatalogResult<&ModernCatalog> {
        self.modern
            .get_or_try_init(|| async {
                info!("Fetching modern catalog from {}", self.urls.modern_url);
                let bytes = self
                    .client
                    .get_bytes(&self.urls.modern_url)
                    .await
                    .map_err(|source| CatalogError::Network {
                        catalog: catalog::MODERN_NAME,
                        source,
                    })?;
                let parsed = ModernCatalog::from_json(&bytes)?;
                info!("Modern catalog lists {} versions", parsed.len());
                Ok::<_, CatalogError>(parsed)
            })
            .await
    }

    /// Legacy catalog snapshot, or `None` if it could not be obtained
    pub async fn legacy(&self) -> Option<&LegacyCatalog> {
        self.legacy
            .get_or_init(|| async {
                match self.fetch_legacy().await {
                    Ok(parsed) => {
                        info!("Legacy catalog lists {} versions", parsed.versions().len());
                        Some(parsed)
                    }
                    Err(e) => {
                        warn!("Could not obtain legacy versions: {}", e);
                        None
                    }
                }
            })
            .await
            .as_ref()
    }

    async fn fetch_legacy(&self) -> CatalogResult<LegacyCatalog> {
        let mut url = parse_url(&self.urls.legacy_url).map_err(|source| CatalogError::Network {
            catalog: catalog::LEGACY_NAME,
            source,
        })?;
        url.query_pairs_mut()
            .append_pair("delimiter", "/")
            .append_pair("prefix", "");

        info!("Fetching legacy catalog from {}", url);
        let xml = self
            .client
            .get_text(url.as_str())
            .await
            .map_err(|source| CatalogError::Network {
                catalog: catalog::LEGACY_NAME,
                source,
            })?;

        LegacyCatalog::from_xml(self.urls.legacy_url.clone(), &xml)
    }

    /// Resolve the filtered, merged version list
    ///
    /// # Errors
    ///
    /// Only a modern catalog failure is an error; legacy failures degrade to
    /// modern-only results.
    pub async fn resolve(&self, criteria: &FilterCriteria) -> CatalogResult<Vec<VersionRecord>> {
        let modern = self.modern().await?;
        let legacy = if criteria.include_legacy {
            self.legacy().await
        } else {
            None
        };

        let mut producers: Vec<&dyn VersionProducer> = vec![modern];
        if let Some(legacy) = legacy {
            producers.push(legacy);
        }

        Ok(VersionIndex::resolve(&producers, criteria))
    }
}

//! Modern JSON catalog parsing
//!
//! The feed is a single document:
//!
//! ```text
//! { "versions": [ { "version": "115.0.5790.170",
//!                   "downloads": { "chromedriver": [ { "platform": "win64", "url": "..." } ] } } ] }
//! ```
//!
//! Older entries carry no `chromedriver` downloads at all. Each entry is
//! decoded on its own so a malformed entry is skipped rather than failing
//! the whole catalog.

use serde::Deserialize;
use tracing::debug;

use super::VersionProducer;
use crate::app::models::{FilterCriteria, PlatformToken, RecordSource, VersionRecord};
use crate::app::version::is_dotted_quad;
use crate::constants::catalog;
use crate::errors::{CatalogError, CatalogResult};

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    versions: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    version: String,
    #[serde(default)]
    downloads: RawDownloads,
}

#[derive(Debug, Default, Deserialize)]
struct RawDownloads {
    #[serde(default)]
    chromedriver: Vec<RawDownload>,
}

#[derive(Debug, Deserialize)]
struct RawDownload {
    platform: String,
    url: String,
}

/// One catalog version with its chromedriver downloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModernEntry {
    pub version: String,
    pub downloads: Vec<(PlatformToken, String)>,
}

/// Parsed modern catalog snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModernCatalog {
    entries: Vec<ModernEntry>,
}

impl ModernCatalog {
    /// Build a catalog from already-normalized entries
    pub fn from_entries(entries: Vec<ModernEntry>) -> Self {
        Self { entries }
    }

    /// Parse the JSON document
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Json` if the bytes are not JSON, and
    /// `CatalogError::InvalidDocument` if the top level is not an object.
    pub fn from_json(bytes: &[u8]) -> CatalogResult<Self> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        if !value.is_object() {
            return Err(CatalogError::InvalidDocument {
                catalog: catalog::MODERN_NAME,
                reason: "top-level value is not an object".to_string(),
            });
        }
        let raw: RawCatalog = serde_json::from_value(value)?;

        let mut entries = Vec::with_capacity(raw.versions.len());
        let mut skipped = 0usize;
        for (position, value) in raw.versions.into_iter().enumerate() {
            match parse_entry(value) {
                Some(entry) => entries.push(entry),
                None => {
                    skipped += 1;
                    debug!("Skipping malformed modern catalog entry #{}", position);
                }
            }
        }

        debug!(
            "Parsed modern catalog: {} entries ({} skipped)",
            entries.len(),
            skipped
        );
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ModernEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_entry(value: serde_json::Value) -> Option<ModernEntry> {
    let raw: RawEntry = serde_json::from_value(value).ok()?;
    if !is_dotted_quad(&raw.version) {
        return None;
    }

    let downloads = raw
        .downloads
        .chromedriver
        .into_iter()
        .filter_map(|d| {
            let token = PlatformToken::parse(&d.platform)?;
            if d.url.is_empty() {
                return None;
            }
            Some((token, d.url))
        })
        .collect();

    Some(ModernEntry {
        version: raw.version,
        downloads,
    })
}

impl VersionProducer for ModernCatalog {
    fn source(&self) -> RecordSource {
        RecordSource::Modern
    }

    fn produce(&self, criteria: &FilterCriteria) -> Vec<VersionRecord> {
        let tokens = criteria.modern_tokens();
        let mut records = Vec::new();

        for entry in &self.entries {
            if !criteria.matches_major(&entry.version) {
                continue;
            }
            for (token, url) in &entry.downloads {
                if let Some(allowed) = &tokens {
                    if !allowed.contains(token) {
                        continue;
                    }
                }
                records.push(VersionRecord::new(
                    entry.version.clone(),
                    *token,
                    url.clone(),
                    RecordSource::Modern,
                ));
            }
        }

        records
    }
}

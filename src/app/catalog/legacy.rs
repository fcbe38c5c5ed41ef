//! Legacy XML bucket listing
//!
//! The legacy bucket is listed with `?delimiter=/&prefix=`, which returns
//! one `CommonPrefixes/Prefix` element per top-level folder, possibly
//! interleaved with `Contents` entries for top-level files. Version folders
//! look like `2.46/` or `114.0.5735.90/`; only four-part versions are kept.
//! The listing says nothing about platforms, so every legacy version is
//! assumed to exist for every token in the legacy platform table.

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use super::VersionProducer;
use crate::app::models::{FilterCriteria, PlatformToken, RecordSource, VersionRecord};
use crate::app::version::is_dotted_quad;
use crate::constants::catalog;
use crate::errors::{CatalogError, CatalogResult};

const ROOT_ELEMENT: &[u8] = b"ListBucketResult";
const COMMON_PREFIXES: &[u8] = b"CommonPrefixes";
const PREFIX: &[u8] = b"Prefix";

fn xml_error(reason: impl ToString) -> CatalogError {
    CatalogError::Xml {
        reason: reason.to_string(),
    }
}

/// Every `CommonPrefixes/Prefix` text in document order
///
/// Other children of the listing are skipped wherever they appear.
fn collect_prefixes(xml: &str) -> CatalogResult<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut prefixes = Vec::new();
    let mut depth = 0usize;
    let mut saw_root = false;
    let mut in_common = false;
    let mut in_prefix = false;
    let mut current = String::new();

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => {
                let name = e.local_name();
                if depth == 0 {
                    if name.as_ref() != ROOT_ELEMENT {
                        return Err(xml_error("document is not a bucket listing"));
                    }
                    saw_root = true;
                } else if name.as_ref() == COMMON_PREFIXES {
                    in_common = true;
                } else if in_common && name.as_ref() == PREFIX {
                    in_prefix = true;
                    current.clear();
                }
                depth += 1;
            }
            Event::Empty(e) if depth == 0 => {
                if e.local_name().as_ref() != ROOT_ELEMENT {
                    return Err(xml_error("document is not a bucket listing"));
                }
                saw_root = true;
            }
            Event::Text(text) if in_prefix => {
                current.push_str(&text.unescape().map_err(xml_error)?);
            }
            Event::End(e) => {
                let name = e.local_name();
                if in_prefix && name.as_ref() == PREFIX {
                    in_prefix = false;
                    prefixes.push(std::mem::take(&mut current));
                } else if name.as_ref() == COMMON_PREFIXES {
                    in_common = false;
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(xml_error("document is not a bucket listing"));
    }
    if depth != 0 {
        return Err(xml_error("unexpected end of document"));
    }
    Ok(prefixes)
}

/// Parsed legacy catalog snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyCatalog {
    base_url: String,
    versions: Vec<String>,
}

impl LegacyCatalog {
    /// Build a catalog from version strings, dropping anything that is not a dotted quad
    pub fn from_versions(base_url: impl Into<String>, versions: Vec<String>) -> Self {
        Self {
            base_url: base_url.into(),
            versions: versions.into_iter().filter(|v| is_dotted_quad(v)).collect(),
        }
    }

    /// Parse an S3 bucket listing
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Xml` if the document is not a bucket listing.
    pub fn from_xml(base_url: impl Into<String>, xml: &str) -> CatalogResult<Self> {
        if !xml.contains(catalog::LEGACY_XML_NAMESPACE) {
            debug!("Legacy listing does not declare the S3 namespace");
        }

        let prefixes: Vec<String> = collect_prefixes(xml)?
            .into_iter()
            .map(|p| p.trim().trim_end_matches('/').to_string())
            .collect();
        let total = prefixes.len();

        let catalog = Self::from_versions(base_url, prefixes);
        debug!(
            "Parsed legacy catalog: {} versions from {} prefixes",
            catalog.versions.len(),
            total
        );
        Ok(catalog)
    }

    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Archive URL for a legacy version and token
    pub fn download_url(&self, version: &str, token: PlatformToken) -> String {
        format!(
            "{}/{}/chromedriver_{}.zip",
            self.base_url.trim_end_matches('/'),
            version,
            token
        )
    }
}

impl VersionProducer for LegacyCatalog {
    fn source(&self) -> RecordSource {
        RecordSource::Legacy
    }

    fn produce(&self, criteria: &FilterCriteria) -> Vec<VersionRecord> {
        let tokens = criteria.legacy_tokens();
        let mut records = Vec::new();

        for version in &self.versions {
            if !criteria.matches_major(version) {
                continue;
            }
            for token in &tokens {
                records.push(VersionRecord::new(
                    version.clone(),
                    *token,
                    self.download_url(version, *token),
                    RecordSource::Legacy,
                ));
            }
        }

        records
    }
}

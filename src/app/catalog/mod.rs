//! Upstream driver catalogs
//!
//! Two catalogs describe the available ChromeDriver builds, and each has
//! its own shape:
//!
//! - [`modern`] - the JSON "known good versions with downloads" feed, which
//!   lists explicit `(platform, url)` pairs per version
//! - [`legacy`] - the XML bucket listing, which only yields version strings;
//!   platforms and URLs are synthesized from a fixed template
//!
//! Both parse into immutable snapshots that implement [`VersionProducer`],
//! so the index merges them without branching on where a record came from.

pub mod legacy;
pub mod modern;

pub use legacy::LegacyCatalog;
pub use modern::{ModernCatalog, ModernEntry};

use crate::app::models::{FilterCriteria, RecordSource, VersionRecord};

/// A source of normalized version records
pub trait VersionProducer {
    /// Catalog the records originate from
    fn source(&self) -> RecordSource;

    /// Records passing the major-version and platform filters, in catalog order
    ///
    /// `latest_only` and `include_legacy` are applied by the index, not here.
    fn produce(&self, criteria: &FilterCriteria) -> Vec<VersionRecord>;
}

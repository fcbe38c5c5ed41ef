//! Missing-version reconciliation
//!
//! Only one build per major version is kept locally, in a `{major}.0`
//! directory. Every record is assigned to its bucket, and a bucket is
//! missing when no subdirectory with exactly that name exists.
//!
//! When several records share a bucket the candidate is chosen by:
//! 1. modern records over legacy records,
//! 2. then the higher version,
//! 3. then the record seen first.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use crate::app::inventory::LocalInventory;
use crate::app::models::{MissingEntry, RecordSource, VersionRecord};
use crate::app::version::compare_versions;

/// Whether `candidate` should replace `current` as a bucket's install target
fn takes_precedence(candidate: &VersionRecord, current: &VersionRecord) -> bool {
    match (candidate.source, current.source) {
        (RecordSource::Modern, RecordSource::Legacy) => true,
        (RecordSource::Legacy, RecordSource::Modern) => false,
        _ => matches!(
            compare_versions(&candidate.version, &current.version),
            Ok(Ordering::Greater)
        ),
    }
}

/// Pick one record per `{major}.0` bucket
pub fn bucket_records(records: &[VersionRecord]) -> Vec<&VersionRecord> {
    let mut buckets: HashMap<String, &VersionRecord> = HashMap::new();
    for record in records {
        buckets
            .entry(record.version_dir())
            .and_modify(|current| {
                if takes_precedence(record, current) {
                    *current = record;
                }
            })
            .or_insert(record);
    }

    let mut chosen: Vec<&VersionRecord> = buckets.into_values().collect();
    chosen.sort_by(|a, b| compare_majors(a.major(), b.major()));
    chosen
}

/// Numeric order when both majors parse, string order otherwise
fn compare_majors(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

/// Buckets present in `records` but absent from `inventory`, ordered by major
pub fn find_missing(records: &[VersionRecord], inventory: &LocalInventory) -> Vec<MissingEntry> {
    let buckets = bucket_records(records);
    let bucket_count = buckets.len();
    let missing: Vec<MissingEntry> = buckets
        .into_iter()
        .filter(|record| !inventory.contains(&record.version_dir()))
        .map(MissingEntry::from)
        .collect();

    debug!(
        "{} of {} version buckets missing from {}",
        missing.len(),
        bucket_count,
        inventory.root().display()
    );
    missing
}

//! Unified version index
//!
//! Merges the records of every producer into one ordered list and applies
//! the optional "latest per major version" reduction.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::app::catalog::VersionProducer;
use crate::app::models::{FilterCriteria, PlatformToken, VersionRecord};
use crate::app::version::compare_versions;

/// Stateless merge-and-filter over a set of producers
pub struct VersionIndex;

impl VersionIndex {
    /// Resolve records from the producers in order
    ///
    /// Producer order is output order: pass the modern catalog before the
    /// legacy one. Within a producer, catalog order is preserved.
    pub fn resolve(
        producers: &[&dyn VersionProducer],
        criteria: &FilterCriteria,
    ) -> Vec<VersionRecord> {
        let mut records = Vec::new();
        for producer in producers {
            let produced = producer.produce(criteria);
            debug!(
                "{:?} catalog produced {} records",
                producer.source(),
                produced.len()
            );
            records.extend(produced);
        }

        if criteria.latest_only {
            records = reduce_latest(records);
        }

        records
    }
}

/// Keep the highest version per `(major, platform)` group
///
/// Ties keep the first record seen. Groups come out in order of first
/// appearance.
pub fn reduce_latest(records: Vec<VersionRecord>) -> Vec<VersionRecord> {
    let mut slots: HashMap<(String, PlatformToken), usize> = HashMap::new();
    let mut latest: Vec<VersionRecord> = Vec::new();

    for record in records {
        let key = (record.major().to_string(), record.platform);
        match slots.get(&key) {
            Some(&slot) => {
                if is_newer(&record, &latest[slot]) {
                    latest[slot] = record;
                }
            }
            None => {
                slots.insert(key, latest.len());
                latest.push(record);
            }
        }
    }

    latest
}

fn is_newer(candidate: &VersionRecord, current: &VersionRecord) -> bool {
    match compare_versions(&candidate.version, &current.version) {
        Ok(ordering) => ordering == Ordering::Greater,
        Err(e) => {
            warn!("Ignoring unorderable version: {}", e);
            false
        }
    }
}

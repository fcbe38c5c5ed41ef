//! Non-interactive download selection
//!
//! Turns a user's `--version` request into exactly one record, or an error
//! that lists what could have been chosen instead.

use crate::app::index::reduce_latest;
use crate::app::models::VersionRecord;
use crate::app::version::major_segment;
use crate::constants::display;
use crate::errors::{VersionError, VersionResult};

/// How the requested version should be matched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRequest {
    /// `114` or `114.0.5735.90`
    pub requested: String,
    /// Take the newest build when `requested` is a bare major version
    pub latest: bool,
    /// 1-based pick among candidates sharing the requested major
    pub select: Option<usize>,
    /// Platform description for error messages
    pub platform: String,
}

impl SelectionRequest {
    /// Whether the request is a bare major version such as "114"
    pub fn is_major_only(&self) -> bool {
        !self.requested.is_empty() && self.requested.bytes().all(|b| b.is_ascii_digit())
    }
}

/// Choose one record out of `records` (already filtered by platform)
///
/// # Errors
///
/// `VersionError::NotFound` with candidate versions when nothing matches,
/// `VersionError::SelectionOutOfRange` for a bad `select` index.
pub fn select_for_download(
    records: &[VersionRecord],
    request: &SelectionRequest,
) -> VersionResult<VersionRecord> {
    let requested_major = major_segment(&request.requested);
    let same_major: Vec<&VersionRecord> = records
        .iter()
        .filter(|r| r.major() == requested_major)
        .collect();

    if request.latest && request.is_major_only() {
        let latest = reduce_latest(same_major.iter().map(|r| (*r).clone()).collect());
        if let Some(first) = latest.into_iter().next() {
            return Ok(first);
        }
    } else if let Some(exact) = records.iter().find(|r| r.version == request.requested) {
        return Ok(exact.clone());
    } else if let Some(index) = request.select {
        return match index.checked_sub(1).and_then(|i| same_major.get(i)) {
            Some(record) => Ok((*record).clone()),
            None => Err(VersionError::SelectionOutOfRange {
                index,
                available: same_major.len(),
            }),
        };
    }

    let mut candidates: Vec<String> = Vec::new();
    for record in &same_major {
        if !candidates.contains(&record.version) {
            candidates.push(record.version.clone());
        }
    }
    candidates.truncate(display::MAX_CANDIDATES_SHOWN);

    Err(VersionError::NotFound {
        requested: request.requested.clone(),
        platform: request.platform.clone(),
        candidates,
    })
}

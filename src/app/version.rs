//! Dotted version string comparison
//!
//! Driver versions are four-part dotted strings such as `114.0.5735.90`.
//! Comparison is segment-wise on unsigned integers with missing trailing
//! segments treated as zero, so `1.2` equals `1.2.0.0`.

use std::cmp::Ordering;
use std::sync::OnceLock;

use regex::Regex;

use crate::errors::{VersionError, VersionResult};

fn dotted_quad_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+\.\d+\.\d+\.\d+$").expect("valid version regex"))
}

/// Check whether a string is a four-part numeric version (`a.b.c.d`)
pub fn is_dotted_quad(version: &str) -> bool {
    dotted_quad_pattern().is_match(version)
}

/// Leading dot-separated segment of a version string
///
/// No validation happens here; `"abc"` yields `"abc"`.
pub fn major_segment(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}

/// Parse every segment as an unsigned integer
fn parse_segments(version: &str) -> VersionResult<Vec<u64>> {
    version
        .split('.')
        .map(|segment| {
            // `u64::from_str` accepts a leading '+', which is not a version digit
            if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                return Err(VersionError::MalformedVersion {
                    version: version.to_string(),
                });
            }
            segment
                .parse::<u64>()
                .map_err(|_| VersionError::MalformedVersion {
                    version: version.to_string(),
                })
        })
        .collect()
}

/// Compare two dotted version strings
///
/// # Errors
///
/// Returns `VersionError::MalformedVersion` if any segment of either
/// string is not an unsigned integer.
pub fn compare_versions(left: &str, right: &str) -> VersionResult<Ordering> {
    let left_parts = parse_segments(left)?;
    let right_parts = parse_segments(right)?;

    let len = left_parts.len().max(right_parts.len());
    for i in 0..len {
        let l = left_parts.get(i).copied().unwrap_or(0);
        let r = right_parts.get(i).copied().unwrap_or(0);
        match l.cmp(&r) {
            Ordering::Equal => continue,
            other => return Ok(other),
        }
    }

    Ok(Ordering::Equal)
}

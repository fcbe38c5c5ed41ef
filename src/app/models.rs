//! Data models for ChromeDriver Fetcher
//!
//! This module defines the core value types shared by the catalog parsers,
//! the version index and the reconciler: platform tokens, user-facing
//! platform requests, normalized version records and missing entries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::app::version::major_segment;

/// Concrete OS+architecture token used in download names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformToken {
    Win64,
    Win32,
    Linux64,
    Linux32,
}

impl PlatformToken {
    /// All known tokens
    pub const ALL: [PlatformToken; 4] = [
        PlatformToken::Win64,
        PlatformToken::Win32,
        PlatformToken::Linux64,
        PlatformToken::Linux32,
    ];

    /// Parse a catalog token, returning `None` for platforms we do not track
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "win64" => Some(Self::Win64),
            "win32" => Some(Self::Win32),
            "linux64" => Some(Self::Linux64),
            "linux32" => Some(Self::Linux32),
            _ => None,
        }
    }

    /// Token as it appears in catalogs and archive names
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Win64 => "win64",
            Self::Win32 => "win32",
            Self::Linux64 => "linux64",
            Self::Linux32 => "linux32",
        }
    }

    /// Display heuristic: tokens ending in `64` are 64-bit
    pub fn is_64_bit(&self) -> bool {
        self.as_str().ends_with("64")
    }

    /// Architecture label for listings
    pub fn arch_label(&self) -> &'static str {
        if self.is_64_bit() {
            "x64"
        } else {
            "x86"
        }
    }
}

impl fmt::Display for PlatformToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operating system requested by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Windows,
    Linux,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Os::Windows => f.write_str("windows"),
            Os::Linux => f.write_str("linux"),
        }
    }
}

/// CPU architecture requested by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    X86,
    X64,
}

impl Arch {
    /// Order in which architectures are expanded when none is requested
    pub const ALL: [Arch; 2] = [Arch::X64, Arch::X86];
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arch::X86 => f.write_str("x86"),
            Arch::X64 => f.write_str("x64"),
        }
    }
}

/// Legacy catalog token table.
///
/// Legacy windows builds only ever shipped as `win32`, which runs on both
/// architectures.
pub const LEGACY_PLATFORM_TABLE: &[(Os, Arch, PlatformToken)] = &[
    (Os::Windows, Arch::X64, PlatformToken::Win32),
    (Os::Windows, Arch::X86, PlatformToken::Win32),
    (Os::Linux, Arch::X64, PlatformToken::Linux64),
    (Os::Linux, Arch::X86, PlatformToken::Linux32),
];

/// Look up the legacy archive token for an OS/arch pair
pub fn legacy_token(os: Os, arch: Arch) -> Option<PlatformToken> {
    LEGACY_PLATFORM_TABLE
        .iter()
        .find(|(o, a, _)| *o == os && *a == arch)
        .map(|(_, _, token)| *token)
}

fn push_unique(tokens: &mut Vec<PlatformToken>, token: PlatformToken) {
    if !tokens.contains(&token) {
        tokens.push(token);
    }
}

/// User-facing platform filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformArchRequest {
    pub os: Os,
    pub arch: Option<Arch>,
}

impl PlatformArchRequest {
    pub fn new(os: Os, arch: Option<Arch>) -> Self {
        Self { os, arch }
    }

    /// Tokens accepted from the modern catalog for this request
    pub fn modern_tokens(&self) -> Vec<PlatformToken> {
        match (self.os, self.arch) {
            (Os::Windows, Some(Arch::X64)) => vec![PlatformToken::Win64],
            (Os::Windows, Some(Arch::X86)) => vec![PlatformToken::Win32],
            (Os::Windows, None) => vec![PlatformToken::Win64, PlatformToken::Win32],
            (Os::Linux, Some(Arch::X64)) => vec![PlatformToken::Linux64],
            (Os::Linux, Some(Arch::X86)) => vec![PlatformToken::Linux32],
            (Os::Linux, None) => vec![PlatformToken::Linux64],
        }
    }

    /// Tokens synthesized for legacy versions, deduplicated in table order
    pub fn legacy_tokens(&self) -> Vec<PlatformToken> {
        let arches: Vec<Arch> = match self.arch {
            Some(arch) => vec![arch],
            None => Arch::ALL.to_vec(),
        };

        let mut tokens = Vec::new();
        for arch in arches {
            if let Some(token) = legacy_token(self.os, arch) {
                push_unique(&mut tokens, token);
            }
        }
        tokens
    }
}

impl fmt::Display for PlatformArchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.arch {
            Some(arch) => write!(f, "{}/{}", self.os, arch),
            None => write!(f, "{}", self.os),
        }
    }
}

/// Legacy tokens for an optional request; no request means every table row
pub fn legacy_tokens_for(request: Option<&PlatformArchRequest>) -> Vec<PlatformToken> {
    match request {
        Some(request) => request.legacy_tokens(),
        None => {
            let mut tokens = Vec::new();
            for (_, _, token) in LEGACY_PLATFORM_TABLE {
                push_unique(&mut tokens, *token);
            }
            tokens
        }
    }
}

/// Which catalog a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordSource {
    Modern,
    Legacy,
}

/// Normalized, immutable catalog record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Four-part version string
    pub version: String,
    pub platform: PlatformToken,
    pub download_url: String,
    pub source: RecordSource,
}

impl VersionRecord {
    pub fn new(
        version: impl Into<String>,
        platform: PlatformToken,
        download_url: impl Into<String>,
        source: RecordSource,
    ) -> Self {
        Self {
            version: version.into(),
            platform,
            download_url: download_url.into(),
            source,
        }
    }

    /// Major version segment (e.g. "114")
    pub fn major(&self) -> &str {
        major_segment(&self.version)
    }

    /// Local bucket directory name (e.g. "114.0")
    pub fn version_dir(&self) -> String {
        format!("{}.0", self.major())
    }

    pub fn is_legacy(&self) -> bool {
        self.source == RecordSource::Legacy
    }

    /// Architecture label for display
    pub fn arch_label(&self) -> &'static str {
        self.platform.arch_label()
    }
}

/// Filters applied when resolving the version index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub platform: Option<PlatformArchRequest>,
    /// Leading segment to match exactly, e.g. "114"
    pub major_version: Option<String>,
    pub latest_only: bool,
    pub include_legacy: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            platform: None,
            major_version: None,
            latest_only: false,
            include_legacy: true,
        }
    }
}

impl FilterCriteria {
    /// Whether a version passes the major-version filter
    pub fn matches_major(&self, version: &str) -> bool {
        match &self.major_version {
            Some(major) => major_segment(version) == major,
            None => true,
        }
    }

    /// Modern tokens to keep; `None` keeps every known token
    pub fn modern_tokens(&self) -> Option<Vec<PlatformToken>> {
        self.platform.as_ref().map(|p| p.modern_tokens())
    }

    /// Tokens to synthesize for each legacy version
    pub fn legacy_tokens(&self) -> Vec<PlatformToken> {
        legacy_tokens_for(self.platform.as_ref())
    }
}

/// A version bucket that is not present locally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingEntry {
    /// Bucket directory name, e.g. "114.0"
    pub version_dir: String,
    pub full_version: String,
    pub download_url: String,
    pub is_legacy: bool,
    pub platform: PlatformToken,
}

impl From<&VersionRecord> for MissingEntry {
    fn from(record: &VersionRecord) -> Self {
        Self {
            version_dir: record.version_dir(),
            full_version: record.version.clone(),
            download_url: record.download_url.clone(),
            is_legacy: record.is_legacy(),
            platform: record.platform,
        }
    }
}

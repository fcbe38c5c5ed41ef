//! Command-line argument parsing for ChromeDriver Fetcher
//!
//! This module defines the CLI structure using clap derive macros: listing
//! available driver versions, downloading one, and reconciling a local
//! driver directory against the catalogs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::app::models::{Arch, FilterCriteria, Os, PlatformArchRequest};
use crate::app::version::major_segment;

/// ChromeDriver Fetcher - Resolve and install ChromeDriver builds
#[derive(Parser, Debug)]
#[command(
    name = "chromedriver_fetcher",
    version,
    about = "List, download and reconcile ChromeDriver versions",
    long_about = "Resolves ChromeDriver versions from the Chrome for Testing catalog and the legacy storage bucket.
Installs one driver per major version into {output}/{major}.0 directories."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available ChromeDriver versions
    List(ListArgs),

    /// Download and install one ChromeDriver version
    Download(DownloadArgs),

    /// Report major versions missing from a local driver directory
    #[command(alias = "missing")]
    CheckMissing(CheckMissingArgs),
}

/// Operating system selector
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformArg {
    #[value(alias = "win")]
    Windows,
    Linux,
}

impl From<PlatformArg> for Os {
    fn from(platform: PlatformArg) -> Self {
        match platform {
            PlatformArg::Windows => Os::Windows,
            PlatformArg::Linux => Os::Linux,
        }
    }
}

/// Architecture selector
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchArg {
    X86,
    X64,
}

impl From<ArchArg> for Arch {
    fn from(arch: ArchArg) -> Self {
        match arch {
            ArchArg::X86 => Arch::X86,
            ArchArg::X64 => Arch::X64,
        }
    }
}

/// Arguments for the list command
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Only versions for this platform
    #[arg(short, long)]
    pub platform: Option<PlatformArg>,

    /// Only versions with this major version (e.g. 114)
    #[arg(long, value_name = "MAJOR")]
    pub version: Option<String>,

    /// Only this architecture (requires --platform)
    #[arg(short, long, requires = "platform")]
    pub arch: Option<ArchArg>,

    /// Only the latest build per major version and platform
    #[arg(short, long)]
    pub latest: bool,

    /// Skip the legacy catalog
    #[arg(long)]
    pub no_legacy: bool,
}

/// Arguments for the download command
#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    /// Target platform
    #[arg(short, long)]
    pub platform: PlatformArg,

    /// Exact version (114.0.5735.90) or major version (114)
    #[arg(long)]
    pub version: String,

    /// Output directory (defaults to the configured output directory)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Target architecture
    #[arg(short, long, default_value = "x64")]
    pub arch: ArchArg,

    /// Use the newest build of a major version
    #[arg(short, long)]
    pub latest: bool,

    /// Skip the legacy catalog
    #[arg(long)]
    pub no_legacy: bool,

    /// Pick the N-th candidate (1-based) when the version is not an exact match
    #[arg(long, value_name = "N")]
    pub select: Option<usize>,
}

/// Arguments for the check-missing command
#[derive(Args, Debug, Clone)]
pub struct CheckMissingArgs {
    /// Local driver directory containing {major}.0 subdirectories
    #[arg(short, long, value_name = "DIR")]
    pub dir: PathBuf,

    /// Target platform
    #[arg(short, long)]
    pub platform: PlatformArg,

    /// Target architecture
    #[arg(short, long, default_value = "x64")]
    pub arch: ArchArg,

    /// Only consider the latest build per major version
    #[arg(short, long)]
    pub latest: bool,

    /// Skip the legacy catalog
    #[arg(long)]
    pub no_legacy: bool,

    /// Install the missing versions
    #[arg(long)]
    pub download: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    ///
    /// `configured` applies when no verbosity flag is given.
    pub fn log_level(&self, configured: tracing::Level) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            configured
        }
    }
}

impl ListArgs {
    pub fn to_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            platform: self
                .platform
                .map(|p| PlatformArchRequest::new(p.into(), self.arch.map(Into::into))),
            major_version: self.version.clone(),
            latest_only: self.latest,
            include_legacy: !self.no_legacy,
        }
    }
}

impl DownloadArgs {
    /// Reject arguments that cannot name a version
    pub fn validate(&self) -> Result<(), String> {
        let version = self.version.trim();
        if version.is_empty() {
            return Err("--version must not be empty".to_string());
        }

        if !version
            .split('.')
            .all(|segment| !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()))
        {
            return Err(format!(
                "Invalid version '{}': expected MAJOR or MAJOR.MINOR.BUILD.PATCH",
                self.version
            ));
        }

        Ok(())
    }

    /// Criteria covering every candidate for the requested major version
    pub fn to_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            platform: Some(self.platform_request()),
            major_version: Some(major_segment(self.version.trim()).to_string()),
            latest_only: false,
            include_legacy: !self.no_legacy,
        }
    }

    pub fn platform_request(&self) -> PlatformArchRequest {
        PlatformArchRequest::new(self.platform.into(), Some(self.arch.into()))
    }
}

impl CheckMissingArgs {
    pub fn to_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            platform: Some(PlatformArchRequest::new(
                self.platform.into(),
                Some(self.arch.into()),
            )),
            major_version: None,
            latest_only: self.latest,
            include_legacy: !self.no_legacy,
        }
    }
}

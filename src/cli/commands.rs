//! Command handlers for ChromeDriver Fetcher CLI
//!
//! This module implements the command handlers that coordinate between CLI
//! arguments and the core catalog, reconciliation and install logic.

use std::path::Path;
use std::time::Instant;

use tracing::info;

use crate::app::{
    find_missing, select_for_download, CatalogSession, DriverClient, FilterCriteria,
    InstallReport, InstallTarget, Installer, LocalInventory, MissingEntry, SelectionRequest,
    VersionRecord,
};
use crate::cli::args::{CheckMissingArgs, DownloadArgs, ListArgs};
use crate::cli::progress::{ProgressConfig, Spinner};
use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// Shared state for one command invocation
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: AppConfig,
    pub progress: ProgressConfig,
}

impl CommandContext {
    pub fn new(config: AppConfig, quiet: bool) -> Self {
        let progress = if quiet {
            ProgressConfig::quiet()
        } else {
            ProgressConfig::default()
        };
        Self { config, progress }
    }

    /// A fresh catalog session using the configured client and endpoints
    pub fn session(&self) -> Result<CatalogSession> {
        let client = DriverClient::with_config(self.config.client.to_runtime_config())?;
        Ok(CatalogSession::new(client, self.config.catalog_urls()))
    }

    fn installer<'a>(&self, client: &'a DriverClient) -> Installer<'a> {
        Installer::with_payload_dirs(client, self.config.install.payload_dirs.clone())
    }
}

/// Handle the list command
pub async fn handle_list(args: ListArgs, ctx: &CommandContext) -> Result<()> {
    let session = ctx.session()?;
    let records = resolve_with_spinner(&session, &args.to_criteria(), ctx).await?;

    if records.is_empty() {
        println!("No versions found with the specified filters.");
        return Ok(());
    }

    println!("Available versions ({}):", records.len());
    for line in format_listing(&records) {
        println!("{}", line);
    }

    Ok(())
}

/// Handle the download command
///
/// Resolves exactly one record through the non-interactive selection policy
/// and installs it into `{output}/{major}.0`.
pub async fn handle_download(args: DownloadArgs, ctx: &CommandContext) -> Result<()> {
    args.validate().map_err(AppError::generic)?;

    let session = ctx.session()?;
    let records = resolve_with_spinner(&session, &args.to_criteria(), ctx).await?;

    let request = SelectionRequest {
        requested: args.version.trim().to_string(),
        latest: args.latest,
        select: args.select,
        platform: args.platform_request().to_string(),
    };
    let record = select_for_download(&records, &request)?;
    if request.latest && request.is_major_only() {
        println!("Using latest version: {}", record.version);
    }

    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| ctx.config.install.output_dir.clone());

    println!("Downloading ChromeDriver version {}...", record.version);
    let spinner = Spinner::start(
        &ctx.progress,
        format!("Installing ChromeDriver {}...", record.version),
    );
    let installed = ctx
        .installer(session.client())
        .install(&InstallTarget::from(&record), &output_dir)
        .await;
    spinner.finish();

    let path = installed?;
    println!(
        "ChromeDriver downloaded and extracted successfully to: {}",
        path.display()
    );
    Ok(())
}

/// Handle the check-missing command
///
/// Lists every `{major}.0` bucket absent from `--dir` and, with
/// `--download`, installs them one by one.
pub async fn handle_check_missing(args: CheckMissingArgs, ctx: &CommandContext) -> Result<()> {
    let start_time = Instant::now();
    let session = ctx.session()?;
    let records = resolve_with_spinner(&session, &args.to_criteria(), ctx).await?;

    let inventory = LocalInventory::scan(&args.dir).await?;
    info!(
        "{} local version directories in {}",
        inventory.len(),
        inventory.root().display()
    );

    let missing = find_missing(&records, &inventory);
    if missing.is_empty() {
        println!("No missing drivers found.");
        return Ok(());
    }

    println!("Found {} missing drivers:", missing.len());
    for line in format_missing(&missing) {
        println!("{}", line);
    }

    if !args.download {
        return Ok(());
    }

    println!();
    println!("Downloading missing drivers...");
    let targets: Vec<InstallTarget> = missing.iter().map(InstallTarget::from).collect();

    let spinner = Spinner::start(
        &ctx.progress,
        format!("Installing {} drivers...", targets.len()),
    );
    let report = ctx
        .installer(session.client())
        .install_all(&targets, &args.dir)
        .await;
    spinner.finish();

    print_install_summary(&report, &args.dir);
    info!("check-missing completed in {:?}", start_time.elapsed());

    if report.is_success() {
        Ok(())
    } else {
        Err(AppError::generic(format!(
            "{} of {} installs failed",
            report.failed.len(),
            targets.len()
        )))
    }
}

async fn resolve_with_spinner(
    session: &CatalogSession,
    criteria: &FilterCriteria,
    ctx: &CommandContext,
) -> Result<Vec<VersionRecord>> {
    let spinner = Spinner::start(&ctx.progress, "Fetching ChromeDriver catalogs...");
    let resolved = session.resolve(criteria).await;
    spinner.finish();

    let records = resolved?;
    info!("Resolved {} version records", records.len());
    Ok(records)
}

/// Numbered listing lines, e.g. `1. Version: 114.0.5735.90 - Platform: win64 (x64)`
pub fn format_listing(records: &[VersionRecord]) -> Vec<String> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let mut line = format!(
                "{}. Version: {} - Platform: {} ({})",
                i + 1,
                record.version,
                record.platform,
                record.arch_label()
            );
            if record.is_legacy() {
                line.push_str(" [Legacy]");
            }
            line
        })
        .collect()
}

/// Numbered missing-bucket lines, e.g. `1. 114.0 (Full version: 114.0.5735.90)`
pub fn format_missing(missing: &[MissingEntry]) -> Vec<String> {
    missing
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "{}. {} (Full version: {})",
                i + 1,
                entry.version_dir,
                entry.full_version
            )
        })
        .collect()
}

fn print_install_summary(report: &InstallReport, output_dir: &Path) {
    println!();
    println!("Install summary for {}:", output_dir.display());
    for installed in &report.installed {
        println!("  ✓ {} -> {}", installed.full_version, installed.path.display());
    }
    for failed in &report.failed {
        println!("  ✗ {}: {}", failed.full_version, failed.error);
    }
    println!(
        "{} installed, {} failed",
        report.installed.len(),
        report.failed.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{PlatformToken, RecordSource};

    #[test]
    fn test_format_listing() {
        let records = vec![
            VersionRecord::new(
                "115.0.5790.102",
                PlatformToken::Win64,
                "https://example.com/modern.zip",
                RecordSource::Modern,
            ),
            VersionRecord::new(
                "114.0.5735.90",
                PlatformToken::Win32,
                "https://example.com/legacy.zip",
                RecordSource::Legacy,
            ),
        ];

        let lines = format_listing(&records);
        assert_eq!(
            lines,
            vec![
                "1. Version: 115.0.5790.102 - Platform: win64 (x64)",
                "2. Version: 114.0.5735.90 - Platform: win32 (x86) [Legacy]",
            ]
        );
    }

    #[test]
    fn test_format_missing() {
        let missing = vec![MissingEntry {
            version_dir: "114.0".to_string(),
            full_version: "114.0.5735.90".to_string(),
            download_url: "https://example.com/a.zip".to_string(),
            is_legacy: false,
            platform: PlatformToken::Linux64,
        }];
        assert_eq!(
            format_missing(&missing),
            vec!["1. 114.0 (Full version: 114.0.5735.90)"]
        );
    }

    #[test]
    fn test_context_builds_session() {
        let ctx = CommandContext::new(AppConfig::default(), true);
        assert!(!ctx.progress.enabled);
        let session = ctx.session().unwrap();
        assert_eq!(session.urls().modern_url, crate::constants::MODERN_URL);
    }
}

//! ChromeDriver Fetcher CLI application
//!
//! Command-line interface for listing, downloading and reconciling
//! ChromeDriver versions.

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use chromedriver_fetcher::cli::{
    handle_check_missing, handle_download, handle_list, Cli, CommandContext, Commands,
};
use chromedriver_fetcher::config::AppConfig;
use chromedriver_fetcher::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config = AppConfig::load(cli.global.config.clone()).await?;

    init_logging(&cli, &config);

    info!("ChromeDriver Fetcher v{} starting", env!("CARGO_PKG_VERSION"));

    let ctx = CommandContext::new(config, cli.global.quiet);

    match cli.command {
        Commands::List(args) => {
            info!("Executing list command");
            handle_list(args, &ctx).await
        }
        Commands::Download(args) => {
            info!("Executing download command");
            handle_download(args, &ctx).await
        }
        Commands::CheckMissing(args) => {
            info!("Executing check-missing command");
            handle_check_missing(args, &ctx).await
        }
    }
}

/// Initialize logging based on CLI verbosity and the configured level
fn init_logging(cli: &Cli, config: &AppConfig) {
    let configured = config
        .logging
        .level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::WARN);
    let log_level = cli.log_level(configured);

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("chromedriver_fetcher={}", log_level).parse() {
        filter = filter.add_directive(directive);
    }

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(cli.global.very_verbose)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}

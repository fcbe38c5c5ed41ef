//! Command-line interface components
//!
//! This module contains CLI-specific code for the ChromeDriver Fetcher
//! application, including argument parsing, command handlers, and progress
//! display.

pub mod args;
pub mod commands;
pub mod progress;

pub use args::{ArchArg, CheckMissingArgs, Cli, Commands, DownloadArgs, GlobalArgs, ListArgs, PlatformArg};
pub use commands::{handle_check_missing, handle_download, handle_list, CommandContext};
pub use progress::{ProgressConfig, Spinner};

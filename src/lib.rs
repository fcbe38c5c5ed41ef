//! ChromeDriver Fetcher Library
//!
//! Resolves ChromeDriver versions from the Chrome for Testing JSON catalog and
//! the legacy storage bucket listing, reconciles them against a local driver
//! directory, and installs missing versions into `{major}.0` directories.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

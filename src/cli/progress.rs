//! Progress display for catalog fetches and installs
//!
//! Spinners are drawn on stderr so listings on stdout stay clean, and are
//! hidden entirely in quiet mode.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Configuration for progress display
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Draw spinners at all
    pub enabled: bool,
    /// Spinner tick interval
    pub tick_interval: Duration,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tick_interval: Duration::from_millis(120),
        }
    }
}

impl ProgressConfig {
    pub fn quiet() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

/// A single-line spinner for one long-running step
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Start a spinner showing `message`
    pub fn start(config: &ProgressConfig, message: impl Into<String>) -> Self {
        let bar = if config.enabled {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };

        bar.set_style(spinner_style());
        bar.set_message(message.into());
        if config.enabled {
            bar.enable_steady_tick(config.tick_interval);
        }

        Self { bar }
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.bar.set_message(message.into());
    }

    /// Stop and remove the spinner line
    pub fn finish(self) {
        self.bar.finish_and_clear();
    }

    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["◐", "◓", "◑", "◒"])
}

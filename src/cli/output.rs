//! Output formatting and progress indicators
//!
//! This module provides utilities for displaying progress spinners,
//! search results, and formatted messages to the user.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;

use crate::core::package::{PackageRecord, PackageSet};

/// Output preferences derived from global flags
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Suppress everything but results and errors
    pub quiet: bool,
    /// Print machine-readable JSON
    pub json: bool,
    /// Verbosity level (-v count)
    pub verbose: u8,
}

impl OutputConfig {
    pub fn new(quiet: bool, json: bool, verbose: u8) -> Self {
        Self {
            quiet,
            json,
            verbose,
        }
    }

    /// Log filter directive for the tracing subscriber
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        }
    }

    /// Whether progress indicators should be drawn
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }

    /// Spinner for a step of unknown duration, hidden when progress is off
    pub fn spinner(&self, message: &str) -> ProgressBar {
        if self.show_progress() {
            create_spinner(message)
        } else {
            ProgressBar::hidden()
        }
    }
}

/// Create a spinner for operations with unknown duration
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.blue} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Warning prefix (yellow triangle)
    pub const WARNING: &str = "⚠";

    /// Info prefix (blue circle)
    pub const INFO: &str = "ℹ";
}

/// One line per package: `name - description`
pub fn format_package_line(name: &str, record: &PackageRecord) -> String {
    let version = latest_version(record)
        .map(|v| format!(" v{v}"))
        .unwrap_or_default();
    match record.description().filter(|d| !d.is_empty()) {
        Some(description) => format!("{name}{version} - {}", single_line(description)),
        None => format!("{name}{version}"),
    }
}

/// Print a package set as text lines or a JSON object
pub fn print_packages(packages: &PackageSet, output: &OutputConfig, limit: Option<usize>) {
    let limit = limit.unwrap_or(usize::MAX);

    if output.json {
        let shown: PackageSet = packages
            .iter()
            .take(limit)
            .map(|(name, record)| (name.clone(), record.clone()))
            .collect();
        match serde_json::to_string_pretty(&shown) {
            Ok(text) => println!("{text}"),
            Err(e) => display_error(&anyhow::anyhow!(e)),
        }
        return;
    }

    for (name, record) in packages.iter().take(limit) {
        println!("{}", format_package_line(name, record));
    }

    if !output.quiet && packages.len() > limit {
        println!("... and {} more", packages.len() - limit);
    }
}

/// Print an error and its causes to stderr
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} {error}", status::ERROR);
    for cause in error.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
}

/// `dist-tags.latest` when the registry document carries it
fn latest_version(record: &PackageRecord) -> Option<&str> {
    record
        .get("dist-tags")
        .and_then(|tags| tags.get("latest"))
        .and_then(Value::as_str)
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

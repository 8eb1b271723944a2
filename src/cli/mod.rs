//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no business logic - that belongs in the [`crate::core`] module.

pub mod commands;
pub mod output;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser};

use crate::core::global_config::GlobalConfig;
use crate::core::options::{CacheOptions, CacheOptionsBuilder};
use crate::infra::dirs::CacheDirs;
use commands::Commands;
use output::OutputConfig;

/// npm-local-cache - Local npm registry snapshot with fuzzy search
///
/// Keeps a keyword-filtered copy of the npm registry's package metadata on
/// disk, tops it up incrementally and searches it offline.
#[derive(Parser, Debug)]
#[command(name = "npm-local-cache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format for scripting
    #[arg(long, global = true)]
    pub json: bool,

    #[command(flatten)]
    pub cache: CacheArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Flags overriding the config file's cache settings
#[derive(Args, Debug, Clone, Default)]
pub struct CacheArgs {
    /// Config file to read instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Snapshot file this cache reads and writes
    #[arg(long, global = true, value_name = "PATH")]
    pub cache_path: Option<PathBuf>,

    /// npm registry mirror used to seed an empty cache
    #[arg(long, global = true, value_name = "PATH")]
    pub local_cache_path: Option<PathBuf>,

    /// Never seed from npm's registry mirror
    #[arg(long, global = true)]
    pub no_local: bool,

    /// Keep changes in memory only
    #[arg(long, global = true)]
    pub no_write: bool,

    /// Seconds before the snapshot is considered stale
    #[arg(long, global = true, value_name = "SECS")]
    pub ttl: Option<u64>,

    /// Registry base URL
    #[arg(long, global = true, value_name = "URL", env = "NPM_LOCAL_CACHE_REGISTRY")]
    pub registry: Option<String>,

    /// Only cache packages tagged with one of these keywords
    #[arg(
        id = "cache_keywords",
        long = "cache-keyword",
        global = true,
        value_name = "KEYWORD"
    )]
    pub cache_keywords: Vec<String>,
}

impl CacheArgs {
    /// Resolve options from defaults, the config file and these flags
    ///
    /// `search_fields`, when non-empty, replaces the configured fields.
    pub fn resolve(&self, search_fields: &[String]) -> Result<CacheOptions> {
        let config = match &self.config {
            Some(path) => GlobalConfig::load_from_path(path)?,
            None => GlobalConfig::load(&CacheDirs::new())?,
        };

        let mut builder = self.apply(config.apply(CacheOptions::builder()));
        if !search_fields.is_empty() {
            builder = builder.search_fields(search_fields.iter().cloned());
        }

        let options = builder.build()?;
        tracing::debug!("Resolved cache options: {:?}", options);
        Ok(options)
    }

    fn apply(&self, mut builder: CacheOptionsBuilder) -> CacheOptionsBuilder {
        if let Some(path) = &self.cache_path {
            builder = builder.cache_path(path.clone());
        }
        if let Some(path) = &self.local_cache_path {
            builder = builder.local_cache_path(path.clone());
        }
        if self.no_local {
            builder = builder.use_local(false);
        }
        if self.no_write {
            builder = builder.write_cache(false);
        }
        if let Some(ttl) = self.ttl {
            builder = builder.ttl(Duration::from_secs(ttl));
        }
        if let Some(url) = &self.registry {
            builder = builder.registry_url(url.clone());
        }
        if !self.cache_keywords.is_empty() {
            builder = builder.keywords(self.cache_keywords.iter().cloned());
        }
        builder
    }
}

impl Cli {
    /// Output preferences from the global flags
    pub fn output(&self) -> OutputConfig {
        OutputConfig::new(self.quiet, self.json, self.verbose)
    }

    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let output = self.output();
        if let Some(cmd) = self.command {
            cmd.run(&self.cache, &output).await
        } else {
            // No subcommand provided, show help
            use clap::CommandFactory;
            let mut cmd = Self::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}

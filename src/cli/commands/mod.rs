//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod cache;
pub mod search;

use anyhow::Result;
use clap::Subcommand;

use super::output::OutputConfig;
use super::CacheArgs;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the cache, building it from the mirror or registry if needed
    Init,

    /// Fuzzy-search cached packages
    Search {
        /// Characters to look for, in order, in the searched fields
        query: String,

        /// Only consider packages tagged with one of these keywords
        #[arg(short, long = "keyword", value_name = "KEYWORD")]
        keywords: Vec<String>,

        /// Fields to search (name, description, author, license, keywords,
        /// dependencies, devDependencies)
        #[arg(short, long = "field", value_name = "FIELD")]
        fields: Vec<String>,

        /// Show at most this many results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Pull registry changes into the cache now
    Refresh,

    /// Show the effective options and cache status
    Info,
}

impl Commands {
    /// Execute the command
    pub async fn run(self, args: &CacheArgs, output: &OutputConfig) -> Result<()> {
        match self {
            Self::Init => cache::execute_init(args, output).await,
            Self::Search {
                query,
                keywords,
                fields,
                limit,
            } => {
                let request = search::SearchRequest {
                    query,
                    keywords,
                    fields,
                    limit,
                };
                search::execute(args, &request, output).await
            }
            Self::Refresh => cache::execute_refresh(args, output).await,
            Self::Info => cache::execute_info(args, output).await,
        }
    }
}

//! Search command implementation
//!
//! Implements `npm-local-cache search`.

use anyhow::Result;

use crate::cli::output::{print_packages, status, OutputConfig};
use crate::cli::CacheArgs;
use crate::core::cache::PackageCache;

/// Parsed `search` arguments
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub query: String,
    pub keywords: Vec<String>,
    pub fields: Vec<String>,
    pub limit: Option<usize>,
}

/// Execute the search command
pub async fn execute(args: &CacheArgs, request: &SearchRequest, output: &OutputConfig) -> Result<()> {
    let options = args.resolve(&request.fields)?;
    let mut cache = PackageCache::new(options);

    tracing::info!("Searching for '{}'...", request.query);

    let keywords = (!request.keywords.is_empty()).then_some(request.keywords.as_slice());

    let spinner = output.spinner("Loading package cache...");
    let result = cache.search(&request.query, keywords).await;
    spinner.finish_and_clear();

    let results = result?;

    print_packages(&results, output, request.limit);

    if !output.quiet && !output.json {
        println!();
        println!(
            "{} Found {} package(s) for '{}'",
            status::SUCCESS,
            results.len(),
            request.query
        );
    }

    Ok(())
}

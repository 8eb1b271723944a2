//! CLI commands for cache lifecycle: `init`, `refresh` and `info`

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{status, OutputConfig};
use crate::cli::CacheArgs;
use crate::core::cache::PackageCache;
use crate::core::metadata::CacheStatus;
use crate::core::options::CacheOptions;

/// Summary printed by `init`, `refresh` and `info`
#[derive(Debug, Serialize)]
pub struct CacheReport<'a> {
    pub status: CacheStatus,
    pub packages: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<&'a CacheOptions>,
}

impl<'a> CacheReport<'a> {
    fn of(cache: &'a PackageCache, with_options: bool) -> Self {
        Self {
            status: cache.status(),
            packages: cache.packages().len(),
            updated: cache.state().updated_at(),
            options: with_options.then(|| cache.options()),
        }
    }
}

/// Execute the init command
pub async fn execute_init(args: &CacheArgs, output: &OutputConfig) -> Result<()> {
    let mut cache = PackageCache::new(args.resolve(&[])?);

    let spinner = output.spinner("Loading package cache...");
    let result = cache.init().await.map(|packages| packages.len());
    spinner.finish_and_clear();
    let count = result?;

    if output.json {
        print_json(&CacheReport::of(&cache, false))?;
    } else if !output.quiet {
        println!(
            "{} Cache ready: {} package(s) in {}",
            status::SUCCESS,
            count,
            cache.options().cache_path.display()
        );
        if cache.status() == CacheStatus::Stale {
            println!(
                "{} Registry update failed, cache is stale (run with -v for details)",
                status::WARNING
            );
        }
    }

    Ok(())
}

/// Execute the refresh command
pub async fn execute_refresh(args: &CacheArgs, output: &OutputConfig) -> Result<()> {
    let mut cache = PackageCache::new(args.resolve(&[])?);

    let spinner = output.spinner("Fetching registry updates...");
    let result = cache.refresh().await.map(|packages| packages.len());
    spinner.finish_and_clear();
    let count = result?;

    if output.json {
        print_json(&CacheReport::of(&cache, false))?;
    } else if !output.quiet {
        println!("{} Cache refreshed: {} package(s)", status::SUCCESS, count);
    }

    Ok(())
}

/// Execute the info command
pub async fn execute_info(args: &CacheArgs, output: &OutputConfig) -> Result<()> {
    let mut cache = PackageCache::new(args.resolve(&[])?);

    let spinner = output.spinner("Loading package cache...");
    let result = cache.init().await.map(|_| ());
    spinner.finish_and_clear();
    result?;

    let report = CacheReport::of(&cache, true);

    if output.json {
        return print_json(&report);
    }

    let options = cache.options();
    let fields: Vec<&str> = options.search_fields.iter().map(|f| f.as_str()).collect();

    println!("{} Cache Information\n", status::INFO);
    println!("Status:        {:?}", report.status);
    println!("Packages:      {}", report.packages);
    match report.updated {
        Some(updated) => println!("Updated:       {updated}"),
        None => println!("Updated:       unknown"),
    }
    println!("Cache file:    {}", options.cache_path.display());
    println!(
        "npm mirror:    {}{}",
        options.local_cache_path.display(),
        if options.use_local { "" } else { " (disabled)" }
    );
    println!("Registry:      {}", options.registry_url);
    println!("TTL:           {}s", options.ttl.as_secs());
    println!("Write cache:   {}", options.write_cache);
    println!("Search fields: {}", fields.join(", "));
    if options.keywords.is_empty() {
        println!("Keywords:      (none)");
    } else {
        println!("Keywords:      {}", options.keywords.join(", "));
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

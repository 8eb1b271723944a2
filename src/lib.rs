//! npm-local-cache - Local npm registry snapshot with fuzzy search
//!
//! This library keeps a keyword-filtered snapshot of the npm registry's
//! package metadata on disk, refreshes it incrementally once it expires and
//! answers fuzzy queries against it.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Cache lifecycle, filtering and search
//! - [`registry`] - Registry client and snapshot files
//! - [`infra`] - Infrastructure layer (filesystem, platform directories)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling
//!
//! # Example
//!
//! ```no_run
//! use npm_local_cache::core::cache::PackageCache;
//! use npm_local_cache::core::options::CacheOptions;
//!
//! # async fn demo() -> Result<(), npm_local_cache::error::CacheError> {
//! let options = CacheOptions::builder()
//!     .keywords(["gulpplugin"])
//!     .search_fields(["name", "description"])
//!     .build()?;
//! let mut cache = PackageCache::new(options);
//! let found = cache.search("sass", None).await?;
//! println!("{} matches", found.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;
pub mod registry;

#[cfg(test)]
pub mod test_utils;

//! Default configuration values

use std::time::Duration;

/// Default cache time-to-live (24 hours)
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Start of the bulk-endpoint cursor when nothing local is known
/// (2014-02-14T00:00:00Z in epoch milliseconds)
pub const DEFAULT_SINCE_MILLIS: i64 = 1_392_336_000_000;

/// Fields searched when none are configured
pub const DEFAULT_SEARCH_FIELDS: &[&str] = &["name", "description", "keywords"];

/// Snapshot file name under the cache directory
pub const CACHE_FILE_NAME: &str = "cache.json";

/// Connect timeout for registry requests (in seconds)
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

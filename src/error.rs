//! Error types for npm-local-cache
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },

    /// Failed to read file metadata
    #[error("Failed to read metadata of '{path}': {error}")]
    Metadata { path: PathBuf, error: String },
}

/// Registry fetch errors
///
/// Produced by a [`crate::registry::RegistrySource`]; the cache never inspects
/// response bodies itself.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (connection refused, DNS, timeout)
    #[error("Network error fetching '{url}': {error}")]
    Network { url: String, error: String },

    /// Non-success HTTP status
    #[error("Registry returned HTTP {status} for '{url}'")]
    Status { url: String, status: u16 },

    /// Body could not be decoded as a package document
    #[error("Failed to decode registry response from '{url}': {error}")]
    Decode { url: String, error: String },

    /// Registry answered with an error document
    #[error("Registry error: {reason}")]
    Registry { reason: String },
}

/// Config file errors
#[derive(Error, Debug)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file '{path}': {error}")]
    ReadError { path: String, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    ParseError { path: String, error: String },
}

/// Top-level cache error type
#[derive(Error, Debug)]
pub enum CacheError {
    /// A configured search field is not on the allow-list
    #[error("Illegal search field '{field}', legal values: {}", legal.join(", "))]
    InvalidConfiguration { field: String, legal: Vec<String> },

    /// Fetching from the registry failed
    #[error("Error retrieving from registry: {0}")]
    RegistryFetch(#[from] FetchError),

    /// A local snapshot file is not a valid package document
    #[error("Malformed cache file '{path}': {error}")]
    MalformedCache { path: PathBuf, error: String },

    /// Writing the snapshot file failed
    #[error("Failed to persist cache: {0}")]
    Persistence(#[source] FilesystemError),

    /// Reading a local file failed
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// Config file could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] ConfigFileError),

    /// A search matched nothing
    #[error("No results found for '{query}'")]
    NoResults { query: String },
}

impl CacheError {
    /// Whether this error is an empty search rather than a fault
    pub fn is_no_results(&self) -> bool {
        matches!(self, Self::NoResults { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_lists_legal_fields() {
        let err = CacheError::InvalidConfiguration {
            field: "foobar".to_string(),
            legal: vec!["name".to_string(), "description".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("foobar"));
        assert!(msg.contains("name, description"));
    }

    #[test]
    fn test_fetch_error_converts() {
        let err: CacheError = FetchError::Registry {
            reason: "not_found".to_string(),
        }
        .into();
        assert!(matches!(err, CacheError::RegistryFetch(_)));
        assert!(err.to_string().contains("not_found"));
    }

    #[test]
    fn test_is_no_results() {
        let err = CacheError::NoResults {
            query: "xyz".to_string(),
        };
        assert!(err.is_no_results());
        assert!(!CacheError::Persistence(FilesystemError::WriteFile {
            path: PathBuf::from("/tmp/x"),
            error: "denied".to_string(),
        })
        .is_no_results());
    }
}

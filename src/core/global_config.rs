//! Global configuration management
//!
//! Reads settings from `config.toml` in the config directory. Every setting
//! is optional; missing ones fall back to the built-in defaults, and CLI flags
//! override whatever the file says.
//!
//! ```toml
//! [cache]
//! path = "/var/cache/npm-local-cache/cache.json"
//! ttl = 86400
//! write = true
//! keywords = ["gulpplugin"]
//!
//! [search]
//! fields = ["name", "description", "keywords"]
//!
//! [local]
//! enabled = true
//! path = "/home/me/.npm/-/all/.cache.json"
//!
//! [registry]
//! url = "https://registry.npmjs.org"
//! timeout = 300
//! ```

use crate::core::options::CacheOptionsBuilder;
use crate::error::ConfigFileError;
use crate::infra::dirs::CacheDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Global configuration for npm-local-cache
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Snapshot settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// npm registry mirror settings
    #[serde(default)]
    pub local: LocalConfig,

    /// Registry settings
    #[serde(default)]
    pub registry: RegistryConfig,
}

/// Snapshot configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Snapshot file location
    pub path: Option<PathBuf>,

    /// Cache TTL in seconds
    pub ttl: Option<u64>,

    /// Persist the snapshot
    pub write: Option<bool>,

    /// Keywords every cached package must carry one of
    pub keywords: Option<Vec<String>>,
}

/// Search configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Searched fields, validated when options are built
    pub fields: Option<Vec<String>>,
}

/// npm registry mirror configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocalConfig {
    /// Seed an empty cache from npm's mirror
    pub enabled: Option<bool>,

    /// Mirror location
    pub path: Option<PathBuf>,
}

/// Registry configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Custom registry URL
    pub url: Option<String>,

    /// Request timeout in seconds
    pub timeout: Option<u64>,
}

impl GlobalConfig {
    /// Load global configuration from the config directory
    ///
    /// If the config file doesn't exist, returns default configuration.
    pub fn load(dirs: &CacheDirs) -> Result<Self, ConfigFileError> {
        Self::load_from_path(&dirs.config_file_path())
    }

    /// Load global configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns `ConfigFileError::ParseError` if the file exists but contains
    /// invalid TOML or unknown keys.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigFileError::ReadError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigFileError::ParseError {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    /// Layer the file's settings onto an options builder
    #[must_use]
    pub fn apply(&self, mut builder: CacheOptionsBuilder) -> CacheOptionsBuilder {
        if let Some(path) = &self.cache.path {
            builder = builder.cache_path(path.clone());
        }
        if let Some(ttl) = self.cache.ttl {
            builder = builder.ttl(Duration::from_secs(ttl));
        }
        if let Some(write) = self.cache.write {
            builder = builder.write_cache(write);
        }
        if let Some(keywords) = &self.cache.keywords {
            builder = builder.keywords(keywords.iter().cloned());
        }
        if let Some(fields) = &self.search.fields {
            builder = builder.search_fields(fields.iter().cloned());
        }
        if let Some(enabled) = self.local.enabled {
            builder = builder.use_local(enabled);
        }
        if let Some(path) = &self.local.path {
            builder = builder.local_cache_path(path.clone());
        }
        if let Some(url) = &self.registry.url {
            builder = builder.registry_url(url.clone());
        }
        if let Some(timeout) = self.registry.timeout {
            builder = builder.fetch_timeout(Duration::from_secs(timeout));
        }
        builder
    }
}

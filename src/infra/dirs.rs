//! Platform-specific directory management
//!
//! Provides platform-specific paths for the snapshot file, the config file
//! and the user's npm registry mirror.
//! Follows XDG Base Directory Specification on Linux and standard locations on macOS.
//!
//! Environment variables can override default directories:
//! - `NPM_LOCAL_CACHE_CACHE_DIR` - Override cache directory
//! - `NPM_LOCAL_CACHE_CONFIG_DIR` - Override config directory

use std::env;
use std::path::PathBuf;

use crate::config::defaults;

/// Environment variable names for directory overrides
pub const ENV_CACHE_DIR: &str = "NPM_LOCAL_CACHE_CACHE_DIR";
pub const ENV_CONFIG_DIR: &str = "NPM_LOCAL_CACHE_CONFIG_DIR";

/// Application name used in directory paths
const APP_NAME: &str = "npm-local-cache";

/// Location of npm's own registry mirror, relative to the home directory
const NPM_MIRROR_RELATIVE: [&str; 4] = [".npm", "-", "all", ".cache.json"];

/// Platform-specific directory provider
#[derive(Debug, Clone)]
pub struct CacheDirs {
    cache_dir: PathBuf,
    config_dir: PathBuf,
    home_dir: PathBuf,
}

impl CacheDirs {
    /// Create a new `CacheDirs` instance
    ///
    /// Checks environment variables first, then falls back to platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache_dir: Self::resolve(ENV_CACHE_DIR, dirs::cache_dir, ".cache"),
            config_dir: Self::resolve(ENV_CONFIG_DIR, dirs::config_dir, ".config"),
            home_dir: dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    /// Directory holding the snapshot file
    /// - Linux: `$XDG_CACHE_HOME/npm-local-cache` or `~/.cache/npm-local-cache`
    /// - macOS: `~/Library/Caches/npm-local-cache`
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone()
    }

    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Default snapshot file path
    #[must_use]
    pub fn cache_file_path(&self) -> PathBuf {
        self.cache_dir.join(defaults::CACHE_FILE_NAME)
    }

    /// Default config file path (`config.toml` in the config directory)
    #[must_use]
    pub fn config_file_path(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// npm's full registry mirror: `$HOME/.npm/-/all/.cache.json`
    #[must_use]
    pub fn npm_mirror_path(&self) -> PathBuf {
        NPM_MIRROR_RELATIVE
            .iter()
            .fold(self.home_dir.clone(), |path, part| path.join(part))
    }

    fn resolve(var: &str, platform: fn() -> Option<PathBuf>, fallback: &str) -> PathBuf {
        if let Ok(path) = env::var(var) {
            return PathBuf::from(path);
        }

        platform().map(|p| p.join(APP_NAME)).unwrap_or_else(|| {
            // Fallback to home directory
            dirs::home_dir()
                .map(|h| h.join(fallback).join(APP_NAME))
                .unwrap_or_else(|| PathBuf::from(".").join(fallback).join(APP_NAME))
        })
    }
}

impl Default for CacheDirs {
    fn default() -> Self {
        Self::new()
    }
}

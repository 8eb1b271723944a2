//! Core business logic module
//!
//! Everything here works on in-memory package sets; file and network access
//! goes through [`crate::infra`] and [`crate::registry`].
//!
//! # Submodules
//!
//! - [`package`] - Package records and snapshot documents
//! - [`options`] - Cache options and search field validation
//! - [`metadata`] - Cache state, timestamps and staleness
//! - [`keywords`] - Keyword filtering
//! - [`search`] - Fuzzy query filtering
//! - [`cache`] - Cache lifecycle (load, refresh, persist, search)
//! - [`global_config`] - Global configuration management

pub mod cache;
pub mod global_config;
pub mod keywords;
pub mod metadata;
pub mod options;
pub mod package;
pub mod search;

//! Registry access
//!
//! Fetches package documents from the npm registry and reads/writes snapshot
//! documents on disk.

pub mod cache;
pub mod client;

pub use cache::SnapshotFile;
pub use client::{RegistryClient, RegistrySource};

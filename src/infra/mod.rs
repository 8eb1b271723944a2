//! Infrastructure layer
//!
//! Handles filesystem access and platform directory lookup.

pub mod dirs;
pub mod filesystem;

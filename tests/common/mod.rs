//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Value};
use tempfile::TempDir;

/// Test workspace context
///
/// Creates a temporary directory holding snapshot files, mirrors and config
/// files for a single test.
pub struct TestProject {
    /// Temporary directory for the test
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test workspace in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Absolute path of a file inside the test directory
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Create a file in the test directory
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.file(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Write a JSON document into the test directory
    pub fn write_json(&self, name: &str, value: &Value) {
        self.create_file(
            name,
            &serde_json::to_string_pretty(value).expect("Failed to serialize JSON"),
        );
    }

    /// Check if a file exists in the test directory
    pub fn file_exists(&self, name: &str) -> bool {
        self.file(name).exists()
    }

    /// Read and parse a JSON file from the test directory
    pub fn read_json(&self, name: &str) -> Value {
        let content = std::fs::read(self.file(name)).expect("Failed to read file");
        serde_json::from_slice(&content).expect("Failed to parse JSON")
    }

    /// Run the binary with isolated cache and config directories
    pub fn run(&self, args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_npm-local-cache"));
        cmd.current_dir(self.path())
            .env("NPM_LOCAL_CACHE_CACHE_DIR", self.file("cache-dir"))
            .env("NPM_LOCAL_CACHE_CONFIG_DIR", self.file("config-dir"))
            .env_remove("NPM_LOCAL_CACHE_REGISTRY")
            .env_remove("RUST_LOG")
            .args(args);
        cmd.output().expect("Failed to execute npm-local-cache")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Current time in epoch milliseconds
pub fn now_millis() -> i64 {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Clock before epoch");
    i64::try_from(elapsed.as_millis()).expect("Timestamp overflow")
}

/// Push a file's modification time into the past
pub fn age_file(path: &Path, age: std::time::Duration) {
    let file = std::fs::File::options()
        .write(true)
        .open(path)
        .expect("Failed to open file");
    file.set_modified(SystemTime::now() - age)
        .expect("Failed to set mtime");
}

/// Five packages exercising every searchable field shape
///
/// `ModuleE` declares the name `ModuleD`; lookups go by key.
pub fn search_field_fixture() -> Value {
    json!({
        "ModuleA": {
            "name": "ModuleA",
            "description": "This description doesn't say much.",
            "dependencies": { "lodash": "^2.4.1" }
        },
        "ModuleB": {
            "name": "ModuleB",
            "description": "This description doesn't say much. Works well with ModuleA"
        },
        "ModuleC": {
            "name": "ModuleC",
            "description": "This description doesn't say much.",
            "author": "Same author as of ModuleA"
        },
        "ModuleD": {
            "name": "ModuleD",
            "description": "This description doesn't say much.",
            "author": { "name": "I'm an object", "email": "foo@example.com" },
            "dependencies": { "debug": "^1.0.4" }
        },
        "ModuleE": {
            "name": "ModuleD",
            "description": "This description doesn't say much.",
            "author": { "name": "I'm a tree", "email": "bar@example.com" },
            "dependencies": {
                "debug": "^1.0.4",
                "fuzzy-filter": "0.0.3",
                "lodash": "^2.4.1"
            }
        }
    })
}

/// The fixture as a fresh snapshot document
pub fn fresh_fixture_snapshot() -> Value {
    let mut doc = search_field_fixture();
    if let Value::Object(fields) = &mut doc {
        fields.insert("_updated".to_string(), json!(now_millis()));
    }
    doc
}

/// A registry URL nothing listens on
pub const UNREACHABLE_REGISTRY: &str = "http://127.0.0.1:9";

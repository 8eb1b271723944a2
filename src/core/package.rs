//! Package records and snapshot documents
//!
//! A registry snapshot is a JSON object mapping package names to package
//! documents, optionally carrying an `_updated` marker (epoch milliseconds).
//! Records are kept as raw JSON so fields we never search survive a
//! load/persist cycle untouched.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of the timestamp marker embedded in registry documents
pub const UPDATED_KEY: &str = "_updated";

/// A package set keyed by package name, in source document order
pub type PackageSet = IndexMap<String, PackageRecord>;

/// A single package document from the registry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageRecord(Map<String, Value>);

impl PackageRecord {
    /// Wrap a JSON value, if it is an object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// Raw access to a field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Package name as declared in the document
    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(Value::as_str)
    }

    /// Package description
    pub fn description(&self) -> Option<&str> {
        self.get("description").and_then(Value::as_str)
    }

    /// Declared keywords
    ///
    /// Some published packages carry a bare string instead of a list; that is
    /// treated as a single keyword. Non-string entries are ignored.
    pub fn keywords(&self) -> Vec<&str> {
        match self.get("keywords") {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(keyword)) => vec![keyword.as_str()],
            _ => Vec::new(),
        }
    }

    /// Underlying JSON fields
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for PackageRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// A package set together with its `_updated` marker
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Server-side timestamp of the document (epoch millis), if present
    pub updated: Option<i64>,
    /// The packages in document order
    pub packages: PackageSet,
}

impl Snapshot {
    /// Split a registry document into its marker and its packages
    ///
    /// Top-level entries that are not objects cannot be packages and are
    /// skipped.
    pub fn from_document(mut document: Map<String, Value>) -> Self {
        // shift, not swap: the marker usually comes first
        let updated = document
            .shift_remove(UPDATED_KEY)
            .as_ref()
            .and_then(parse_marker);

        let mut packages = PackageSet::with_capacity(document.len());
        for (name, value) in document {
            match PackageRecord::from_value(value) {
                Some(record) => {
                    packages.insert(name, record);
                }
                None => tracing::debug!("Skipping non-object entry '{}'", name),
            }
        }

        Self { updated, packages }
    }

    /// Parse a snapshot from raw JSON bytes
    pub fn parse(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let document: Map<String, Value> = serde_json::from_slice(bytes)?;
        Ok(Self::from_document(document))
    }

    /// Build a snapshot from an in-memory JSON value
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(document) => Some(Self::from_document(document)),
            _ => None,
        }
    }
}

/// Serializable view of a snapshot, marker first
#[derive(Serialize)]
pub struct SnapshotDocument<'a> {
    #[serde(rename = "_updated", skip_serializing_if = "Option::is_none")]
    pub updated: Option<i64>,
    #[serde(flatten)]
    pub packages: &'a PackageSet,
}

/// The marker is normally a number, but tolerate numeric strings
#[allow(clippy::cast_possible_truncation)]
fn parse_marker(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

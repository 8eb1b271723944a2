//! Cache options and search field validation
//!
//! Options are immutable once a cache is constructed. Search fields arrive as
//! strings (config file, CLI, callers) and are validated against a fixed
//! allow-list when the options are built.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::config::{defaults, urls};
use crate::error::CacheError;
use crate::infra::dirs::CacheDirs;

/// A package field that may be searched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchField {
    Name,
    Description,
    Author,
    License,
    Keywords,
    Dependencies,
    DevDependencies,
}

/// How tokens are pulled out of a field's value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A single text value
    Text,
    /// A list of text values
    TextList,
    /// A map whose keys are searched (dependency names, not ranges)
    KeyValueText,
    /// A person: either a plain string or an object of text subfields
    NameEmailPair,
}

impl SearchField {
    /// Every legal search field
    pub const ALL: [SearchField; 7] = [
        Self::Name,
        Self::Description,
        Self::Author,
        Self::License,
        Self::Keywords,
        Self::Dependencies,
        Self::DevDependencies,
    ];

    /// Field name as it appears in package documents
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Author => "author",
            Self::License => "license",
            Self::Keywords => "keywords",
            Self::Dependencies => "dependencies",
            Self::DevDependencies => "devDependencies",
        }
    }

    /// Token extraction rule for this field
    pub fn kind(self) -> FieldKind {
        match self {
            Self::Name | Self::Description | Self::License => FieldKind::Text,
            Self::Keywords => FieldKind::TextList,
            Self::Dependencies | Self::DevDependencies => FieldKind::KeyValueText,
            Self::Author => FieldKind::NameEmailPair,
        }
    }

    /// Names of all legal fields
    pub fn legal_names() -> Vec<String> {
        Self::ALL.iter().map(|f| f.as_str().to_string()).collect()
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchField {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| CacheError::InvalidConfiguration {
                field: s.to_string(),
                legal: Self::legal_names(),
            })
    }
}

/// Validate a list of search field names
pub fn parse_search_fields<S: AsRef<str>>(fields: &[S]) -> Result<Vec<SearchField>, CacheError> {
    fields.iter().map(|f| f.as_ref().parse()).collect()
}

/// Immutable configuration of a package cache
#[derive(Debug, Clone, Serialize)]
pub struct CacheOptions {
    /// Keywords every cached package must carry one of (empty: no filtering)
    pub keywords: Vec<String>,
    /// Fields searched by the query filter, in order
    pub search_fields: Vec<SearchField>,
    /// Seed the cache from the user's npm registry mirror
    pub use_local: bool,
    /// Location of the user's npm registry mirror
    pub local_cache_path: PathBuf,
    /// Location of the snapshot file this cache reads and writes
    pub cache_path: PathBuf,
    /// Maximum age before the snapshot is considered stale
    #[serde(serialize_with = "serialize_millis")]
    pub ttl: Duration,
    /// Persist the snapshot when it changed
    pub write_cache: bool,
    /// Registry base URL
    pub registry_url: String,
    /// Optional total timeout for registry requests
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_opt_millis")]
    pub fetch_timeout: Option<Duration>,
}

impl CacheOptions {
    /// Start building options from the defaults
    pub fn builder() -> CacheOptionsBuilder {
        CacheOptionsBuilder::default()
    }

    /// TTL in epoch-millisecond units, saturating
    pub fn ttl_millis(&self) -> i64 {
        i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX)
    }
}

impl Default for CacheOptions {
    fn default() -> Self {
        let dirs = CacheDirs::new();
        Self {
            keywords: Vec::new(),
            search_fields: defaults::DEFAULT_SEARCH_FIELDS
                .iter()
                .filter_map(|name| name.parse().ok())
                .collect(),
            use_local: true,
            local_cache_path: dirs.npm_mirror_path(),
            cache_path: dirs.cache_file_path(),
            ttl: defaults::DEFAULT_TTL,
            write_cache: true,
            registry_url: urls::NPM_REGISTRY.to_string(),
            fetch_timeout: None,
        }
    }
}

/// Builder for [`CacheOptions`]
///
/// Search fields are kept as strings until [`CacheOptionsBuilder::build`] so
/// that an illegal name surfaces as [`CacheError::InvalidConfiguration`].
#[derive(Debug, Clone, Default)]
pub struct CacheOptionsBuilder {
    keywords: Option<Vec<String>>,
    search_fields: Option<Vec<String>>,
    use_local: Option<bool>,
    local_cache_path: Option<PathBuf>,
    cache_path: Option<PathBuf>,
    ttl: Option<Duration>,
    write_cache: Option<bool>,
    registry_url: Option<String>,
    fetch_timeout: Option<Duration>,
}

impl CacheOptionsBuilder {
    /// Keyword filter applied to everything entering the cache
    #[must_use]
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }

    /// Fields searched by the query filter
    #[must_use]
    pub fn search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn use_local(mut self, use_local: bool) -> Self {
        self.use_local = Some(use_local);
        self
    }

    #[must_use]
    pub fn local_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_cache_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    #[must_use]
    pub fn write_cache(mut self, write_cache: bool) -> Self {
        self.write_cache = Some(write_cache);
        self
    }

    #[must_use]
    pub fn registry_url(mut self, url: impl Into<String>) -> Self {
        self.registry_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    /// Validate and produce the options
    pub fn build(self) -> Result<CacheOptions, CacheError> {
        let defaults = CacheOptions::default();

        let search_fields = match self.search_fields {
            Some(fields) => parse_search_fields(&fields)?,
            None => defaults.search_fields,
        };

        Ok(CacheOptions {
            keywords: self.keywords.unwrap_or(defaults.keywords),
            search_fields,
            use_local: self.use_local.unwrap_or(defaults.use_local),
            local_cache_path: self.local_cache_path.unwrap_or(defaults.local_cache_path),
            cache_path: self.cache_path.unwrap_or(defaults.cache_path),
            ttl: self.ttl.unwrap_or(defaults.ttl),
            write_cache: self.write_cache.unwrap_or(defaults.write_cache),
            registry_url: self
                .registry_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.registry_url),
            fetch_timeout: self.fetch_timeout.or(defaults.fetch_timeout),
        })
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u128(d.as_millis())
}

#[allow(clippy::ref_option)]
fn serialize_opt_millis<S: serde::Serializer>(
    d: &Option<Duration>,
    s: S,
) -> Result<S::Ok, S::Error> {
    match d {
        Some(d) => s.serialize_u128(d.as_millis()),
        None => s.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = CacheOptions::default();
        assert!(options.keywords.is_empty());
        assert_eq!(
            options.search_fields,
            vec![
                SearchField::Name,
                SearchField::Description,
                SearchField::Keywords
            ]
        );
        assert!(options.use_local);
        assert!(options.write_cache);
        assert_eq!(options.ttl, Duration::from_secs(86_400));
        assert_eq!(options.registry_url, "https://registry.npmjs.org");
        assert!(options
            .local_cache_path
            .ends_with(std::path::Path::new(".npm/-/all/.cache.json")));
        assert!(options.cache_path.ends_with("cache.json"));
    }

    #[test]
    fn test_default_search_fields_match_constant() {
        let options = CacheOptions::default();
        let names: Vec<&str> = options.search_fields.iter().map(|f| f.as_str()).collect();
        assert_eq!(names, defaults::DEFAULT_SEARCH_FIELDS);
    }

    #[test]
    fn test_illegal_search_field_rejected() {
        let result = CacheOptions::builder().search_fields(["foobar"]).build();
        match result {
            Err(CacheError::InvalidConfiguration { field, legal }) => {
                assert_eq!(field, "foobar");
                assert_eq!(legal.len(), 7);
            }
            other => panic!("Expected InvalidConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn test_one_bad_field_poisons_the_list() {
        let result = CacheOptions::builder()
            .search_fields(["name", "homepage"])
            .build();
        assert!(matches!(
            result,
            Err(CacheError::InvalidConfiguration { field, .. }) if field == "homepage"
        ));
    }

    #[test]
    fn test_all_legal_fields_accepted() {
        let options = CacheOptions::builder()
            .search_fields(SearchField::legal_names())
            .build()
            .unwrap();
        assert_eq!(options.search_fields, SearchField::ALL.to_vec());
    }

    #[test]
    fn test_field_names_are_case_sensitive() {
        assert!("devDependencies".parse::<SearchField>().is_ok());
        assert!("devdependencies".parse::<SearchField>().is_err());
    }

    #[test]
    fn test_field_kinds() {
        assert_eq!(SearchField::Name.kind(), FieldKind::Text);
        assert_eq!(SearchField::License.kind(), FieldKind::Text);
        assert_eq!(SearchField::Keywords.kind(), FieldKind::TextList);
        assert_eq!(SearchField::Dependencies.kind(), FieldKind::KeyValueText);
        assert_eq!(SearchField::DevDependencies.kind(), FieldKind::KeyValueText);
        assert_eq!(SearchField::Author.kind(), FieldKind::NameEmailPair);
    }

    #[test]
    fn test_builder_overrides() {
        let options = CacheOptions::builder()
            .keywords(["mongoosejs"])
            .use_local(false)
            .cache_path("/tmp/x/cache.json")
            .ttl(Duration::from_millis(5))
            .write_cache(false)
            .registry_url("http://localhost:1234/")
            .build()
            .unwrap();
        assert_eq!(options.keywords, vec!["mongoosejs".to_string()]);
        assert!(!options.use_local);
        assert_eq!(options.cache_path, PathBuf::from("/tmp/x/cache.json"));
        assert_eq!(options.ttl_millis(), 5);
        assert!(!options.write_cache);
        assert_eq!(options.registry_url, "http://localhost:1234");
    }
}

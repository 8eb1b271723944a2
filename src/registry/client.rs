//! Registry client implementation
//!
//! Fetches package documents from the npm bulk endpoint
//! `/-/all/since?stale=update_after&startkey=<epoch-millis>`.

use std::future::Future;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::config::{defaults, urls};
use crate::core::options::CacheOptions;
use crate::core::package::Snapshot;
use crate::error::FetchError;

/// A source of registry snapshots
///
/// Implementations decide what counts as a failed fetch; callers only ever
/// see a snapshot or a [`FetchError`].
pub trait RegistrySource {
    /// Fetch every package updated since `since` (epoch milliseconds)
    fn fetch_since(&self, since: i64) -> impl Future<Output = Result<Snapshot, FetchError>> + Send;
}

/// Registry client for the npm bulk endpoint
#[derive(Debug, Clone)]
pub struct RegistryClient {
    /// HTTP client
    client: reqwest::Client,
    /// Registry base URL, without trailing slash
    registry_url: String,
}

impl RegistryClient {
    /// Create a client for the public npm registry
    pub fn new() -> Self {
        Self::build(urls::NPM_REGISTRY, None)
    }

    /// Create a client for a custom registry URL
    pub fn with_url(url: impl Into<String>) -> Self {
        Self::build(url, None)
    }

    /// Create a client from cache options (registry URL and timeout)
    pub fn from_options(options: &CacheOptions) -> Self {
        Self::build(options.registry_url.clone(), options.fetch_timeout)
    }

    fn build(url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(defaults::CONNECT_TIMEOUT_SECS))
            .user_agent(concat!("npm-local-cache/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Self {
            client: builder.build().unwrap_or_else(|_| reqwest::Client::new()),
            registry_url: url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Get the registry URL
    pub fn registry_url(&self) -> &str {
        &self.registry_url
    }

    /// URL of the bulk endpoint for a given cursor
    pub fn since_url(&self, since: i64) -> String {
        format!(
            "{}{}?stale=update_after&startkey={since}",
            self.registry_url,
            urls::ALL_SINCE_PATH
        )
    }
}

impl Default for RegistryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrySource for RegistryClient {
    async fn fetch_since(&self, since: i64) -> Result<Snapshot, FetchError> {
        let url = self.since_url(since);
        tracing::info!("Fetching registry updates since {}", since);

        let network_error = |e: reqwest::Error| FetchError::Network {
            url: url.clone(),
            error: e.to_string(),
        };

        let response = self.client.get(&url).send().await.map_err(network_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(network_error)?;

        if !status.is_success() {
            // npm explains most failures in a JSON error document
            let reason = serde_json::from_slice::<Map<String, Value>>(&body)
                .ok()
                .and_then(|document| error_reason(&document));
            return Err(match reason {
                Some(reason) => FetchError::Registry { reason },
                None => FetchError::Status {
                    url,
                    status: status.as_u16(),
                },
            });
        }

        let document: Map<String, Value> =
            serde_json::from_slice(&body).map_err(|e| FetchError::Decode {
                url: url.clone(),
                error: e.to_string(),
            })?;

        if let Some(reason) = error_reason(&document) {
            return Err(FetchError::Registry { reason });
        }

        tracing::debug!("Content fetched from registry: {} bytes", body.len());
        Ok(Snapshot::from_document(document))
    }
}

/// Reason carried by an error document, if `document` is one
///
/// A top-level `error` entry that is an object with a `name` is a package
/// that happens to be called "error", not a failure.
fn error_reason(document: &Map<String, Value>) -> Option<String> {
    match document.get("error")? {
        Value::Object(fields) if fields.contains_key("name") => None,
        Value::String(error) => Some(match document.get("reason").and_then(Value::as_str) {
            Some(reason) => format!("{error}: {reason}"),
            None => error.clone(),
        }),
        other => Some(other.to_string()),
    }
}

//! Registry URLs

/// Public npm registry base URL
pub const NPM_REGISTRY: &str = "https://registry.npmjs.org";

/// Path of the bulk "all packages since" endpoint
pub const ALL_SINCE_PATH: &str = "/-/all/since";

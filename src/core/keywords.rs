//! Keyword filtering
//!
//! Narrows a package set to packages tagged with at least one of a set of
//! keywords. An empty keyword list leaves the set untouched.

use crate::core::package::{PackageRecord, PackageSet};

/// Keep packages whose `keywords` intersect `keywords`
///
/// Packages without keywords are dropped whenever at least one filter keyword
/// is given. Pass a single keyword as a one-element slice.
pub fn filter_by_keywords<K: AsRef<str>>(packages: PackageSet, keywords: &[K]) -> PackageSet {
    if keywords.is_empty() {
        return packages;
    }

    tracing::debug!(
        "Filtering {} packages by {} keyword(s)",
        packages.len(),
        keywords.len()
    );

    packages
        .into_iter()
        .filter(|(_, record)| matches_keywords(record, keywords))
        .collect()
}

/// Whether `record` passes a keyword filter (always true for no keywords)
pub fn matches_keywords<K: AsRef<str>>(record: &PackageRecord, keywords: &[K]) -> bool {
    if keywords.is_empty() {
        return true;
    }
    record
        .keywords()
        .iter()
        .any(|tag| keywords.iter().any(|k| k.as_ref() == *tag))
}

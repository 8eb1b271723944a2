//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;
    use serde_json::{json, Value};

    use crate::core::package::{PackageRecord, PackageSet};

    /// Generate a valid npm package name (lowercase alphanumeric with hyphens)
    pub fn package_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,20}[a-z0-9]?".prop_filter("Name must not be empty", |s| !s.is_empty())
    }

    /// Generate a keyword from a small pool so filters actually hit
    pub fn keyword() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("gulpplugin".to_string()),
            Just("mongoosejs".to_string()),
            Just("express".to_string()),
            Just("cli".to_string()),
            "[a-z]{3,8}",
        ]
    }

    /// Generate a keyword list (possibly empty)
    pub fn keyword_list() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(keyword(), 0..4)
    }

    /// Generate a free-form description
    pub fn description() -> impl Strategy<Value = String> {
        "[A-Za-z ]{0,40}"
    }

    /// Generate a package document, sometimes without keywords
    pub fn package_record() -> impl Strategy<Value = PackageRecord> {
        (package_name(), description(), prop::option::of(keyword_list())).prop_map(
            |(name, description, keywords)| {
                let mut doc = json!({ "name": name, "description": description });
                if let (Some(keywords), Value::Object(fields)) = (keywords, &mut doc) {
                    fields.insert("keywords".to_string(), json!(keywords));
                }
                PackageRecord::from_value(doc).unwrap_or_default()
            },
        )
    }

    /// Generate a package set keyed by the records' own names
    pub fn package_set() -> impl Strategy<Value = PackageSet> {
        prop::collection::vec(package_record(), 0..20).prop_map(|records| {
            records
                .into_iter()
                .map(|record| (record.name().unwrap_or_default().to_string(), record))
                .collect()
        })
    }

    /// Generate a search query of a few lowercase characters
    pub fn query() -> impl Strategy<Value = String> {
        "[a-z]{1,4}"
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use crate::core::keywords::{filter_by_keywords, matches_keywords};
    use crate::core::metadata::CacheState;
    use crate::core::options::SearchField;
    use crate::core::package::Snapshot;
    use crate::core::search::filter_by_query;
    use proptest::prelude::*;

    const FIELDS: [SearchField; 3] = [
        SearchField::Name,
        SearchField::Description,
        SearchField::Keywords,
    ];

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_package_name_generator(name in package_name()) {
            prop_assert!(!name.is_empty());
            prop_assert!(name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }

        #[test]
        fn test_keyword_filter_is_idempotent(packages in package_set(), keywords in keyword_list()) {
            let once = filter_by_keywords(packages, &keywords);
            let twice = filter_by_keywords(once.clone(), &keywords);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_keyword_filter_keeps_exactly_matching(packages in package_set(), keywords in keyword_list()) {
            let filtered = filter_by_keywords(packages.clone(), &keywords);
            for (name, record) in &packages {
                prop_assert_eq!(filtered.contains_key(name), matches_keywords(record, &keywords));
            }
            prop_assert!(filtered.keys().all(|name| packages.contains_key(name)));
        }

        #[test]
        fn test_query_filter_is_pure(packages in package_set(), query in query()) {
            let before = packages.clone();
            let first = filter_by_query(&packages, &FIELDS, &query);
            let second = filter_by_query(&packages, &FIELDS, &query);
            prop_assert_eq!(&packages, &before);
            prop_assert_eq!(&first, &second);
            prop_assert!(first.keys().all(|name| packages.contains_key(name)));
        }

        #[test]
        fn test_query_filter_ignores_input_order(packages in package_set(), query in query()) {
            let forward = filter_by_query(&packages, &FIELDS, &query);
            let backward = filter_by_query(packages.iter().rev(), &FIELDS, &query);
            let mut a: Vec<&String> = forward.keys().collect();
            let mut b: Vec<&String> = backward.keys().collect();
            a.sort();
            b.sort();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn test_delta_overwrites_by_key(base in package_set(), delta in package_set()) {
            let mut state = CacheState::new();
            state.apply_delta(Snapshot { updated: None, packages: base.clone() }, 0);
            state.apply_delta(Snapshot { updated: Some(1), packages: delta.clone() }, 0);

            let merged = state.packages();
            for (name, record) in &delta {
                prop_assert_eq!(merged.get(name), Some(record));
            }
            for (name, record) in &base {
                if !delta.contains_key(name) {
                    prop_assert_eq!(merged.get(name), Some(record));
                }
            }
            prop_assert!(merged.keys().all(|k| base.contains_key(k) || delta.contains_key(k)));
            prop_assert_eq!(state.updated_at(), Some(1));
        }
    }
}

//! Fuzzy query filtering
//!
//! A package matches a query when at least one token taken from its search
//! fields contains the query's characters in order (not necessarily
//! contiguous), ignoring case.

use std::borrow::Cow;

use nucleo_matcher::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use serde_json::Value;

use crate::core::options::{FieldKind, SearchField};
use crate::core::package::{PackageRecord, PackageSet};

/// A compiled query, reusable across packages
///
/// The query is taken verbatim: surrounding whitespace is part of it.
pub struct FuzzyQuery {
    atom: Atom,
    matcher: Matcher,
    buf: Vec<char>,
    empty: bool,
}

impl FuzzyQuery {
    pub fn new(query: &str) -> Self {
        Self {
            atom: Atom::new(
                query,
                CaseMatching::Ignore,
                Normalization::Never,
                AtomKind::Fuzzy,
                false,
            ),
            matcher: Matcher::new(Config::DEFAULT),
            buf: Vec::new(),
            empty: query.is_empty(),
        }
    }

    /// Subsequence match against a single token
    pub fn matches_token(&mut self, token: &str) -> bool {
        if self.empty {
            return true;
        }
        let haystack = Utf32Str::new(token, &mut self.buf);
        self.atom.score(haystack, &mut self.matcher).is_some()
    }

    /// Whether any token from `fields` of `record` matches
    ///
    /// A record without tokens in `fields` never matches, not even the
    /// empty query.
    pub fn matches_record(&mut self, record: &PackageRecord, fields: &[SearchField]) -> bool {
        record_tokens(record, fields)
            .iter()
            .any(|token| self.matches_token(token))
    }
}

/// Flatten the configured fields of a record into text tokens, in field order
///
/// Absent fields and values of an unexpected shape contribute nothing.
pub fn record_tokens<'a>(record: &'a PackageRecord, fields: &[SearchField]) -> Vec<Cow<'a, str>> {
    let mut tokens = Vec::new();
    for field in fields {
        if let Some(value) = record.get(field.as_str()) {
            push_tokens(field.kind(), value, &mut tokens);
        }
    }
    tokens
}

fn push_tokens<'a>(kind: FieldKind, value: &'a Value, tokens: &mut Vec<Cow<'a, str>>) {
    match (kind, value) {
        (FieldKind::Text | FieldKind::TextList | FieldKind::NameEmailPair, Value::String(s)) => {
            tokens.push(Cow::Borrowed(s));
        }
        (FieldKind::Text, Value::Number(n)) => tokens.push(Cow::Owned(n.to_string())),
        (FieldKind::TextList, Value::Array(items)) => {
            tokens.extend(items.iter().filter_map(Value::as_str).map(Cow::Borrowed));
        }
        // dependency names, not their version ranges
        (FieldKind::KeyValueText, Value::Object(entries)) => {
            tokens.extend(entries.keys().map(|k| Cow::Borrowed(k.as_str())));
        }
        (FieldKind::NameEmailPair, Value::Object(person)) => {
            tokens.extend(person.values().filter_map(Value::as_str).map(Cow::Borrowed));
        }
        _ => {}
    }
}

/// Keep packages whose `fields` fuzzy-match `query`
///
/// Accepts any iterator of borrowed entries so callers can pre-filter
/// without cloning the whole set.
pub fn filter_by_query<'a, I>(packages: I, fields: &[SearchField], query: &str) -> PackageSet
where
    I: IntoIterator<Item = (&'a String, &'a PackageRecord)>,
{
    let mut fuzzy = FuzzyQuery::new(query);

    tracing::debug!("Searching '{}' in {:?}", query, fields);

    packages
        .into_iter()
        .filter(|(_, record)| fuzzy.matches_record(record, fields))
        .map(|(name, record)| (name.clone(), record.clone()))
        .collect()
}

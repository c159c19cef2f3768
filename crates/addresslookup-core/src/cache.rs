// crates/addresslookup-core/src/cache.rs

//! # Cache Store
//!
//! Append-only log of completed suggestion lookups for one widget instance.
//! Entries are addressed by their position in the log, which is what the
//! [`SuggestionHierarchy`](crate::hierarchy::SuggestionHierarchy) stores, and
//! found again through their [`Signature`].
//!
//! Nothing is ever evicted: a page session issues a few dozen distinct
//! queries at most, and keeping them all makes back-navigation free.

use crate::model::{SuggestionItem, SuggestionRequest};
use crate::text::{normalize_country, normalize_query};
use std::collections::HashMap;

/// Deterministic key of a suggestion lookup.
///
/// Built from normalized fields rather than from an encoded URL, so two
/// requests that differ only in whitespace or country-code case hit the same
/// entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    query: String,
    path_filter: Option<String>,
    country: String,
    single_summary: bool,
}

impl Signature {
    pub fn new(query: &str, path_filter: Option<&str>, country: &str, single_summary: bool) -> Self {
        Self {
            query: normalize_query(query),
            path_filter: path_filter
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
            country: normalize_country(country),
            single_summary,
        }
    }

    pub fn of(request: &SuggestionRequest) -> Self {
        Self::new(
            &request.query,
            request.path_filter.as_deref(),
            &request.country,
            request.single_summary,
        )
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn path_filter(&self) -> Option<&str> {
        self.path_filter.as_deref()
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn single_summary(&self) -> bool {
        self.single_summary
    }
}

/// One level of suggestions, as it was displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub signature: Signature,
    pub suggestions: Vec<SuggestionItem>,
    /// Text shown for this level on the back row of its children.
    pub label: String,
}

#[derive(Debug, Default)]
pub struct CacheStore {
    entries: Vec<CacheEntry>,
    by_signature: HashMap<Signature, usize>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, signature: &Signature) -> Option<usize> {
        self.by_signature.get(signature).copied()
    }

    /// Appends `entry` and returns its index.
    ///
    /// Entries are immutable: if the signature is already present the existing
    /// index is returned and `entry` is dropped.
    pub fn insert(&mut self, entry: CacheEntry) -> usize {
        if let Some(index) = self.lookup(&entry.signature) {
            return index;
        }
        let index = self.entries.len();
        self.by_signature.insert(entry.signature.clone(), index);
        self.entries.push(entry);
        index
    }

    pub fn get(&self, index: usize) -> Option<&CacheEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

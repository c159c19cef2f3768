// crates/addresslookup-core/src/service.rs

use crate::error::{AutocompleteError, Result};
use crate::model::{AddressRecord, Geolocation, RetrieveRequest, SuggestionItem, SuggestionRequest};
use crate::text::normalize_query;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

/// The remote address-search service, as seen by a synchronous host.
///
/// [`crate::client::PostcoderClient`] talks to the real endpoints;
/// [`MemoryService`] answers from canned data.
pub trait LookupService {
    fn find(&self, request: &SuggestionRequest) -> Result<Vec<SuggestionItem>>;
    fn retrieve(&self, request: &RetrieveRequest) -> Result<Vec<AddressRecord>>;
    fn geolocate(&self) -> Result<Geolocation>;
}

impl<S: LookupService + ?Sized> LookupService for &S {
    fn find(&self, request: &SuggestionRequest) -> Result<Vec<SuggestionItem>> {
        (**self).find(request)
    }

    fn retrieve(&self, request: &RetrieveRequest) -> Result<Vec<AddressRecord>> {
        (**self).retrieve(request)
    }

    fn geolocate(&self) -> Result<Geolocation> {
        (**self).geolocate()
    }
}

type FindKey = (String, Option<String>);

/// In-memory service with canned answers. Counts calls, which makes it the
/// natural fixture for tests and demos.
///
/// Unknown queries answer with an empty list; unknown ids with zero records.
#[derive(Debug, Default)]
pub struct MemoryService {
    suggestions: HashMap<FindKey, Vec<SuggestionItem>>,
    addresses: HashMap<String, AddressRecord>,
    failing: HashSet<String>,
    country: Option<String>,
    find_calls: Cell<usize>,
    retrieve_calls: Cell<usize>,
    requests: RefCell<Vec<SuggestionRequest>>,
}

impl MemoryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer lookups of `query` (within `path_filter`) with `items`.
    pub fn with_suggestions(
        mut self,
        query: &str,
        path_filter: Option<&str>,
        items: Vec<SuggestionItem>,
    ) -> Self {
        self.suggestions
            .insert((normalize_query(query), path_filter.map(str::to_owned)), items);
        self
    }

    pub fn with_address(mut self, id: &str, address: AddressRecord) -> Self {
        self.addresses.insert(id.to_string(), address);
        self
    }

    /// Lookups of `query` fail with HTTP 500.
    pub fn with_failure(mut self, query: &str) -> Self {
        self.failing.insert(normalize_query(query));
        self
    }

    pub fn with_country(mut self, code: &str) -> Self {
        self.country = Some(code.to_string());
        self
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls.get()
    }

    pub fn retrieve_calls(&self) -> usize {
        self.retrieve_calls.get()
    }

    /// Every lookup received, in order.
    pub fn requests(&self) -> Vec<SuggestionRequest> {
        self.requests.borrow().clone()
    }
}

impl LookupService for MemoryService {
    fn find(&self, request: &SuggestionRequest) -> Result<Vec<SuggestionItem>> {
        self.find_calls.set(self.find_calls.get() + 1);
        self.requests.borrow_mut().push(request.clone());

        let query = normalize_query(&request.query);
        if self.failing.contains(&query) {
            return Err(AutocompleteError::transport(Some(500), "Internal Server Error"));
        }
        let key = (query, request.path_filter.clone());
        Ok(self.suggestions.get(&key).cloned().unwrap_or_default())
    }

    fn retrieve(&self, request: &RetrieveRequest) -> Result<Vec<AddressRecord>> {
        self.retrieve_calls.set(self.retrieve_calls.get() + 1);
        Ok(self.addresses.get(&request.id).cloned().into_iter().collect())
    }

    fn geolocate(&self) -> Result<Geolocation> {
        self.country
            .as_ref()
            .map(|code| Geolocation {
                country_code: code.clone(),
            })
            .ok_or_else(|| AutocompleteError::transport(Some(404), "Not Found"))
    }
}

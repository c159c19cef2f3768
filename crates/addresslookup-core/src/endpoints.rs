// crates/addresslookup-core/src/endpoints.rs

//! URLs of the three service endpoints.
//!
//! Kept apart from the HTTP client so that hosts doing their own I/O (the wasm
//! binding hands URLs to `fetch`) build exactly the same requests.

use crate::config::WidgetConfig;
use crate::error::{AutocompleteError, Result};
use crate::model::{RetrieveRequest, SuggestionRequest};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
    api_key: String,
}

impl Endpoints {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self {
            base: Url::parse(&base)?,
            api_key: api_key.trim().to_string(),
        })
    }

    pub fn from_config(config: &WidgetConfig) -> Result<Self> {
        Self::new(config.base_url(), &config.api_key)
    }

    /// `{base}/autocomplete/find`
    pub fn find_url(&self, request: &SuggestionRequest) -> Result<Url> {
        let mut url = self.base.join("autocomplete/find")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("apikey", &self.api_key)
                .append_pair("country", &request.country)
                .append_pair("maximumresults", &request.maximum_results.to_string())
                .append_pair("query", &request.query);
            if let Some(filter) = &request.path_filter {
                query.append_pair("pathfilter", filter);
            }
            if request.single_summary {
                query.append_pair("singlesummary", "true");
            }
        }
        Ok(url)
    }

    /// `{base}/autocomplete/retrieve`
    pub fn retrieve_url(&self, request: &RetrieveRequest) -> Result<Url> {
        let mut url = self.base.join("autocomplete/retrieve")?;
        url.query_pairs_mut()
            .append_pair("apikey", &self.api_key)
            .append_pair("country", &request.country)
            .append_pair("query", &request.query)
            .append_pair("id", &request.id)
            .append_pair("lines", &request.lines.to_string())
            .append_pair("exclude", &request.exclude.join(","));
        Ok(url)
    }

    /// `{base}/{apikey}/ipaddress`
    pub fn geolocate_url(&self) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| AutocompleteError::Config("base url cannot carry a path".into()))?
            .pop_if_empty()
            .push(&self.api_key)
            .push("ipaddress");
        Ok(url)
    }
}

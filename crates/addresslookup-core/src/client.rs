// crates/addresslookup-core/src/client.rs
#![cfg(feature = "client")]

use crate::config::WidgetConfig;
use crate::endpoints::Endpoints;
use crate::error::{AutocompleteError, Result};
use crate::model::{AddressRecord, Geolocation, RetrieveRequest, SuggestionItem, SuggestionRequest};
use crate::service::LookupService;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking client for the Postcoder endpoints.
#[derive(Debug, Clone)]
pub struct PostcoderClient {
    http: Client,
    endpoints: Endpoints,
}

impl PostcoderClient {
    pub fn new(endpoints: Endpoints) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("addresslookup/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http, endpoints })
    }

    pub fn from_config(config: &WidgetConfig) -> Result<Self> {
        config.validate()?;
        Self::new(Endpoints::from_config(config)?)
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// GETs `url` and decodes the JSON body. Non-2xx answers become
    /// [`AutocompleteError::Transport`] carrying the response text.
    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        // the query string holds the api key
        debug!(path = url.path(), "GET");
        let response = self.http.get(url).send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(AutocompleteError::transport(Some(status.as_u16()), body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

impl LookupService for PostcoderClient {
    fn find(&self, request: &SuggestionRequest) -> Result<Vec<SuggestionItem>> {
        self.get_json(self.endpoints.find_url(request)?)
    }

    fn retrieve(&self, request: &RetrieveRequest) -> Result<Vec<AddressRecord>> {
        self.get_json(self.endpoints.retrieve_url(request)?)
    }

    fn geolocate(&self) -> Result<Geolocation> {
        self.get_json(self.endpoints.geolocate_url()?)
    }
}

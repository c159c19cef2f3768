// crates/addresslookup-core/src/config.rs

//! # Widget Configuration
//!
//! The option object a host page hands to the widget. Keys are kept flat and
//! identical to the ones page authors already write:
//!
//! ```json
//! {
//!   "apikey": "PCW45-12345-12345-1234X",
//!   "searchterm": "#txtSearch",
//!   "suggestions": "#suggestion_list",
//!   "country": "#country",
//!   "addressline1": "#txtAddressLine1",
//!   "addressline2": "#txtAddressLine2",
//!   "posttown": "#txtTown",
//!   "postcode": "#txtPostcode",
//!   "singlesummary": true
//! }
//! ```

use crate::error::{AutocompleteError, Result};
use crate::model::AddressField;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://ws.postcoder.com/pcw";
pub const DEFAULT_INPUT_DELAY_MS: u64 = 300;
pub const DEFAULT_NO_RESULTS_MESSAGE: &str = "No addresses found";

/// Logical address field → target selector.
///
/// A field without a selector (absent or empty) is simply not written;
/// partial mappings are valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    pub organisation: Option<String>,
    pub addressline1: Option<String>,
    pub addressline2: Option<String>,
    pub addressline3: Option<String>,
    pub addressline4: Option<String>,
    pub posttown: Option<String>,
    pub county: Option<String>,
    pub postcode: Option<String>,
}

impl FieldMapping {
    /// Target selector of `field`, if configured and non-empty.
    pub fn selector(&self, field: AddressField) -> Option<&str> {
        let slot = match field {
            AddressField::Organisation => &self.organisation,
            AddressField::AddressLine1 => &self.addressline1,
            AddressField::AddressLine2 => &self.addressline2,
            AddressField::AddressLine3 => &self.addressline3,
            AddressField::AddressLine4 => &self.addressline4,
            AddressField::PostTown => &self.posttown,
            AddressField::County => &self.county,
            AddressField::PostCode => &self.postcode,
        };
        slot.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Builder-style setter, mostly for hosts that assemble a mapping in code.
    pub fn with(mut self, field: AddressField, selector: impl Into<String>) -> Self {
        let value = Some(selector.into());
        match field {
            AddressField::Organisation => self.organisation = value,
            AddressField::AddressLine1 => self.addressline1 = value,
            AddressField::AddressLine2 => self.addressline2 = value,
            AddressField::AddressLine3 => self.addressline3 = value,
            AddressField::AddressLine4 => self.addressline4 = value,
            AddressField::PostTown => self.posttown = value,
            AddressField::County => self.county = value,
            AddressField::PostCode => self.postcode = value,
        }
        self
    }

    /// Number of address lines the service should fold the address into.
    ///
    /// Counts the configured address-line selectors, never less than one.
    pub fn address_lines(&self) -> u8 {
        let configured = AddressField::ADDRESS_LINES
            .iter()
            .filter(|f| self.selector(**f).is_some())
            .count() as u8;
        configured.max(1)
    }
}

/// Every option the widget recognizes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    #[serde(rename = "apikey")]
    pub api_key: String,

    /// Selector of the suggestion list container.
    pub suggestions: Option<String>,
    /// Selector of the free-text search input.
    #[serde(rename = "searchterm")]
    pub search_term: Option<String>,
    /// Selector of the country field.
    pub country: Option<String>,

    #[serde(flatten)]
    pub fields: FieldMapping,

    /// Literal country code; wins over the country field when non-empty.
    #[serde(rename = "countrycode")]
    pub country_code: Option<String>,
    #[serde(rename = "singlesummary")]
    pub single_summary: bool,
    pub geolocate: bool,

    /// Debounce delay in milliseconds.
    #[serde(rename = "inputdelay")]
    pub input_delay_ms: Option<u64>,
    #[serde(rename = "baseurl")]
    pub base_url: Option<String>,
    #[serde(rename = "noresultsmessage")]
    pub no_results_message: Option<String>,
}

impl WidgetConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(AutocompleteError::Config("apikey is required".into()));
        }
        Url::parse(self.base_url())?;
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn input_delay(&self) -> Duration {
        Duration::from_millis(self.input_delay_ms.unwrap_or(DEFAULT_INPUT_DELAY_MS))
    }

    /// Country override from configuration, if any.
    pub fn country_override(&self) -> Option<&str> {
        self.country_code
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn no_results_message(&self) -> &str {
        self.no_results_message
            .as_deref()
            .unwrap_or(DEFAULT_NO_RESULTS_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_option_object() {
        let json = r##"{
            "apikey": "PCW45-12345",
            "searchterm": "#txtSearch",
            "suggestions": "#suggestion_list",
            "country": "#country",
            "addressline1": "#line1",
            "addressline2": "",
            "posttown": "#town",
            "postcode": "#postcode",
            "singlesummary": true
        }"##;
        let cfg = WidgetConfig::from_json_str(json).unwrap();
        assert_eq!(cfg.api_key, "PCW45-12345");
        assert!(cfg.single_summary);
        assert_eq!(cfg.fields.selector(AddressField::AddressLine1), Some("#line1"));
        assert_eq!(cfg.fields.selector(AddressField::AddressLine2), None);
        assert_eq!(cfg.fields.selector(AddressField::Organisation), None);
        assert_eq!(cfg.fields.address_lines(), 1);
        assert_eq!(cfg.input_delay(), Duration::from_millis(300));
        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let err = WidgetConfig::from_json_str(r##"{"searchterm":"#q"}"##).unwrap_err();
        assert!(matches!(err, AutocompleteError::Config(_)));
    }

    #[test]
    fn country_override_ignores_blank() {
        let mut cfg = WidgetConfig::new("key");
        cfg.country_code = Some("  ".into());
        assert_eq!(cfg.country_override(), None);
        cfg.country_code = Some("UK".into());
        assert_eq!(cfg.country_override(), Some("UK"));
    }

    #[test]
    fn address_lines_counts_configured_selectors() {
        let mapping = FieldMapping::default()
            .with(AddressField::AddressLine1, "#l1")
            .with(AddressField::AddressLine2, "#l2")
            .with(AddressField::AddressLine3, "#l3");
        assert_eq!(mapping.address_lines(), 3);
        assert_eq!(FieldMapping::default().address_lines(), 1);
    }
}

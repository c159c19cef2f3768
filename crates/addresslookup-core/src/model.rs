// crates/addresslookup-core/src/model.rs

//! # Wire Model
//!
//! Records exchanged with the address-search service, and the request
//! parameter sets the session hands to whoever performs the I/O.
//!
//! Field names follow the service's JSON (`summaryline`, `posttown`, ...);
//! Rust-side names are snake_case and renamed with serde.

use serde::{Deserialize, Serialize};

/// Result cap sent with every suggestion lookup.
pub const MAXIMUM_RESULTS: u8 = 10;

/// Summary fields the retrieval asks the service to keep out of the
/// address lines.
pub const RETRIEVE_EXCLUDE: &[&str] = &["organisation", "posttown", "county", "postcode", "country"];

// -----------------------------------------------------------------------------
// SUGGESTIONS
// -----------------------------------------------------------------------------

/// What selecting a suggestion does.
///
/// The service tags terminal matches with `"ADD"`; every other tag
/// (streets, buildings, ...) can be narrowed further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum SuggestionKind {
    /// Further drill-down is possible.
    More,
    /// Terminal, retrievable address.
    Address,
}

impl From<String> for SuggestionKind {
    fn from(tag: String) -> Self {
        if tag.eq_ignore_ascii_case("ADD") {
            SuggestionKind::Address
        } else {
            SuggestionKind::More
        }
    }
}

impl SuggestionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SuggestionKind::Address => "ADD",
            SuggestionKind::More => "MORE",
        }
    }
}

impl Serialize for SuggestionKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single suggestion as returned by the lookup endpoint. Read-only to the
/// session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    #[serde(rename = "summaryline", default)]
    pub summary_line: String,
    #[serde(rename = "locationsummary", default)]
    pub location_summary: String,
    #[serde(rename = "count", default)]
    pub match_count: u32,
}

impl SuggestionItem {
    pub fn more(id: impl Into<String>, summary: impl Into<String>, location: impl Into<String>, count: u32) -> Self {
        Self {
            id: id.into(),
            kind: SuggestionKind::More,
            summary_line: summary.into(),
            location_summary: location.into(),
            match_count: count,
        }
    }

    pub fn address(id: impl Into<String>, summary: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: SuggestionKind::Address,
            summary_line: summary.into(),
            location_summary: location.into(),
            match_count: 1,
        }
    }
}

// -----------------------------------------------------------------------------
// ADDRESSES
// -----------------------------------------------------------------------------

/// Logical address fields that can be mapped onto form targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressField {
    Organisation,
    AddressLine1,
    AddressLine2,
    AddressLine3,
    AddressLine4,
    PostTown,
    County,
    PostCode,
}

impl AddressField {
    /// Population order.
    pub const ALL: [AddressField; 8] = [
        AddressField::Organisation,
        AddressField::AddressLine1,
        AddressField::AddressLine2,
        AddressField::AddressLine3,
        AddressField::AddressLine4,
        AddressField::PostTown,
        AddressField::County,
        AddressField::PostCode,
    ];

    pub const ADDRESS_LINES: [AddressField; 4] = [
        AddressField::AddressLine1,
        AddressField::AddressLine2,
        AddressField::AddressLine3,
        AddressField::AddressLine4,
    ];

    /// Key used both in the service's JSON and in the widget configuration.
    pub fn key(self) -> &'static str {
        match self {
            AddressField::Organisation => "organisation",
            AddressField::AddressLine1 => "addressline1",
            AddressField::AddressLine2 => "addressline2",
            AddressField::AddressLine3 => "addressline3",
            AddressField::AddressLine4 => "addressline4",
            AddressField::PostTown => "posttown",
            AddressField::County => "county",
            AddressField::PostCode => "postcode",
        }
    }
}

/// A fully retrieved address. Absent fields deserialize to `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressRecord {
    pub organisation: String,
    pub addressline1: String,
    pub addressline2: String,
    pub addressline3: String,
    pub addressline4: String,
    pub posttown: String,
    pub county: String,
    pub postcode: String,
    pub country: String,
}

impl AddressRecord {
    pub fn field(&self, field: AddressField) -> &str {
        match field {
            AddressField::Organisation => &self.organisation,
            AddressField::AddressLine1 => &self.addressline1,
            AddressField::AddressLine2 => &self.addressline2,
            AddressField::AddressLine3 => &self.addressline3,
            AddressField::AddressLine4 => &self.addressline4,
            AddressField::PostTown => &self.posttown,
            AddressField::County => &self.county,
            AddressField::PostCode => &self.postcode,
        }
    }
}

/// Answer of the IP geolocation endpoint. Only the country code is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geolocation {
    #[serde(rename = "countrycode", default)]
    pub country_code: String,
}

// -----------------------------------------------------------------------------
// REQUESTS
// -----------------------------------------------------------------------------

/// Parameters of one suggestion lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionRequest {
    pub query: String,
    pub country: String,
    pub maximum_results: u8,
    pub path_filter: Option<String>,
    pub single_summary: bool,
}

/// Parameters of one address retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrieveRequest {
    pub country: String,
    pub query: String,
    pub id: String,
    pub lines: u8,
    pub exclude: Vec<String>,
}

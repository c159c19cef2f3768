// crates/addresslookup-core/src/materialize.rs

use crate::config::FieldMapping;
use crate::model::{AddressField, AddressRecord};
use serde::{Deserialize, Serialize};

/// One value to write into one form target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldWrite {
    pub field: AddressField,
    pub selector: String,
    pub value: String,
}

/// Maps `address` onto the configured targets.
///
/// Only fields with a selector produce a write; a configured field missing
/// from the record is written as `""` so stale form content is cleared.
pub fn materialize(address: &AddressRecord, mapping: &FieldMapping) -> Vec<FieldWrite> {
    AddressField::ALL
        .iter()
        .filter_map(|&field| {
            mapping.selector(field).map(|selector| FieldWrite {
                field,
                selector: selector.to_string(),
                value: address.field(field).to_string(),
            })
        })
        .collect()
}

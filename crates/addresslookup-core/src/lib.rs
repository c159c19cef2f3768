// crates/addresslookup-core/src/lib.rs

//! addresslookup-core — the suggestion session behind an address autocomplete
//!
//! As a user types, the session debounces input, asks the address-search
//! service for suggestions, keeps every answer in a per-session cache, lets
//! the user drill from broad matches (a street) into narrow ones (a house)
//! and back, and finally maps the retrieved address onto a form.
//!
//! The session performs no I/O. Feed it events, execute the [`Effect`]s it
//! returns. [`BlockingDriver`] does the executing for synchronous hosts.
//!
//! ```rust
//! use addresslookup_core::prelude::*;
//!
//! let service = MemoryService::new().with_suggestions(
//!     "10 Down",
//!     None,
//!     vec![SuggestionItem::more("GB|1", "Downing Street", "London SW1A", 14)],
//! );
//! let mut config = WidgetConfig::new("PCW45-12345");
//! config.country_code = Some("UK".into());
//!
//! let session = AutocompleteSession::new(config)?;
//! let mut driver = BlockingDriver::new(session, service);
//! driver.search("10 Down");
//!
//! let rows = driver.session().rows();
//! assert_eq!(rows[0].text(), "Downing Street London SW1A (14 addresses)");
//! # Ok::<(), addresslookup_core::AutocompleteError>(())
//! ```

pub mod cache;
pub mod client; // The HTTP collaborator, gated on "client"
pub mod config;
pub mod driver;
pub mod endpoints;
pub mod error;
pub mod hierarchy;
pub mod materialize;
pub mod model;
pub mod render;
pub mod selection;
pub mod service;
pub mod session; // The state machine
pub mod text;

// Re-exports
pub use crate::error::{AutocompleteError, Diagnostic, ErrorKind, Result};
pub use crate::session::{AutocompleteSession, Effect, KeyOutcome, ListState, SessionState, Ticket};
pub use crate::driver::BlockingDriver;

pub mod prelude {
    pub use crate::config::{FieldMapping, WidgetConfig};
    pub use crate::driver::BlockingDriver;
    pub use crate::endpoints::Endpoints;
    pub use crate::error::{AutocompleteError, Diagnostic, ErrorKind, Result};
    pub use crate::materialize::FieldWrite;
    pub use crate::model::{AddressField, AddressRecord, SuggestionItem, SuggestionKind};
    pub use crate::render::{DisplayRow, RowKind};
    pub use crate::selection::{Direction, Keymap, NavAction};
    pub use crate::service::{LookupService, MemoryService};
    pub use crate::session::{AutocompleteSession, Effect, ListState, Ticket};

    #[cfg(feature = "client")]
    pub use crate::client::PostcoderClient;
}

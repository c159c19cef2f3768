//! addresslookup-cli
//! =================
//!
//! Command-line interface for the `addresslookup-core` suggestion session.
//!
//! This crate primarily provides a binary (`addresslookup`). The library
//! target only carries this overview so that the documentation has a page.
//!
//! Quick start
//! -----------
//!
//! ```text
//! export POSTCODER_API_KEY=PCW45-...
//! addresslookup --help
//! addresslookup find "10 Down" --country UK
//! addresslookup retrieve "GB|RM|A|12345|10" --query "10 Down"
//! addresslookup locate
//! addresslookup --config widget.json session
//! ```
//!
//! For programmatic access to the session and its effects, use the
//! [`addresslookup-core`] crate directly.
#![cfg_attr(docsrs, feature(doc_cfg))]

// No API here; the binary is the deliverable.

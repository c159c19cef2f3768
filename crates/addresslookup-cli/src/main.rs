//! addresslookup-cli — Command-line interface for addresslookup-core
//!
//! This binary talks to the Postcoder autocomplete service directly and can
//! replay a full widget session in the terminal: type a query, walk the
//! suggestions with the arrow keys, drill into streets and retrieve an
//! address, exactly as the browser widget would.
//!
//! Usage examples
//! --------------
//!
//! - Suggestions for a query
//!   $ addresslookup --api-key PCW45-... find "10 Down" --country UK
//!
//! - Narrow to within a street
//!   $ addresslookup find "10 Down" --country UK --path-filter "GB|RM|A|12345"
//!
//! - Retrieve an address by id
//!   $ addresslookup retrieve "GB|RM|A|12345|10" --query "10 Down" --country UK
//!
//! - Geolocate the current machine
//!   $ addresslookup locate
//!
//! - Interactive session
//!   $ addresslookup --config widget.json session
//!
//! The API key can also come from `POSTCODER_API_KEY`. Set `RUST_LOG=debug`
//! to see cache hits and superseded lookups.
mod args;
mod repl;

use crate::args::{CliArgs, Commands};
use addresslookup_core::model::{RetrieveRequest, SuggestionRequest, MAXIMUM_RESULTS, RETRIEVE_EXCLUDE};
use addresslookup_core::prelude::*;
use addresslookup_core::render::{render, RenderView};
use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let config = build_config(&args)?;
    let client = PostcoderClient::from_config(&config)?;
    let country = config.country_override().unwrap_or("UK").to_string();

    match args.command {
        Commands::Find { query, path_filter } => {
            let request = SuggestionRequest {
                query,
                country,
                maximum_results: MAXIMUM_RESULTS,
                path_filter,
                single_summary: config.single_summary,
            };
            let items = client.find(&request)?;
            let rows = render(&RenderView {
                suggestions: &items,
                back: None,
                cursor: None,
                single_summary: config.single_summary,
                placeholder: config.no_results_message(),
            });
            for (item, row) in items.iter().zip(&rows) {
                println!("[{}] {:<24} {}", item.kind.as_str(), item.id, row.text());
            }
            if items.is_empty() {
                println!("{}", config.no_results_message());
            }
        }

        Commands::Retrieve { id, query, lines } => {
            let request = RetrieveRequest {
                country,
                query,
                id,
                lines,
                exclude: RETRIEVE_EXCLUDE.iter().map(|s| s.to_string()).collect(),
            };
            let records = client.retrieve(&request)?;
            match records.first() {
                Some(address) => {
                    for field in AddressField::ALL {
                        let value = address.field(field);
                        if !value.is_empty() {
                            println!("{:<13} {value}", field.key());
                        }
                    }
                    if !address.country.is_empty() {
                        println!("{:<13} {}", "country", address.country);
                    }
                }
                None => eprintln!("No address found for: {}", request.id),
            }
        }

        Commands::Locate => {
            let geo = client.geolocate()?;
            println!("Country: {}", geo.country_code);
        }

        Commands::Session => {
            let mut driver = open_session(config, client, &country)?;
            repl::run(&mut driver)?;
        }
    }

    Ok(())
}

/// Session for the REPL. The country field starts at `country`, the same
/// default the one-shot commands use; geolocation may still replace it.
fn open_session<S: LookupService>(
    mut config: WidgetConfig,
    service: S,
    country: &str,
) -> anyhow::Result<BlockingDriver<S>> {
    if config.fields == FieldMapping::default() {
        // no form to fill: show every field under its own name
        config.fields = AddressField::ALL
            .iter()
            .fold(FieldMapping::default(), |m, f| m.with(*f, f.key()));
    }
    let session = AutocompleteSession::new(config)?;
    let mut driver = BlockingDriver::new(session, service);
    driver.country_changed(country);
    Ok(driver)
}

/// Config file first, then command-line flags on top.
fn build_config(args: &CliArgs) -> anyhow::Result<WidgetConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<WidgetConfig>(&json)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => WidgetConfig::default(),
    };

    if let Some(key) = &args.api_key {
        config.api_key = key.clone();
    }
    if let Some(country) = &args.country {
        config.country_code = Some(country.clone());
    }
    if let Some(base) = &args.base_url {
        config.base_url = Some(base.clone());
    }
    if args.single_summary {
        config.single_summary = true;
    }

    config
        .validate()
        .context("an API key is required (--api-key or POSTCODER_API_KEY)")?;
    debug!(base_url = config.base_url(), country = ?config.country_override(), "configuration ready");
    Ok(config)
}

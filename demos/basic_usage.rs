//! Basic usage example for addresslookup-rs
//!
//! Replays a widget session against an in-memory service: type a query,
//! drill into a street, pick a house and print the form writes.

use addresslookup_core::prelude::*;

fn main() -> Result<()> {
    println!("=== addresslookup-rs Basic Usage Example ===\n");

    let service = MemoryService::new()
        .with_suggestions(
            "10 Down",
            None,
            vec![
                SuggestionItem::more("GB|RM|A|1", "Downing Street", "London SW1A", 14),
                SuggestionItem::more("GB|RM|A|2", "Down Street", "London W1J", 137),
            ],
        )
        .with_suggestions(
            "10 Down",
            Some("GB|RM|A|1"),
            vec![SuggestionItem::address("GB|RM|A|1|10", "10 Downing Street", "London SW1A 2AA")],
        )
        .with_address(
            "GB|RM|A|1|10",
            AddressRecord {
                addressline1: "10 Downing Street".into(),
                posttown: "London".into(),
                postcode: "SW1A 2AA".into(),
                ..AddressRecord::default()
            },
        );

    let mut config = WidgetConfig::new("PCW45-DEMO");
    config.country_code = Some("UK".into());
    config.fields = FieldMapping::default()
        .with(AddressField::AddressLine1, "#line1")
        .with(AddressField::PostTown, "#town")
        .with(AddressField::PostCode, "#postcode");

    let session = AutocompleteSession::new(config)?;
    let mut driver = BlockingDriver::new(session, service);

    // Example 1: a query becomes a list of suggestions
    println!("--- Example 1: Searching for \"10 Down\" ---");
    driver.search("10 Down");
    print_rows(&driver.session().rows());
    println!();

    // Example 2: confirming a street narrows the search
    println!("--- Example 2: Drilling into the first street ---");
    driver.key("ArrowDown");
    driver.key("Enter");
    print_rows(&driver.session().rows());
    println!("  Depth: {}", driver.session().hierarchy().depth());
    println!();

    // Example 3: confirming an address fills the form
    println!("--- Example 3: Selecting the address ---");
    let effects = driver.select_row(1);
    for effect in &effects {
        if let Effect::WriteField(write) = effect {
            println!("  {:<10} <- {}", write.selector, write.value);
        }
    }
    println!("  List open: {}", driver.session().is_open());
    println!();

    println!("Lookups: {}, retrievals: {}", driver.service().find_calls(), driver.service().retrieve_calls());
    Ok(())
}

fn print_rows(rows: &[DisplayRow]) {
    for (i, row) in rows.iter().enumerate() {
        let marker = if row.selected { '>' } else { ' ' };
        println!("{marker} {i}: {}", row.text());
    }
}

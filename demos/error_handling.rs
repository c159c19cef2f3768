//! Error handling example for addresslookup-rs
//!
//! This example demonstrates how failures surface: configuration errors are
//! returned, while service failures during a session become `Report`
//! effects and leave the session usable.

use addresslookup_core::prelude::*;

fn main() -> Result<()> {
    println!("=== addresslookup-rs Error Handling Example ===\n");

    // Example 1: invalid configuration is rejected up front
    println!("--- Example 1: Configuration errors ---");
    for json in [r#"{"apikey": ""}"#, r#"{"apikey": "x", "baseurl": "not a url"}"#, "{"] {
        match WidgetConfig::from_json_str(json) {
            Ok(_) => println!("  Accepted: {json}"),
            Err(e) => println!("  Rejected ({:?}): {e}", e.kind()),
        }
    }
    println!();

    let service = MemoryService::new()
        .with_suggestions(
            "High Street",
            None,
            vec![SuggestionItem::more("GB|1", "High Street", "Bristol", 42)],
        )
        .with_failure("Low Street");
    let mut config = WidgetConfig::new("PCW45-DEMO");
    config.country_code = Some("UK".into());
    let mut driver = BlockingDriver::new(AutocompleteSession::new(config)?, service);

    // Example 2: a failed lookup is reported, the list stays as it was
    println!("--- Example 2: Service failure during a session ---");
    driver.search("High Street");
    for effect in driver.search("Low Street") {
        if let Effect::Report(diagnostic) = effect {
            println!("  Report [{:?}]: {}", diagnostic.kind, diagnostic.message);
        }
    }
    println!("  Still showing {} suggestion(s)", driver.session().suggestions().len());
    println!();

    // Example 3: too-short input is never sent
    println!("--- Example 3: Short queries ---");
    for text in ["", "Hi", " H  i "] {
        driver.search(text);
        println!("  {text:?}: open = {}", driver.session().is_open());
    }
    println!("  Lookups sent: {}", driver.service().find_calls());
    println!();

    // Example 4: unknown ids retrieve nothing
    println!("--- Example 4: Retrieval without a result ---");
    driver.search("High Street");
    let request = driver.session_mut().retrieve_address("GB|404");
    let effects = driver.run(request);
    for effect in effects {
        if let Effect::Report(diagnostic) = effect {
            println!("  Report [{:?}]: {}", diagnostic.kind, diagnostic.message);
        }
    }

    Ok(())
}

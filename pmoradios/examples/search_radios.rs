//! Example: Search the radio directory and print the result rows
//!
//! Run with: cargo run -p pmoradios --example search_radios -- [search] [country]
//!
//! Without a search string, the most-wanted stations are listed. An optional
//! country restricts the results.

use pmoconfig::get_config;
use pmoradios::filters::COUNTRY_FILTER;
use pmoradios::{RadioHandler, StaticFilterScope};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = get_config();

    // Initialize logging, level from the configuration unless RUST_LOG is set
    let level = config.get_log_min_level()?.to_lowercase();
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut args = std::env::args().skip(1);
    let search = args.next().unwrap_or_default();
    let country = args.next();

    let mut handler = RadioHandler::from_config(&config)?;
    println!("{}\n", handler.client());

    let mut scope = StaticFilterScope::from_definitions(handler.filter_definitions()?);
    if let Some(country) = &country {
        if !scope.activate(COUNTRY_FILTER, country) {
            eprintln!("Unknown country '{}', ignored", country);
        }
    }

    let categories = RadioHandler::category_definitions();
    let mut count = 0;
    for (station, row) in handler.get_model_data_from_content_search(&search, &scope)? {
        let category = categories
            .iter()
            .find(|c| c.tag() == row.category)
            .map(|c| c.name)
            .unwrap_or("?");
        println!(
            "[{}] {} ({}) - {}",
            category,
            row.title,
            station.country(),
            row.comment
        );
        count += 1;
    }
    println!("\n{} stations", count);

    Ok(())
}

//! Suggest command

use anyhow::Result;
use crossterm::style::Stylize;
use tripscan_schema::suggest as fuzzy_suggest;

/// Print destinations fuzzy-matching `text`, best first.
pub fn suggest(text: &str, limit: usize) -> Result<()> {
    let hits = fuzzy_suggest(text, limit);
    if hits.is_empty() {
        println!("  No destinations match '{text}'");
        return Ok(());
    }
    for hit in hits {
        println!("  {}", hit.city.cyan());
    }
    Ok(())
}

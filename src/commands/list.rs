//! List the temp pages

use anyhow::Result;

use crate::content::ContentIndex;
use crate::Folio;

/// Print the discovery index
pub fn run(folio: &Folio, json: bool) -> Result<()> {
    let registry = folio.discover()?;
    let index = ContentIndex::build(&registry, &folio.config.temp.index_route());

    if json {
        println!("{}", serde_json::to_string_pretty(&index.entries)?);
        return Ok(());
    }

    if index.is_empty() {
        println!("{}", folio.config.temp.empty_message);
        return Ok(());
    }

    println!("Temp pages ({}):", index.len());
    for entry in &index.entries {
        println!("  {} [{}]", entry.slug, entry.href);
    }

    Ok(())
}

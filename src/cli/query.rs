use anyhow::Result;
use serde_json::json;

use crate::catalog::Catalog;

pub fn run(term: &str, category: Option<&str>, catalog_path: &str) -> Result<()> {
    let catalog = Catalog::load(catalog_path);
    let results = catalog.search(term, category);
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "query": term,
            "category": category,
            "categories": catalog.categories(),
            "results": results,
        }))?
    );
    Ok(())
}

//! Picking the catalog rows that get sent to the model as context.

use super::models::{CATEGORY, DESCRIPTION, NewsletterRecord};
use super::store::Catalog;

/// Maximum number of records returned by `Catalog::search`
pub const SEARCH_LIMIT: usize = 20;

impl Catalog {
    /// Case-insensitive substring search over name, description, and
    /// category. When `category` is set only records in exactly that
    /// category are considered. Results keep catalog order.
    pub fn search(&self, query: &str, category: Option<&str>) -> Vec<&NewsletterRecord> {
        let query = query.to_lowercase();
        self.filter_by_category(category)
            .filter(|record| {
                [record.name(), record.description(), record.category()]
                    .into_iter()
                    .flatten()
                    .any(|field| field.to_lowercase().contains(&query))
            })
            .take(SEARCH_LIMIT)
            .collect()
    }

    /// Split the records in `category` (or all records) into
    /// contiguous chunks of `chunk_size`. The last chunk may be
    /// shorter.
    pub fn chunk(&self, category: Option<&str>, chunk_size: usize) -> Vec<Vec<&NewsletterRecord>> {
        let filtered: Vec<&NewsletterRecord> = self.filter_by_category(category).collect();
        filtered
            .chunks(chunk_size.max(1))
            .map(|chunk| chunk.to_vec())
            .collect()
    }

    fn filter_by_category<'a>(
        &'a self,
        category: Option<&str>,
    ) -> impl Iterator<Item = &'a NewsletterRecord> {
        self.all_records()
            .iter()
            .filter(move |record| category.is_none_or(|c| record.get(CATEGORY) == Some(c)))
    }
}

/// Render records as context for the model, one per line as
/// `Field: value` pairs. Descriptions are left out to keep the prompt
/// small.
pub fn render(records: &[&NewsletterRecord]) -> String {
    records
        .iter()
        .map(|record| {
            record
                .fields()
                .filter(|(k, _)| *k != DESCRIPTION)
                .map(|(k, v)| format!("{}: {}", k, v))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

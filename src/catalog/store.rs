use std::path::Path;

use csv::{ReaderBuilder, Trim};
use thiserror::Error;

use super::models::{CATEGORY, NAME, NewsletterRecord};

/// Why the catalog file couldn't be used. Never escapes `Catalog::load`.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("Missing required column {0}")]
    MissingColumn(&'static str),

    #[error("No rows found")]
    Empty,
}

/// The newsletter catalog, loaded once and read-only afterwards.
/// Always holds at least one record.
#[derive(Debug)]
pub struct Catalog {
    records: Vec<NewsletterRecord>,
    categories: Vec<String>,
    fallback: bool,
}

impl Catalog {
    /// Load the catalog from a CSV file with a header row. If the file
    /// can't be read or parsed, log it and fall back to the built-in
    /// sample rows so the service can keep running.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match read_records(path) {
            Ok(records) => {
                let catalog = Self::new(records, false);
                tracing::info!(
                    "Successfully loaded {} rows from {}",
                    catalog.len(),
                    path.display()
                );
                tracing::info!("Available categories: {:?}", catalog.categories());
                catalog
            }
            Err(e) => {
                tracing::warn!(
                    "Error loading catalog from {}: {}. Using fallback sample data",
                    path.display(),
                    e
                );
                Self::fallback()
            }
        }
    }

    /// Build a catalog from records already in memory. An empty list
    /// gets the fallback rows instead.
    pub fn from_records(records: Vec<NewsletterRecord>) -> Self {
        if records.is_empty() {
            return Self::fallback();
        }
        Self::new(records, false)
    }

    /// The two synthetic rows used when no real data is available
    pub fn fallback() -> Self {
        let records = vec![
            NewsletterRecord::new([
                ("Name", "Sample Tech Weekly"),
                ("Category", "Technology"),
                ("Subscribers", "10000"),
                ("Price", "$500"),
                ("Description", "Placeholder technology newsletter"),
            ]),
            NewsletterRecord::new([
                ("Name", "Sample Market Brief"),
                ("Category", "Finance & Investing"),
                ("Subscribers", "5000"),
                ("Price", "$250"),
                ("Description", "Placeholder finance newsletter"),
            ]),
        ];
        Self::new(records, true)
    }

    fn new(records: Vec<NewsletterRecord>, fallback: bool) -> Self {
        let mut categories: Vec<String> = Vec::new();
        for category in records.iter().filter_map(|r| r.category()) {
            if !categories.iter().any(|c| c == category) {
                categories.push(category.to_string());
            }
        }

        Self {
            records,
            categories,
            fallback,
        }
    }

    pub fn all_records(&self) -> &[NewsletterRecord] {
        &self.records
    }

    /// Distinct category labels in order of first appearance
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the built-in sample rows are in use
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

fn read_records(path: &Path) -> Result<Vec<NewsletterRecord>, DataLoadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    for required in [NAME, CATEGORY] {
        if !headers.iter().any(|h| h == required) {
            return Err(DataLoadError::MissingColumn(required));
        }
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(NewsletterRecord::new(headers.iter().zip(row.iter())));
    }

    if records.is_empty() {
        return Err(DataLoadError::Empty);
    }

    Ok(records)
}

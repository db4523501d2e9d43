//! The newsletter catalog and the ways of selecting rows from it

mod models;
mod select;
mod store;

pub use models::NewsletterRecord;
pub use select::{SEARCH_LIMIT, render};
pub use store::{Catalog, DataLoadError};

//! Core data models for papers, search queries and export rows.

mod export;
mod paper;
mod search;

pub use export::{ExportRow, EXPORT_COLUMNS, LIST_SEPARATOR};
pub use paper::{Author, Paper, PaperBuilder};
pub use search::{SearchQuery, DEFAULT_MAX_RESULTS};

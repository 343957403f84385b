//! # get-papers-list
//!
//! Fetch research papers from PubMed and flag authors affiliated with
//! pharmaceutical or biotech companies.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Paper, Author, SearchQuery, ExportRow)
//! - [`sources`]: The [`Source`] trait and its PubMed E-utilities implementation
//! - [`export`]: CSV and console table output
//! - [`utils`]: Affiliation classification and the HTTP client
//! - [`config`]: Configuration management

pub mod config;
pub mod export;
pub mod models;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use models::{Author, Paper};
pub use sources::{PubMedSource, Source};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

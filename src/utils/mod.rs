//! Utility modules supporting the fetch and export pipeline.
//!
//! - [`classify_authors`]: Split a paper's authors into non-academic names and
//!   company affiliations
//! - [`is_company_affiliation`]: The keyword test behind the classification
//! - [`HttpClient`]: Shared reqwest client configured with a user agent and timeout
//!
//! # Classification
//!
//! ```rust
//! use get_papers_list::models::Author;
//! use get_papers_list::utils::classify_authors;
//!
//! let authors = vec![
//!     Author::new("John Doe", "Some Biotech Company"),
//!     Author::new("Jane Smith", "University of Test"),
//! ];
//! let result = classify_authors(&authors);
//! assert_eq!(result.non_academic_authors, vec!["Jane Smith"]);
//! assert_eq!(result.company_affiliations, vec!["Some Biotech Company"]);
//! ```

mod affiliation;
mod http;

pub use affiliation::{
    classify_authors, is_company_affiliation, AuthorClassification, COMPANY_KEYWORDS,
};
pub use http::{HttpClient, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};

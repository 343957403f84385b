//! Author affiliation classification.
//!
//! An author whose affiliation mentions a pharmaceutical or biotech keyword is
//! reported through that affiliation; every other author is reported by name
//! as a non-academic individual.

use crate::models::Author;

/// Lower-case keywords that mark an affiliation as a company
pub const COMPANY_KEYWORDS: &[&str] = &["biotech", "pharma"];

/// Result of classifying a paper's authors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorClassification {
    /// Names of authors whose affiliation matched no company keyword
    pub non_academic_authors: Vec<String>,

    /// Affiliation strings that matched a company keyword
    pub company_affiliations: Vec<String>,
}

impl AuthorClassification {
    /// Total number of authors classified
    pub fn len(&self) -> usize {
        self.non_academic_authors.len() + self.company_affiliations.len()
    }

    /// Whether no authors were classified
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Whether an affiliation string names a pharmaceutical or biotech company.
///
/// Matching is a case-insensitive substring test against [`COMPANY_KEYWORDS`].
pub fn is_company_affiliation(affiliation: &str) -> bool {
    let lower = affiliation.to_lowercase();
    COMPANY_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Partition authors into non-academic names and company affiliations.
///
/// Each author lands in exactly one list, in input order.
pub fn classify_authors(authors: &[Author]) -> AuthorClassification {
    let mut result = AuthorClassification::default();

    for author in authors {
        if is_company_affiliation(&author.affiliation) {
            result.company_affiliations.push(author.affiliation.clone());
        } else {
            result.non_academic_authors.push(author.name.clone());
        }
    }

    result
}

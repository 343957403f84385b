//! Flattened export rows.

use serde::Serialize;

use super::Paper;
use crate::utils::classify_authors;

/// Column headers in output order
pub const EXPORT_COLUMNS: [&str; 6] = [
    "PubmedID",
    "Title",
    "Publication Date",
    "Non-academic Author(s)",
    "Company Affiliation(s)",
    "Corresponding Author Email",
];

/// Separator used when joining list columns
pub const LIST_SEPARATOR: &str = ", ";

/// One output row per paper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub id: String,
    pub title: String,
    pub publication_date: String,
    pub non_academic_authors: Vec<String>,
    pub company_affiliations: Vec<String>,
    /// First author's e-mail, empty when absent
    pub corresponding_email: String,
}

impl ExportRow {
    /// Classify a paper's authors and flatten it into a row
    pub fn from_paper(paper: &Paper) -> Self {
        let classification = classify_authors(&paper.authors);

        Self {
            id: paper.id.clone(),
            title: paper.title.clone(),
            publication_date: paper.publication_date.clone(),
            non_academic_authors: classification.non_academic_authors,
            company_affiliations: classification.company_affiliations,
            corresponding_email: paper.corresponding_email().to_string(),
        }
    }

    /// Cell values in [`EXPORT_COLUMNS`] order
    pub fn cells(&self) -> [String; 6] {
        [
            self.id.clone(),
            self.title.clone(),
            self.publication_date.clone(),
            self.non_academic_authors.join(LIST_SEPARATOR),
            self.company_affiliations.join(LIST_SEPARATOR),
            self.corresponding_email.clone(),
        ]
    }

    pub(crate) fn record(&self) -> ExportRecord<'_> {
        ExportRecord {
            id: &self.id,
            title: &self.title,
            publication_date: &self.publication_date,
            non_academic_authors: self.non_academic_authors.join(LIST_SEPARATOR),
            company_affiliations: self.company_affiliations.join(LIST_SEPARATOR),
            corresponding_email: &self.corresponding_email,
        }
    }
}

/// Serialized shape of a row; field renames give the CSV header.
#[derive(Debug, Serialize)]
pub(crate) struct ExportRecord<'a> {
    #[serde(rename = "PubmedID")]
    id: &'a str,
    #[serde(rename = "Title")]
    title: &'a str,
    #[serde(rename = "Publication Date")]
    publication_date: &'a str,
    #[serde(rename = "Non-academic Author(s)")]
    non_academic_authors: String,
    #[serde(rename = "Company Affiliation(s)")]
    company_affiliations: String,
    #[serde(rename = "Corresponding Author Email")]
    corresponding_email: &'a str,
}

//! Paper model representing a PubMed record and its authors.

use serde::{Deserialize, Serialize};

/// A single author of a paper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name ("ForeName LastName" or a collective name)
    pub name: String,

    /// Affiliation text (multiple affiliations are joined with "; ")
    pub affiliation: String,

    /// Contact e-mail, when the record carries one
    pub email: Option<String>,
}

impl Author {
    /// Create an author without an e-mail address
    pub fn new(name: impl Into<String>, affiliation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            affiliation: affiliation.into(),
            email: None,
        }
    }

    /// Set the e-mail address
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// A paper fetched from PubMed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    /// PubMed identifier (PMID)
    pub id: String,

    /// Paper title
    pub title: String,

    /// Publication date (`YYYY-MM-DD`, `YYYY-MM`, `YYYY`, or free text)
    pub publication_date: String,

    /// Authors in the order they appear in the record
    pub authors: Vec<Author>,
}

impl Paper {
    /// Create a new paper with required fields
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            publication_date: String::new(),
            authors: Vec::new(),
        }
    }

    /// The first listed author, used as the corresponding author
    pub fn first_author(&self) -> Option<&Author> {
        self.authors.first()
    }

    /// E-mail of the corresponding author, or an empty string
    pub fn corresponding_email(&self) -> &str {
        self.first_author()
            .and_then(|a| a.email.as_deref())
            .unwrap_or("")
    }
}

/// Builder for constructing Paper objects
#[derive(Debug, Clone)]
pub struct PaperBuilder {
    paper: Paper,
}

impl PaperBuilder {
    /// Create a new builder with required fields
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            paper: Paper::new(id, title),
        }
    }

    /// Set publication date
    pub fn publication_date(mut self, date: impl Into<String>) -> Self {
        self.paper.publication_date = date.into();
        self
    }

    /// Append an author
    pub fn author(mut self, author: Author) -> Self {
        self.paper.authors.push(author);
        self
    }

    /// Replace the author list
    pub fn authors(mut self, authors: Vec<Author>) -> Self {
        self.paper.authors = authors;
        self
    }

    /// Build the Paper
    pub fn build(self) -> Paper {
        self.paper
    }
}

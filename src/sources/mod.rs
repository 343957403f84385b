//! Literature sources.
//!
//! A [`Source`] exposes the two stages of the fetch pipeline: a search that
//! yields identifiers and a detail fetch that turns identifiers into
//! [`Paper`]s. The provided [`Source::search`] method chains the two.
//!
//! The two stages fail differently. A failed search is logged and treated as
//! "no results", so the export stage still runs and reports that nothing was
//! found. A failed detail fetch aborts the whole fetch and is returned to the
//! caller.

pub mod mock;
mod pubmed;

pub use mock::MockSource;
pub use pubmed::{PubMedSource, PUBMED_BASE_URL, PUBMED_DATABASE};

use crate::models::{Paper, SearchQuery};
use async_trait::async_trait;

/// Interface implemented by every literature source
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Run the search request and return matching identifiers, in order
    async fn search_ids(&self, query: &SearchQuery) -> Result<Vec<String>, SourceError>;

    /// Fetch one paper per identifier, sequentially and in input order
    async fn fetch_details(&self, ids: &[String]) -> Result<Vec<Paper>, SourceError>;

    /// Search, then fetch details for every identifier found.
    ///
    /// Search failures are logged and yield an empty result; detail fetch
    /// failures are returned.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Paper>, SourceError> {
        let ids = match self.search_ids(query).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!("Error fetching papers from {}: {}", self.name(), e);
                return Ok(Vec::new());
            }
        };

        if ids.is_empty() {
            tracing::info!("{} returned no results for '{}'", self.name(), query.query);
            return Ok(Vec::new());
        }

        tracing::debug!("{} returned {} ids", self.name(), ids.len());
        self.fetch_details(&ids).await
    }
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status from the source
    #[error("API error: {0}")]
    Api(String),

    /// Parsing error (XML)
    #[error("Parse error: {0}")]
    Parse(String),

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<quick_xml::DeError> for SourceError {
    fn from(err: quick_xml::DeError) -> Self {
        SourceError::Parse(format!("XML: {}", err))
    }
}

impl From<quick_xml::Error> for SourceError {
    fn from(err: quick_xml::Error) -> Self {
        SourceError::Parse(format!("XML: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Author, PaperBuilder};

    fn sample_paper(id: &str) -> Paper {
        PaperBuilder::new(id, format!("Paper {}", id))
            .author(Author::new("John Doe", "Some Biotech Company"))
            .build()
    }

    #[tokio::test]
    async fn test_search_chains_ids_into_details() {
        let source = MockSource::new();
        source.set_ids(vec!["1".to_string(), "2".to_string()]);
        source.add_paper(sample_paper("1"));
        source.add_paper(sample_paper("2"));

        let papers = source.search(&SearchQuery::new("cancer")).await.unwrap();

        assert_eq!(papers.len(), 2);
        assert_eq!(papers[0].id, "1");
        assert_eq!(papers[1].id, "2");
        assert_eq!(source.requested_ids(), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_search_failure_is_absorbed() {
        let source = MockSource::new();
        source.fail_search("connection refused");

        let papers = source.search(&SearchQuery::new("cancer")).await.unwrap();

        assert!(papers.is_empty());
        assert!(source.requested_ids().is_empty());
    }

    #[tokio::test]
    async fn test_detail_failure_is_propagated() {
        let source = MockSource::new();
        source.set_ids(vec!["1".to_string()]);
        source.fail_details("503 Service Unavailable");

        let result = source.search(&SearchQuery::new("cancer")).await;

        assert!(matches!(result, Err(SourceError::Api(_))));
    }

    #[tokio::test]
    async fn test_empty_ids_skip_details() {
        let source = MockSource::new();

        let papers = source.search(&SearchQuery::new("nothing")).await.unwrap();

        assert!(papers.is_empty());
        assert_eq!(source.detail_calls(), 0);
    }

    #[test]
    fn test_error_display() {
        let err = SourceError::Network("timed out".to_string());
        assert_eq!(err.to_string(), "Network error: timed out");
    }
}

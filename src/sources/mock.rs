//! Mock source for testing purposes.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::models::{Paper, SearchQuery};
use crate::sources::{Source, SourceError};

/// A mock source that returns predefined identifiers and papers.
#[derive(Debug, Default)]
pub struct MockSource {
    ids: Mutex<Vec<String>>,
    papers: Mutex<Vec<Paper>>,
    search_error: Mutex<Option<String>>,
    details_error: Mutex<Option<String>>,
    requested: Mutex<Vec<String>>,
    detail_calls: Mutex<usize>,
}

impl MockSource {
    /// Create a new mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identifiers returned by `search_ids`.
    pub fn set_ids(&self, ids: Vec<String>) {
        *self.ids.lock().unwrap() = ids;
    }

    /// Register a paper returned when its id is fetched.
    pub fn add_paper(&self, paper: Paper) {
        self.papers.lock().unwrap().push(paper);
    }

    /// Make `search_ids` fail with a network error.
    pub fn fail_search(&self, message: &str) {
        *self.search_error.lock().unwrap() = Some(message.to_string());
    }

    /// Make `fetch_details` fail with an API error.
    pub fn fail_details(&self, message: &str) {
        *self.details_error.lock().unwrap() = Some(message.to_string());
    }

    /// Identifiers passed to `fetch_details`, in request order.
    pub fn requested_ids(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    /// Number of `fetch_details` calls.
    pub fn detail_calls(&self) -> usize {
        *self.detail_calls.lock().unwrap()
    }
}

#[async_trait]
impl Source for MockSource {
    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn search_ids(&self, query: &SearchQuery) -> Result<Vec<String>, SourceError> {
        if let Some(message) = self.search_error.lock().unwrap().clone() {
            return Err(SourceError::Network(message));
        }
        let ids = self.ids.lock().unwrap();
        Ok(ids.iter().take(query.max_results).cloned().collect())
    }

    async fn fetch_details(&self, ids: &[String]) -> Result<Vec<Paper>, SourceError> {
        *self.detail_calls.lock().unwrap() += 1;
        if let Some(message) = self.details_error.lock().unwrap().clone() {
            return Err(SourceError::Api(message));
        }

        let papers = self.papers.lock().unwrap();
        let mut found = Vec::new();
        for id in ids {
            self.requested.lock().unwrap().push(id.clone());
            if let Some(paper) = papers.iter().find(|p| &p.id == id) {
                found.push(paper.clone());
            }
        }
        Ok(found)
    }
}

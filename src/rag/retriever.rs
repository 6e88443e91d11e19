//! Context retrieval against the configured search service.

use crate::db::vectorstore::SearchService;
use crate::types::{AppError, Result};
use std::sync::Arc;
use tracing::{debug, warn};

/// Default number of matches requested per query.
pub const DEFAULT_RESULT_LIMIT: usize = 5;

/// Fetches the passages most similar to a query from a fixed collection.
pub struct ContextRetriever {
    search: Arc<dyn SearchService>,
    limit: usize,
}

impl ContextRetriever {
    pub fn new(search: Arc<dyn SearchService>, limit: usize) -> Self {
        Self { search, limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Run a similarity search for `query`.
    ///
    /// Returns at most `limit` snippets in relevance order. No matches is an
    /// empty vector, not an error.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<String>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query must not be empty".to_string(),
            ));
        }

        let mut snippets = self
            .search
            .search(query, self.limit)
            .await
            .map_err(|e| match e {
                AppError::Retrieval(msg) => AppError::Retrieval(msg),
                other => AppError::Retrieval(other.to_string()),
            })
            .inspect_err(|e| warn!(collection = %self.search.collection(), "Search failed: {}", e))?;

        snippets.truncate(self.limit);
        debug!(
            collection = %self.search.collection(),
            results = snippets.len(),
            "Retrieved context"
        );
        Ok(snippets)
    }
}

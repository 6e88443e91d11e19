//! Search service abstraction
//!
//! The assistant never embeds or ranks documents itself. Similarity search is
//! delegated to a managed service behind the [`SearchService`] trait, so the
//! retriever can be exercised against a test double or pointed at another
//! backend without touching the pipeline.
//!
//! ```text
//! ┌──────────────────┐      ┌─────────────────────┐
//! │ ContextRetriever │─────▶│ SearchService trait │
//! └──────────────────┘      └──────────┬──────────┘
//!                                      │
//!                           ┌──────────┴──────────┐
//!                           │ CortexSearchClient  │
//!                           │ (Snowflake REST)    │
//!                           └─────────────────────┘
//! ```

use crate::types::Result;
use async_trait::async_trait;

/// Similarity search over one fixed document collection.
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Return the text of up to `limit` documents most similar to `query`,
    /// best match first. An empty vector means no matches.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>>;

    /// Human-readable name of the collection being searched.
    fn collection(&self) -> String;
}

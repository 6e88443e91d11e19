//! Cortex Search client.
//!
//! Queries a Snowflake Cortex Search service over REST:
//!
//! ```text
//! POST /api/v2/databases/{db}/schemas/{schema}/cortex-search-services/{service}:query
//! {"query": "...", "columns": ["extracted_text"], "limit": 5}
//! ```

use super::snowflake::SnowflakeConnection;
use super::vectorstore::SearchService;
use crate::types::{AppError, Result};
use crate::utils::toml_config::SearchConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    columns: [&'a str; 1],
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Client for a single Cortex Search service.
pub struct CortexSearchClient {
    connection: Arc<SnowflakeConnection>,
    database: String,
    schema: String,
    service: String,
    text_column: String,
}

impl CortexSearchClient {
    pub fn new(connection: Arc<SnowflakeConnection>, config: &SearchConfig) -> Self {
        Self {
            connection,
            database: config.database.clone(),
            schema: config.schema.clone(),
            service: config.service.clone(),
            text_column: config.text_column.clone(),
        }
    }

    /// REST path of the service's query endpoint.
    pub fn query_path(&self) -> String {
        format!(
            "/api/v2/databases/{}/schemas/{}/cortex-search-services/{}:query",
            self.database, self.schema, self.service
        )
    }
}

#[async_trait]
impl SearchService for CortexSearchClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        let request = QueryRequest {
            query,
            columns: [self.text_column.as_str()],
            limit,
        };

        let response: QueryResponse = self
            .connection
            .post_json(&self.query_path(), &request, AppError::Retrieval)
            .await?;

        let total = response.results.len();
        let texts: Vec<String> = response
            .results
            .into_iter()
            .filter_map(|mut row| match row.remove(&self.text_column) {
                Some(serde_json::Value::String(text)) => Some(text),
                _ => None,
            })
            .collect();

        if texts.len() < total {
            warn!(
                skipped = total - texts.len(),
                column = %self.text_column,
                "Search results without a text column were skipped"
            );
        }
        debug!(results = texts.len(), "Cortex Search query complete");

        Ok(texts)
    }

    fn collection(&self) -> String {
        format!("{}.{}.{}", self.database, self.schema, self.service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::toml_config::SnowflakeConfig;

    fn client() -> CortexSearchClient {
        let sf = SnowflakeConfig {
            account: "acct".to_string(),
            user: "u".to_string(),
            token_env: "UNUSED".to_string(),
            token_type: "PROGRAMMATIC_ACCESS_TOKEN".to_string(),
            role: "r".to_string(),
            warehouse: "w".to_string(),
            base_url: Some("http://localhost:1".to_string()),
            connect_timeout_secs: 1,
            request_timeout_secs: 1,
        };
        let connection = Arc::new(SnowflakeConnection::new(&sf, "token").unwrap());
        CortexSearchClient::new(connection, &SearchConfig::default())
    }

    #[test]
    fn test_query_path() {
        assert_eq!(
            client().query_path(),
            "/api/v2/databases/LEGAL_DATA_DB/schemas/LEGAL_DATA_SCHEMA/cortex-search-services/LEGAL_JUDGEMENTS_CORTEX_SEARCH_SERVICE:query"
        );
    }

    #[test]
    fn test_collection_name() {
        assert_eq!(
            client().collection(),
            "LEGAL_DATA_DB.LEGAL_DATA_SCHEMA.LEGAL_JUDGEMENTS_CORTEX_SEARCH_SERVICE"
        );
    }

    #[test]
    fn test_request_shape() {
        let request = QueryRequest {
            query: "adverse possession",
            columns: ["extracted_text"],
            limit: 5,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "query": "adverse possession",
                "columns": ["extracted_text"],
                "limit": 5
            })
        );
    }

    #[test]
    fn test_response_without_results_field() {
        let parsed: QueryResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.results.is_empty());
    }
}

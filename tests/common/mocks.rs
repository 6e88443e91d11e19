//! Mock collaborators for testing.
//!
//! [`MockSearchService`] stands in for Cortex Search and [`MockLLMClient`]
//! for Cortex Complete. Both record what they were asked so tests can
//! assert on the exact query and prompts.

use async_trait::async_trait;
use nyaya::db::SearchService;
use nyaya::llm::LLMClient;
use nyaya::types::{AppError, CortexModel, Result};
use parking_lot::Mutex;
use std::time::Duration;

/// Mock search service returning a fixed result list.
pub struct MockSearchService {
    results: Vec<String>,
    should_fail: bool,
    queries: Mutex<Vec<(String, usize)>>,
}

impl MockSearchService {
    /// Returns `results` for every query.
    pub fn new(results: &[&str]) -> Self {
        Self {
            results: results.iter().map(|s| s.to_string()).collect(),
            should_fail: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Fails every query with a retrieval error.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new(&[])
        }
    }

    /// Queries received so far, with the requested limit.
    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.queries.lock().len()
    }
}

#[async_trait]
impl SearchService for MockSearchService {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        self.queries.lock().push((query.to_string(), limit));
        if self.should_fail {
            return Err(AppError::Retrieval(
                "HTTP 503: search service unavailable".to_string(),
            ));
        }
        Ok(self.results.iter().take(limit).cloned().collect())
    }

    fn collection(&self) -> String {
        "LEGAL_DATA_DB.LEGAL_DATA_SCHEMA.MOCK".to_string()
    }
}

/// A prompt as received by the mock LLM.
#[derive(Debug, Clone)]
pub struct RecordedPrompt {
    pub model: CortexModel,
    pub prompt: String,
}

impl RecordedPrompt {
    pub fn is_summary(&self) -> bool {
        self.prompt.contains("<chat_history>")
    }
}

/// Mock completion client.
///
/// Summarization prompts (recognised by their `<chat_history>` block) get
/// `summary`; everything else gets `response`.
pub struct MockLLMClient {
    response: String,
    summary: String,
    should_fail: bool,
    summary_fails: bool,
    delay: Option<Duration>,
    prompts: Mutex<Vec<RecordedPrompt>>,
}

impl MockLLMClient {
    /// Create a new mock client that returns the given response.
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            summary: "summarized query".to_string(),
            should_fail: false,
            summary_fails: false,
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Set the text returned for summarization prompts.
    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = summary.to_string();
        self
    }

    /// Fail summarization prompts only; analysis prompts still succeed.
    pub fn with_summary_failure(mut self) -> Self {
        self.summary_fails = true;
        self
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new("")
        }
    }

    pub fn prompts(&self) -> Vec<RecordedPrompt> {
        self.prompts.lock().clone()
    }

    pub fn summary_calls(&self) -> usize {
        self.prompts.lock().iter().filter(|p| p.is_summary()).count()
    }

    /// The last prompt that was not a summarization prompt.
    pub fn last_analysis_prompt(&self) -> Option<String> {
        self.prompts
            .lock()
            .iter()
            .rev()
            .find(|p| !p.is_summary())
            .map(|p| p.prompt.clone())
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn complete(&self, model: CortexModel, prompt: &str) -> Result<String> {
        let recorded = RecordedPrompt {
            model,
            prompt: prompt.to_string(),
        };
        let is_summary = recorded.is_summary();
        self.prompts.lock().push(recorded);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.should_fail {
            return Err(AppError::Generation("Mock LLM failure".to_string()));
        }
        if is_summary && self.summary_fails {
            return Err(AppError::Generation("Mock summarizer failure".to_string()));
        }

        Ok(if is_summary {
            self.summary.clone()
        } else {
            self.response.clone()
        })
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

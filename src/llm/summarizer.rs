//! Query summarization.
//!
//! Folds the recent conversation and the new question into one standalone
//! query so that follow-up questions ("and what about the limitation
//! period?") carry their context into the analysis prompt.

use crate::llm::client::LLMClient;
use crate::memory::format_history_for_prompt;
use crate::types::{AppError, CortexModel, Result, Turn};
use std::sync::Arc;
use tracing::debug;

/// Condenses chat history plus a new question into a standalone query.
pub struct QuerySummarizer {
    client: Arc<dyn LLMClient>,
}

impl QuerySummarizer {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }

    /// Ask the model for the extended query.
    ///
    /// The model's output is returned verbatim (surrounding whitespace
    /// trimmed). Nothing checks that it obeyed the "no explanation" rule.
    pub async fn summarize(
        &self,
        history: &[Turn],
        question: &str,
        model: CortexModel,
    ) -> Result<String> {
        let prompt = build_summary_prompt(history, question);
        let summary = self
            .client
            .complete(model, &prompt)
            .await
            .map_err(|e| match e {
                AppError::Generation(msg) => AppError::Generation(format!("summarization: {}", msg)),
                other => other,
            })?;

        let summary = summary.trim().to_string();
        debug!(chars = summary.len(), "Summarized query");
        Ok(summary)
    }
}

/// Renders the summarization instruction for `history` and `question`.
pub fn build_summary_prompt(history: &[Turn], question: &str) -> String {
    format!(
        "Based on the chat history below and the question, generate a query that extends the \
         question with the chat history provided. The query should be in natural language.\n\
         Answer with only the query. Do not add any explanation.\n\n\
         <chat_history>\n{}\n</chat_history>\n\
         <question>\n{}\n</question>\n",
        format_history_for_prompt(history),
        question.trim()
    )
}

//! LLM client abstraction
//!
//! Completion providers implement [`LLMClient`]. The model is chosen per call
//! because the chat UI lets the user switch models between questions.

use crate::types::{CortexModel, Result};
use async_trait::async_trait;

/// Generic completion client for provider abstraction
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Complete a single user prompt with the given model, returning the raw
    /// text produced by the model.
    async fn complete(&self, model: CortexModel, prompt: &str) -> Result<String>;

    /// Human-readable provider name, used in logs
    fn provider_name(&self) -> &str;
}

//! Analysis generation.

use crate::llm::client::LLMClient;
use crate::types::{AppError, CortexModel, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Sends the rendered legal-analysis prompt to the completion service.
pub struct AnalysisGenerator {
    client: Arc<dyn LLMClient>,
}

impl AnalysisGenerator {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }

    /// Returns the model output unmodified.
    ///
    /// Failures are always reported as [`AppError::Generation`]; a blank
    /// completion counts as a failure.
    pub async fn generate(&self, prompt: &str, model: CortexModel) -> Result<String> {
        let started = Instant::now();

        let text = self
            .client
            .complete(model, prompt)
            .await
            .map_err(|e| match e {
                AppError::Generation(msg) => AppError::Generation(msg),
                other => AppError::Generation(other.to_string()),
            })?;

        if text.trim().is_empty() {
            return Err(AppError::Generation(format!(
                "{} returned an empty completion",
                model
            )));
        }

        info!(
            provider = self.client.provider_name(),
            %model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Analysis generated"
        );

        Ok(text)
    }
}

//! Cortex Complete client.
//!
//! Calls the Cortex REST inference endpoint:
//!
//! ```text
//! POST /api/v2/cortex/inference:complete
//! {"model": "mistral-large", "messages": [{"role": "user", "content": "..."}], "stream": false}
//! ```
//!
//! The endpoint answers with a JSON completion, or with a server-sent event
//! stream of deltas on deployments that ignore `stream: false`. Both forms are
//! accepted.

use crate::db::SnowflakeConnection;
use crate::llm::client::LLMClient;
use crate::types::{AppError, CortexModel, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

pub const COMPLETE_PATH: &str = "/api/v2/cortex/inference:complete";

#[derive(Debug, Serialize)]
struct CompleteRequest<'a> {
    model: &'a str,
    messages: [RequestMessage<'a>; 1],
    stream: bool,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompleteResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceContent>,
    #[serde(default)]
    delta: Option<ChoiceContent>,
    /// Older response shape carrying the text directly
    #[serde(default)]
    messages: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceContent {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

impl Choice {
    fn text(self) -> Option<String> {
        self.message
            .and_then(|m| m.content)
            .or_else(|| self.delta.and_then(|d| d.content))
            .or(self.messages)
    }
}

/// Completion client backed by Snowflake Cortex.
pub struct CortexCompleteClient {
    connection: Arc<SnowflakeConnection>,
}

impl CortexCompleteClient {
    pub fn new(connection: Arc<SnowflakeConnection>) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl LLMClient for CortexCompleteClient {
    async fn complete(&self, model: CortexModel, prompt: &str) -> Result<String> {
        let request = CompleteRequest {
            model: model.as_str(),
            messages: [RequestMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        let body = self
            .connection
            .post_text(COMPLETE_PATH, &request, AppError::Generation)
            .await?;

        parse_completion(&body)
    }

    fn provider_name(&self) -> &str {
        "Snowflake Cortex"
    }
}

/// Extracts the completion text from either a JSON body or an SSE stream.
pub fn parse_completion(body: &str) -> Result<String> {
    let trimmed = body.trim_start();

    if trimmed.starts_with("data:") || trimmed.starts_with("event:") {
        return parse_event_stream(trimmed);
    }

    let response: CompleteResponse = serde_json::from_str(trimmed)
        .map_err(|e| AppError::Generation(format!("Malformed completion response: {}", e)))?;

    if let Some(usage) = &response.usage {
        debug!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "Cortex usage"
        );
    }

    response
        .choices
        .into_iter()
        .next()
        .and_then(Choice::text)
        .ok_or_else(|| AppError::Generation("No completion returned by Cortex".to_string()))
}

/// Concatenates the `delta.content` of every `data:` event.
fn parse_event_stream(body: &str) -> Result<String> {
    let mut text = String::new();
    let mut saw_event = false;

    for line in body.lines() {
        let Some(payload) = line.strip_prefix("data:") else {
            continue;
        };
        let payload = payload.trim();
        if payload.is_empty() || payload == "[DONE]" {
            continue;
        }

        let chunk: CompleteResponse = serde_json::from_str(payload)
            .map_err(|e| AppError::Generation(format!("Malformed stream event: {}", e)))?;
        saw_event = true;

        for choice in chunk.choices {
            if let Some(part) = choice.text() {
                text.push_str(&part);
            }
        }
    }

    if !saw_event {
        return Err(AppError::Generation(
            "Completion stream contained no events".to_string(),
        ));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = CompleteRequest {
            model: CortexModel::MistralLarge.as_str(),
            messages: [RequestMessage {
                role: "user",
                content: "Hello",
            }],
            stream: false,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "model": "mistral-large",
                "messages": [{"role": "user", "content": "Hello"}],
                "stream": false
            })
        );
    }

    #[test]
    fn test_parse_json_completion() {
        let body = r#"{
            "choices": [{"message": {"content": "1. Analysis ..."}}],
            "usage": {"prompt_tokens": 120, "completion_tokens": 40}
        }"#;
        assert_eq!(parse_completion(body).unwrap(), "1. Analysis ...");
    }

    #[test]
    fn test_parse_legacy_messages_field() {
        let body = r#"{"choices": [{"messages": "legacy text"}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "legacy text");
    }

    #[test]
    fn test_parse_event_stream() {
        let body = "data: {\"choices\":[{\"delta\":{\"content\":\"Key \"}}]}\n\n\
                    data: {\"choices\":[{\"delta\":{\"content\":\"principles\"}}]}\n\n\
                    data: [DONE]\n";
        assert_eq!(parse_completion(body).unwrap(), "Key principles");
    }

    #[test]
    fn test_empty_choices_is_generation_error() {
        let err = parse_completion(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
    }

    #[test]
    fn test_garbage_is_generation_error() {
        let err = parse_completion("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
    }
}

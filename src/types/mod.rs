use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

// ============= Chat Types =============

/// Author of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Whether a turn carries real content or a failure notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TurnKind {
    Message,
    Error,
}

/// One message exchanged in the chat.
///
/// Turns are immutable once created. Error turns record why a question went
/// unanswered and are never fed back into query summarization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Turn {
    pub role: Role,
    pub kind: TurnKind,
    pub content: String,
    /// Error category (`retrieval`, `generation`, ...) for error turns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            kind: TurnKind::Message,
            content: content.into(),
            error_kind: None,
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            kind: TurnKind::Message,
            content: content.into(),
            error_kind: None,
            timestamp: Utc::now(),
        }
    }

    /// Assistant-side error turn describing `err`.
    pub fn error(err: &AppError) -> Self {
        Self {
            role: Role::Assistant,
            kind: TurnKind::Error,
            content: err.to_string(),
            error_kind: Some(err.kind().to_string()),
            timestamp: Utc::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == TurnKind::Error
    }
}

// ============= Model Types =============

/// Hosted completion models offered in the model selector.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema,
)]
pub enum CortexModel {
    #[serde(rename = "mistral-7b")]
    Mistral7b,
    #[default]
    #[serde(rename = "mistral-large")]
    MistralLarge,
    #[serde(rename = "mixtral-8x7b")]
    Mixtral8x7b,
}

impl CortexModel {
    /// Every selectable model, in selector order.
    pub const ALL: [CortexModel; 3] = [
        CortexModel::Mistral7b,
        CortexModel::MistralLarge,
        CortexModel::Mixtral8x7b,
    ];

    /// Model identifier as understood by Cortex Complete.
    pub fn as_str(&self) -> &'static str {
        match self {
            CortexModel::Mistral7b => "mistral-7b",
            CortexModel::MistralLarge => "mistral-large",
            CortexModel::Mixtral8x7b => "mixtral-8x7b",
        }
    }
}

impl std::fmt::Display for CortexModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CortexModel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mistral-7b" => Ok(Self::Mistral7b),
            "mistral-large" => Ok(Self::MistralLarge),
            "mixtral-8x7b" => Ok(Self::Mixtral8x7b),
            other => Err(AppError::InvalidInput(format!(
                "Unknown model: {}. Use: mistral-7b, mistral-large, mixtral-8x7b",
                other
            ))),
        }
    }
}

// ============= API Request/Response Types =============

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<CortexModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remember_history: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub session_id: String,
    pub model: CortexModel,
    pub remember_history: bool,
    pub turns: Vec<Turn>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AskResponse {
    pub session_id: String,
    /// The assistant turn appended for this question
    pub turn: Turn,
    pub is_error: bool,
    /// Number of snippets returned by the search service
    pub retrieved: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summarized_query: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateSettingsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<CortexModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remember_history: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ModelInfo {
    pub name: CortexModel,
    pub is_default: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Session busy: {0}")]
    SessionBusy(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Short machine-readable category of this error.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => "configuration",
            AppError::Retrieval(_) => "retrieval",
            AppError::Generation(_) => "generation",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::NotFound(_) => "not_found",
            AppError::SessionBusy(_) => "session_busy",
            AppError::Cancelled => "cancelled",
            AppError::Internal(_) => "internal",
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = match self {
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Retrieval(_) => StatusCode::BAD_GATEWAY,
            AppError::Generation(_) => StatusCode::BAD_GATEWAY,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::SessionBusy(_) => StatusCode::CONFLICT,
            AppError::Cancelled => StatusCode::REQUEST_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({
            "error": self.to_string(),
            "kind": self.kind(),
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

//! TOML-based configuration for Nyaya
//!
//! All settings live in a single `nyaya.toml`. Secrets are never written to
//! the file; the config names the environment variable that holds them
//! (`token_env`), and that variable is resolved when the config is loaded.
//!
//! The configuration is loaded once at startup and is read-only afterwards.

use crate::types::CortexModel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure loaded from nyaya.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NyayaConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Connection identity for the Snowflake account (required)
    pub snowflake: SnowflakeConfig,

    /// Cortex Search collection used for retrieval
    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub chat: ChatConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

/// Output format for the tracing subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

// ============= Snowflake Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnowflakeConfig {
    /// Account identifier, e.g. `xy12345.ap-south-1`
    pub account: String,

    pub user: String,

    /// Environment variable containing the access token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Value sent in `X-Snowflake-Authorization-Token-Type`
    #[serde(default = "default_token_type")]
    pub token_type: String,

    pub role: String,

    pub warehouse: String,

    /// Override for the REST endpoint (defaults to the account URL)
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_token_env() -> String {
    "SNOWFLAKE_TOKEN".to_string()
}

fn default_token_type() -> String {
    "PROGRAMMATIC_ACCESS_TOKEN".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    120
}

impl SnowflakeConfig {
    /// REST base URL for the account, without a trailing slash.
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!(
                "https://{}.snowflakecomputing.com",
                self.account.to_lowercase().replace('_', "-")
            ),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// ============= Search Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_database")]
    pub database: String,

    #[serde(default = "default_search_schema")]
    pub schema: String,

    #[serde(default = "default_search_service")]
    pub service: String,

    /// Maximum number of matches requested per query
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,

    /// Column holding the judgement text
    #[serde(default = "default_text_column")]
    pub text_column: String,
}

fn default_search_database() -> String {
    "LEGAL_DATA_DB".to_string()
}

fn default_search_schema() -> String {
    "LEGAL_DATA_SCHEMA".to_string()
}

fn default_search_service() -> String {
    "LEGAL_JUDGEMENTS_CORTEX_SEARCH_SERVICE".to_string()
}

fn default_result_limit() -> usize {
    5
}

fn default_text_column() -> String {
    "extracted_text".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            database: default_search_database(),
            schema: default_search_schema(),
            service: default_search_service(),
            result_limit: default_result_limit(),
            text_column: default_text_column(),
        }
    }
}

// ============= Generation Configuration =============

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Model preselected for new sessions
    #[serde(default)]
    pub default_model: CortexModel,
}

// ============= Chat Configuration =============

/// What to do when the search service fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalFailurePolicy {
    /// Continue with an empty context (the prompt shows the placeholder)
    #[default]
    Placeholder,
    /// Skip generation and record an error turn
    Abort,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Number of most recent turns visible to summarization
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Initial state of the "remember chat history" toggle
    #[serde(default = "default_true")]
    pub remember_history: bool,

    /// How many leading snippets are folded into the prompt
    #[serde(default = "default_context_snippets")]
    pub context_snippets: usize,

    /// Character budget for context folded from several snippets (at least 1)
    #[serde(default = "default_max_context_chars")]
    pub max_context_chars: usize,

    #[serde(default)]
    pub on_retrieval_failure: RetrievalFailurePolicy,

    /// Idle seconds before an unused session is dropped (0 keeps sessions)
    #[serde(default = "default_session_idle_ttl_secs")]
    pub session_idle_ttl_secs: u64,
}

impl ChatConfig {
    pub fn session_idle_ttl(&self) -> Option<Duration> {
        (self.session_idle_ttl_secs > 0).then(|| Duration::from_secs(self.session_idle_ttl_secs))
    }
}

fn default_history_window() -> usize {
    7
}

fn default_true() -> bool {
    true
}

fn default_context_snippets() -> usize {
    1
}

fn default_max_context_chars() -> usize {
    12_000
}

fn default_session_idle_ttl_secs() -> u64 {
    3600
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            remember_history: default_true(),
            context_snippets: default_context_snippets(),
            max_context_chars: default_max_context_chars(),
            on_retrieval_failure: RetrievalFailurePolicy::default(),
            session_idle_ttl_secs: default_session_idle_ttl_secs(),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Configuration warnings that don't prevent operation but may indicate issues
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub kind: ConfigWarningKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarningKind {
    HistoryWindowDisablesSummary,
    ContextBudgetTooSmall,
    LongRequestTimeout,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Required setting '{0}' is empty")]
    MissingSetting(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl From<ConfigError> for crate::types::AppError {
    fn from(err: ConfigError) -> Self {
        crate::types::AppError::Configuration(err.to_string())
    }
}

impl NyayaConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;

        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: NyayaConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate required identifiers, numeric ranges and env var availability
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("snowflake.account", &self.snowflake.account),
            ("snowflake.user", &self.snowflake.user),
            ("snowflake.role", &self.snowflake.role),
            ("snowflake.warehouse", &self.snowflake.warehouse),
            ("snowflake.token_env", &self.snowflake.token_env),
            ("search.database", &self.search.database),
            ("search.schema", &self.search.schema),
            ("search.service", &self.search.service),
            ("search.text_column", &self.search.text_column),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingSetting(name.to_string()));
            }
        }

        if self.search.result_limit == 0 || self.search.result_limit > 1000 {
            return Err(ConfigError::ValidationError(format!(
                "search.result_limit must be between 1 and 1000 (got {})",
                self.search.result_limit
            )));
        }

        if self.chat.context_snippets == 0 {
            return Err(ConfigError::ValidationError(
                "chat.context_snippets must be at least 1".to_string(),
            ));
        }

        if self.chat.max_context_chars == 0 {
            return Err(ConfigError::ValidationError(
                "chat.max_context_chars must be at least 1".to_string(),
            ));
        }

        if self.snowflake.request_timeout_secs == 0 || self.snowflake.connect_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "snowflake timeouts must be greater than zero".to_string(),
            ));
        }

        self.validate_env_var(&self.snowflake.token_env)?;

        Ok(())
    }

    /// Validate configuration, returning soft warnings
    pub fn validate_with_warnings(&self) -> Result<Vec<ConfigWarning>, ConfigError> {
        self.validate()?;

        let mut warnings = Vec::new();

        if self.chat.remember_history && self.chat.history_window == 0 {
            warnings.push(ConfigWarning {
                kind: ConfigWarningKind::HistoryWindowDisablesSummary,
                message: "chat.history_window is 0, so remembered history is never summarized"
                    .to_string(),
            });
        }

        if self.chat.context_snippets > 1 && self.chat.max_context_chars < 500 {
            warnings.push(ConfigWarning {
                kind: ConfigWarningKind::ContextBudgetTooSmall,
                message: format!(
                    "chat.max_context_chars is {}; folded judgement excerpts will be heavily truncated",
                    self.chat.max_context_chars
                ),
            });
        }

        if self.snowflake.request_timeout_secs > 600 {
            warnings.push(ConfigWarning {
                kind: ConfigWarningKind::LongRequestTimeout,
                message: format!(
                    "snowflake.request_timeout_secs is {}s; a hung request blocks the session that long",
                    self.snowflake.request_timeout_secs
                ),
            });
        }

        Ok(warnings)
    }

    fn validate_env_var(&self, name: &str) -> Result<(), ConfigError> {
        match std::env::var(name) {
            Ok(value) if !value.trim().is_empty() => Ok(()),
            _ => Err(ConfigError::MissingEnvVar(name.to_string())),
        }
    }

    /// Get the Snowflake access token from the environment
    pub fn snowflake_token(&self) -> Result<String, ConfigError> {
        std::env::var(&self.snowflake.token_env)
            .map_err(|_| ConfigError::MissingEnvVar(self.snowflake.token_env.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config(token_env: &str) -> String {
        format!(
            r#"
[server]
host = "0.0.0.0"
port = 8080
log_level = "debug"
log_format = "json"

[snowflake]
account = "xy12345.ap-south-1"
user = "LEGAL_APP"
token_env = "{token_env}"
role = "LEGAL_ANALYST"
warehouse = "COMPUTE_WH"

[search]
result_limit = 3

[generation]
default_model = "mixtral-8x7b"

[chat]
history_window = 5
remember_history = false
"#
        )
    }

    #[test]
    fn test_parse_config() {
        std::env::set_var("NYAYA_TEST_TOKEN_PARSE", "token");

        let config = NyayaConfig::from_toml_str(&create_test_config("NYAYA_TEST_TOKEN_PARSE"))
            .expect("Failed to parse config");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.snowflake.role, "LEGAL_ANALYST");
        assert_eq!(config.search.result_limit, 3);
        assert_eq!(config.generation.default_model, CortexModel::Mixtral8x7b);
        assert_eq!(config.chat.history_window, 5);
        assert!(!config.chat.remember_history);
    }

    #[test]
    fn test_defaults() {
        std::env::set_var("NYAYA_TEST_TOKEN_DEFAULTS", "token");

        let content = r#"
[snowflake]
account = "acct"
user = "u"
token_env = "NYAYA_TEST_TOKEN_DEFAULTS"
role = "r"
warehouse = "w"
"#;
        let config = NyayaConfig::from_toml_str(content).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.search.database, "LEGAL_DATA_DB");
        assert_eq!(config.search.schema, "LEGAL_DATA_SCHEMA");
        assert_eq!(config.search.service, "LEGAL_JUDGEMENTS_CORTEX_SEARCH_SERVICE");
        assert_eq!(config.search.result_limit, 5);
        assert_eq!(config.search.text_column, "extracted_text");
        assert_eq!(config.generation.default_model, CortexModel::MistralLarge);
        assert_eq!(config.chat.history_window, 7);
        assert!(config.chat.remember_history);
        assert_eq!(config.chat.context_snippets, 1);
        assert_eq!(
            config.chat.session_idle_ttl(),
            Some(Duration::from_secs(3600))
        );
        assert_eq!(
            config.chat.on_retrieval_failure,
            RetrievalFailurePolicy::Placeholder
        );
        assert_eq!(config.snowflake.token_type, "PROGRAMMATIC_ACCESS_TOKEN");
    }

    #[test]
    fn test_missing_snowflake_section_fails() {
        let result = NyayaConfig::from_toml_str("[server]\nport = 3000\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_token_env_var_fails() {
        let content = create_test_config("NYAYA_TEST_TOKEN_NEVER_SET");
        let result = NyayaConfig::from_toml_str(&content);
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(name)) if name == "NYAYA_TEST_TOKEN_NEVER_SET"));
    }

    #[test]
    fn test_empty_identifier_fails() {
        std::env::set_var("NYAYA_TEST_TOKEN_EMPTY", "token");
        let content = r#"
[snowflake]
account = "acct"
user = "u"
token_env = "NYAYA_TEST_TOKEN_EMPTY"
role = "r"
warehouse = "w"

[search]
service = "  "
"#;
        let result = NyayaConfig::from_toml_str(content);
        assert!(matches!(result, Err(ConfigError::MissingSetting(name)) if name == "search.service"));
    }

    #[test]
    fn test_result_limit_range() {
        std::env::set_var("NYAYA_TEST_TOKEN_LIMIT", "token");
        let content = r#"
[snowflake]
account = "acct"
user = "u"
token_env = "NYAYA_TEST_TOKEN_LIMIT"
role = "r"
warehouse = "w"

[search]
result_limit = 0
"#;
        let result = NyayaConfig::from_toml_str(content);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_zero_context_budget_fails() {
        std::env::set_var("NYAYA_TEST_TOKEN_BUDGET", "token");
        let content = r#"
[snowflake]
account = "acct"
user = "u"
token_env = "NYAYA_TEST_TOKEN_BUDGET"
role = "r"
warehouse = "w"

[chat]
max_context_chars = 0
"#;
        let result = NyayaConfig::from_toml_str(content);
        assert!(matches!(result, Err(ConfigError::ValidationError(msg)) if msg.contains("max_context_chars")));
    }

    #[test]
    fn test_base_url_from_account() {
        std::env::set_var("NYAYA_TEST_TOKEN_URL", "token");
        let mut config =
            NyayaConfig::from_toml_str(&create_test_config("NYAYA_TEST_TOKEN_URL")).unwrap();
        assert_eq!(
            config.snowflake.base_url(),
            "https://xy12345.ap-south-1.snowflakecomputing.com"
        );

        config.snowflake.base_url = Some("http://127.0.0.1:9999/".to_string());
        assert_eq!(config.snowflake.base_url(), "http://127.0.0.1:9999");
    }

    #[test]
    fn test_warnings_for_zero_window() {
        std::env::set_var("NYAYA_TEST_TOKEN_WARN", "token");
        let content = r#"
[snowflake]
account = "acct"
user = "u"
token_env = "NYAYA_TEST_TOKEN_WARN"
role = "r"
warehouse = "w"

[chat]
history_window = 0
remember_history = true
"#;
        let config = NyayaConfig::from_toml_str(content).unwrap();
        let warnings = config.validate_with_warnings().unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].kind,
            ConfigWarningKind::HistoryWindowDisablesSummary
        );
    }

    #[test]
    fn test_zero_idle_ttl_keeps_sessions() {
        let chat: ChatConfig = toml::from_str("session_idle_ttl_secs = 0").unwrap();
        assert_eq!(chat.session_idle_ttl(), None);
    }

    #[test]
    fn test_load_missing_file() {
        let result = NyayaConfig::load("/definitely/not/here/nyaya.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}

//! Init command implementation
//!
//! Scaffolds a `nyaya.toml` and `.env.example` for a new deployment.

use super::output::Output;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
#[derive(Debug, PartialEq, Eq)]
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// nyaya.toml already exists
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing Nyaya");

    let base_path = &config.path;
    if let Err(e) = fs::create_dir_all(base_path) {
        output.error(&format!("Failed to create {}: {}", base_path.display(), e));
        return InitResult::Error(e.to_string());
    }

    let config_path = base_path.join("nyaya.toml");
    if config_path.exists() && !config.force {
        output.warning("nyaya.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    let files = [
        ("config", "nyaya.toml", generate_nyaya_toml()),
        ("env", ".env.example", generate_env_example()),
    ];
    for (kind, name, content) in files {
        if let Err(e) = write_file(&base_path.join(name), &content, config.force) {
            output.error(&format!("Failed to create {}: {}", name, e));
            return InitResult::Error(e.to_string());
        }
        output.created(kind, name);
    }

    output.complete("Nyaya initialized successfully!");

    output.header("Next Steps");
    output.info("1. Fill in your Snowflake account, user, role and warehouse in nyaya.toml");
    output.info("2. Provide an access token:");
    output.command("cp .env.example .env");
    output.info("3. Start chatting or serve the API:");
    output.command("nyaya-server chat");
    output.command("nyaya-server serve");
    output.newline();

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(());
    }
    fs::write(path, content)
}

fn generate_nyaya_toml() -> String {
    r#"# Nyaya configuration

[server]
host = "127.0.0.1"
port = 3000
log_level = "info"
# "pretty" or "json"
log_format = "pretty"

[snowflake]
account = "your-account-identifier"
user = "YOUR_USER"
role = "YOUR_ROLE"
warehouse = "COMPUTE_WH"
# Name of the environment variable holding the access token
token_env = "SNOWFLAKE_TOKEN"
token_type = "PROGRAMMATIC_ACCESS_TOKEN"
connect_timeout_secs = 10
request_timeout_secs = 120

[search]
database = "LEGAL_DATA_DB"
schema = "LEGAL_DATA_SCHEMA"
service = "LEGAL_JUDGEMENTS_CORTEX_SEARCH_SERVICE"
result_limit = 5
text_column = "extracted_text"

[generation]
# mistral-7b, mistral-large or mixtral-8x7b
default_model = "mistral-large"

[chat]
history_window = 7
remember_history = true
context_snippets = 1
max_context_chars = 12000
# "placeholder" continues without context, "abort" records an error turn
on_retrieval_failure = "placeholder"
# Drop sessions idle this long; 0 keeps them until deleted
session_idle_ttl_secs = 3600
"#
    .to_string()
}

fn generate_env_example() -> String {
    r#"# Snowflake programmatic access token or OAuth token
SNOWFLAKE_TOKEN=

# Log filter override, e.g. nyaya=debug,tower_http=info
# RUST_LOG=info
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::toml_config::NyayaConfig;
    use tempfile::TempDir;

    #[test]
    fn test_generated_toml_parses() {
        let config: NyayaConfig = toml::from_str(&generate_nyaya_toml()).unwrap();
        assert_eq!(config.search.result_limit, 5);
        assert_eq!(config.snowflake.token_env, "SNOWFLAKE_TOKEN");
        assert_eq!(config.chat.history_window, 7);
    }

    #[test]
    fn test_run_creates_files() {
        let dir = TempDir::new().unwrap();
        let result = run(
            InitConfig {
                path: dir.path().to_path_buf(),
                force: false,
            },
            &Output::no_color(),
        );

        assert_eq!(result, InitResult::Success);
        assert!(dir.path().join("nyaya.toml").exists());
        assert!(dir.path().join(".env.example").exists());
    }

    #[test]
    fn test_run_refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("nyaya.toml"), "custom").unwrap();

        let result = run(
            InitConfig {
                path: dir.path().to_path_buf(),
                force: false,
            },
            &Output::no_color(),
        );

        assert_eq!(result, InitResult::AlreadyExists);
        assert_eq!(
            fs::read_to_string(dir.path().join("nyaya.toml")).unwrap(),
            "custom"
        );
    }

    #[test]
    fn test_run_force_overwrites() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("nyaya.toml"), "custom").unwrap();

        let result = run(
            InitConfig {
                path: dir.path().to_path_buf(),
                force: true,
            },
            &Output::no_color(),
        );

        assert_eq!(result, InitResult::Success);
        assert!(fs::read_to_string(dir.path().join("nyaya.toml"))
            .unwrap()
            .contains("[snowflake]"));
    }
}

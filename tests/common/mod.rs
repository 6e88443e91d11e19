//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod mocks;

use nyaya::utils::toml_config::NyayaConfig;

/// Env var holding the dummy token used by test configs.
pub const TEST_TOKEN_ENV: &str = "NYAYA_INTEGRATION_TOKEN";

/// A valid config pointing at `base_url`, with `chat_overrides` appended to
/// the `[chat]` section.
pub fn test_config(base_url: &str, chat_overrides: &str) -> NyayaConfig {
    std::env::set_var(TEST_TOKEN_ENV, "test-token");
    let toml = format!(
        r#"
[snowflake]
account = "xy12345.ap-south-1"
user = "LEGAL_APP"
role = "LEGAL_ANALYST"
warehouse = "COMPUTE_WH"
token_env = "{TEST_TOKEN_ENV}"
base_url = "{base_url}"
request_timeout_secs = 5

[chat]
{chat_overrides}
"#
    );
    NyayaConfig::from_toml_str(&toml).expect("test config should be valid")
}

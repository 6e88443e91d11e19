//! Tracing subscriber initialization.
//!
//! `RUST_LOG` takes precedence over the configured `server.log_level`.

use crate::utils::toml_config::LogFormat;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the env filter, preferring `RUST_LOG` over the configured level.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Logs go to stderr so the terminal chat
/// transcript on stdout stays readable.
pub fn init(default_level: &str, format: LogFormat) {
    let filter = env_filter(default_level);

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("tracing subscriber already installed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_falls_back() {
        // Must not panic on garbage input
        let _ = env_filter("not a [valid filter");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init("debug", LogFormat::Pretty);
        init("debug", LogFormat::Json);
    }
}

//! CLI module for Nyaya
//!
//! Provides command-line interface parsing for the nyaya-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;
pub mod repl;

use crate::types::CortexModel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Nyaya - Indian Legal Assistant
///
/// Answers questions about Indian Supreme Court judgements using retrieval
/// over a Cortex Search service and Cortex-hosted models.
#[derive(Parser, Debug)]
#[command(
    name = "nyaya-server",
    version,
    about = "Nyaya - Indian Legal Assistant",
    long_about = "Answers questions about Indian Supreme Court cases and legal precedents.\n\
                  Relevant judgements are retrieved from a Snowflake Cortex Search service and\n\
                  analysed by a Cortex-hosted model.\n\n\
                  Run without arguments to start the HTTP server, or use 'chat' for the terminal assistant.",
    after_help = "EXAMPLES:\n    \
                  nyaya-server init                       # Scaffold nyaya.toml and .env.example\n    \
                  nyaya-server chat                       # Interactive legal assistant\n    \
                  nyaya-server ask \"Is a gift deed revocable?\"\n    \
                  nyaya-server                            # Start the server (requires nyaya.toml)\n    \
                  nyaya-server --config my.toml serve     # Use a custom config file"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "nyaya.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server (default)
    Serve {
        /// Override server.host
        #[arg(long)]
        host: Option<String>,

        /// Override server.port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Chat with the legal assistant in the terminal
    Chat {
        /// Model to start with (mistral-7b, mistral-large, mixtral-8x7b)
        #[arg(short, long)]
        model: Option<CortexModel>,

        /// Do not summarize chat history into follow-up queries
        #[arg(long)]
        no_history: bool,
    },

    /// Ask a single question and print the analysis
    Ask {
        /// The legal question
        question: String,

        /// Model to use
        #[arg(short, long)]
        model: Option<CortexModel>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create nyaya.toml and .env.example
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration information
    Config {
        /// Show the full configuration
        #[arg(short = 'f', long)]
        full: bool,

        /// Validate the configuration file
        #[arg(long)]
        validate: bool,
    },

    /// List selectable completion models
    Models,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

//! # Nyaya - Indian Legal Research Assistant
//!
//! A retrieval-augmented chat assistant for questions about Indian Supreme
//! Court judgements. Each question is answered by retrieving judgement text
//! from a Snowflake Cortex Search service, optionally folding the recent
//! conversation into a standalone query, and asking a Cortex-hosted model for
//! a structured legal analysis.
//!
//! ## Overview
//!
//! Nyaya can be used in two ways:
//!
//! 1. **As a standalone binary** - `nyaya-server serve` for the HTTP API or
//!    `nyaya-server chat` for the terminal assistant
//! 2. **As a library** - build a [`RagPipeline`] over your own
//!    [`SearchService`] and [`LLMClient`]
//!
//! ### Library Example
//!
//! ```rust,ignore
//! use nyaya::{ChatSession, NyayaConfig, RagPipeline, SessionSettings};
//! use std::sync::Arc;
//!
//! let config = NyayaConfig::load("nyaya.toml")?;
//! let state = nyaya::AppState::from_config(config)?;
//!
//! let id = state.sessions.create(None, None);
//! let outcome = state.sessions.ask(&id, "Can a tenant claim adverse possession?").await?;
//! println!("{}", outcome.turn.content);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `swagger-ui` | Interactive API docs at `/swagger-ui/` |
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`cli`] - Command-line parsing, terminal output and the chat REPL
//! - [`db`] - Snowflake connection and Cortex Search client
//! - [`llm`] - Cortex Complete client, query summarizer and generator
//! - [`memory`] - Chat history and windowing
//! - [`rag`] - Context retrieval and prompt rendering
//! - [`session`] - Chat sessions and the question pipeline
//! - [`types`] - Common types and error handling
//! - [`utils`] - Configuration and logging

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Command-line interface.
pub mod cli;
/// Snowflake connection and search service clients.
pub mod db;
/// LLM clients and generation steps.
pub mod llm;
/// Conversation history.
pub mod memory;
/// Retrieval Augmented Generation (RAG) components.
pub mod rag;
/// Chat sessions and the question pipeline.
pub mod session;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration and logging utilities.
pub mod utils;

// Re-export commonly used types
pub use db::{CortexSearchClient, SearchService, SnowflakeConnection};
pub use llm::{CortexCompleteClient, LLMClient};
pub use session::{ChatSession, RagPipeline, SessionManager, SessionSettings};
pub use types::{AppError, CortexModel, Result};
pub use utils::toml_config::NyayaConfig;

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded at startup
    pub config: Arc<NyayaConfig>,
    /// Live chat sessions
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    /// Build state around explicit collaborators.
    pub fn new(
        config: NyayaConfig,
        search: Arc<dyn SearchService>,
        llm: Arc<dyn LLMClient>,
    ) -> Self {
        let pipeline = Arc::new(RagPipeline::from_config(&config, search, llm));
        let defaults = SessionSettings {
            model: config.generation.default_model,
            remember_history: config.chat.remember_history,
        };
        let sessions =
            SessionManager::new(pipeline, defaults).with_idle_ttl(config.chat.session_idle_ttl());
        Self {
            config: Arc::new(config),
            sessions: Arc::new(sessions),
        }
    }

    /// Open the Snowflake connection and wire the Cortex clients.
    ///
    /// The connection is created once and shared by both clients.
    pub fn from_config(config: NyayaConfig) -> Result<Self> {
        let connection = Arc::new(SnowflakeConnection::from_config(&config)?);
        let search: Arc<dyn SearchService> = Arc::new(CortexSearchClient::new(
            Arc::clone(&connection),
            &config.search,
        ));
        let llm: Arc<dyn LLMClient> = Arc::new(CortexCompleteClient::new(connection));
        Ok(Self::new(config, search, llm))
    }
}

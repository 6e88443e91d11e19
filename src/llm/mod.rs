//! LLM clients and the generation steps of the pipeline.
//!
//! - [`LLMClient`] - completion trait implemented by providers
//! - [`cortex`] - Snowflake Cortex Complete over REST
//! - [`summarizer`] - condenses chat history into a standalone query
//! - [`generator`] - produces the legal analysis from the rendered prompt

/// Core completion client trait.
pub mod client;
/// Snowflake Cortex Complete provider.
pub mod cortex;
pub mod generator;
pub mod summarizer;

pub use client::LLMClient;
pub use cortex::CortexCompleteClient;
pub use generator::AnalysisGenerator;
pub use summarizer::QuerySummarizer;

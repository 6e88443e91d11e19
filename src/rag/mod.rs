//! Retrieval Augmented Generation steps.
//!
//! - [`retriever`] - similarity search against the judgement collection
//! - [`prompt`] - renders the legal analysis prompt
//!
//! The flow for one question is retrieve, optionally summarize history,
//! build the prompt, then generate. The orchestration lives in
//! [`crate::session`].

pub mod prompt;
pub mod retriever;

pub use prompt::{PromptBuilder, NO_CONTEXT_PLACEHOLDER};
pub use retriever::ContextRetriever;

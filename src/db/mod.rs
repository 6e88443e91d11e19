//! Collaborator clients for the Snowflake account.
//!
//! - [`snowflake`] - authenticated REST connection shared by every client
//! - [`vectorstore`] - the [`SearchService`] abstraction used by retrieval
//! - [`cortex_search`] - Cortex Search implementation of [`SearchService`]

pub mod cortex_search;
pub mod snowflake;
pub mod vectorstore;

pub use cortex_search::CortexSearchClient;
pub use snowflake::SnowflakeConnection;
pub use vectorstore::SearchService;

//! Chat sessions and the per-question RAG pipeline.
//!
//! A [`ChatSession`] owns one conversation: its history, its settings and its
//! Idle/Processing state. Every question runs through the shared
//! [`RagPipeline`]:
//!
//! 1. retrieve snippets for the raw question
//! 2. summarize recent history into a standalone query (only when history
//!    retention is on and there is usable prior history)
//! 3. render the analysis prompt
//! 4. generate the analysis with the session's model
//!
//! Each question appends exactly two turns: the user turn, then either the
//! analysis or an error turn.

pub mod manager;

pub use manager::SessionManager;

use crate::db::vectorstore::SearchService;
use crate::llm::{AnalysisGenerator, LLMClient, QuerySummarizer};
use crate::memory::{has_usable_turns, ChatHistory, DEFAULT_HISTORY_WINDOW};
use crate::rag::{ContextRetriever, PromptBuilder};
use crate::types::{AppError, CortexModel, Result, Turn};
use crate::utils::toml_config::{NyayaConfig, RetrievalFailurePolicy};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Per-session knobs the user may change between questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub model: CortexModel,
    pub remember_history: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            model: CortexModel::default(),
            remember_history: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Processing,
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub answer: String,
    pub retrieved: usize,
    pub summarized_query: Option<String>,
}

/// Retrieve, summarize, build, generate.
pub struct RagPipeline {
    retriever: ContextRetriever,
    summarizer: QuerySummarizer,
    prompt_builder: PromptBuilder,
    generator: AnalysisGenerator,
    history_window: usize,
    failure_policy: RetrievalFailurePolicy,
}

impl RagPipeline {
    pub fn new(
        retriever: ContextRetriever,
        summarizer: QuerySummarizer,
        prompt_builder: PromptBuilder,
        generator: AnalysisGenerator,
    ) -> Self {
        Self {
            retriever,
            summarizer,
            prompt_builder,
            generator,
            history_window: DEFAULT_HISTORY_WINDOW,
            failure_policy: RetrievalFailurePolicy::default(),
        }
    }

    /// Wire the pipeline from configuration and the two collaborators.
    pub fn from_config(
        config: &NyayaConfig,
        search: Arc<dyn SearchService>,
        llm: Arc<dyn LLMClient>,
    ) -> Self {
        let chat = &config.chat;
        Self::new(
            ContextRetriever::new(search, config.search.result_limit),
            QuerySummarizer::new(llm.clone()),
            PromptBuilder::new(chat.context_snippets, chat.max_context_chars),
            AnalysisGenerator::new(llm),
        )
        .with_history_window(chat.history_window)
        .with_failure_policy(chat.on_retrieval_failure)
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    pub fn with_failure_policy(mut self, policy: RetrievalFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn history_window(&self) -> usize {
        self.history_window
    }

    pub fn failure_policy(&self) -> RetrievalFailurePolicy {
        self.failure_policy
    }

    /// Answer `question` given the windowed history that preceded it.
    #[instrument(skip(self, question, prior), fields(model = %settings.model, prior = prior.len()))]
    pub async fn run(
        &self,
        question: &str,
        prior: &[Turn],
        settings: SessionSettings,
    ) -> Result<PipelineOutput> {
        let started = Instant::now();

        let context = match self.retriever.retrieve(question).await {
            Ok(context) => context,
            Err(e) => match self.failure_policy {
                RetrievalFailurePolicy::Placeholder => {
                    warn!("Continuing without context: {}", e);
                    Vec::new()
                }
                RetrievalFailurePolicy::Abort => return Err(e),
            },
        };

        let summarized_query = if settings.remember_history && has_usable_turns(prior) {
            match self
                .summarizer
                .summarize(prior, question, settings.model)
                .await
            {
                Ok(summary) if !summary.is_empty() => Some(summary),
                Ok(_) => None,
                Err(e) => {
                    warn!("Continuing without history summary: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let prompt = self.prompt_builder.build(
            question,
            summarized_query.as_deref().unwrap_or(""),
            &context,
        );

        let answer = self.generator.generate(&prompt, settings.model).await?;

        info!(
            retrieved = context.len(),
            summarized = summarized_query.is_some(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Question answered"
        );

        Ok(PipelineOutput {
            answer,
            retrieved: context.len(),
            summarized_query,
        })
    }
}

/// What one question added to the transcript.
#[derive(Debug, Clone)]
pub struct AskOutcome {
    /// The assistant turn (analysis or error) appended after the user turn
    pub turn: Turn,
    pub retrieved: usize,
    pub summarized_query: Option<String>,
}

impl AskOutcome {
    pub fn is_error(&self) -> bool {
        self.turn.is_error()
    }
}

/// One user's conversation.
pub struct ChatSession {
    id: String,
    pipeline: Arc<RagPipeline>,
    history: ChatHistory,
    settings: SessionSettings,
    state: SessionState,
}

impl ChatSession {
    pub fn new(id: impl Into<String>, pipeline: Arc<RagPipeline>, settings: SessionSettings) -> Self {
        Self {
            id: id.into(),
            pipeline,
            history: ChatHistory::new(),
            settings,
            state: SessionState::Idle,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn set_model(&mut self, model: CortexModel) {
        self.settings.model = model;
    }

    pub fn set_remember_history(&mut self, remember: bool) {
        self.settings.remember_history = remember;
    }

    /// Start over: drop every turn and return to Idle.
    pub fn reset(&mut self) {
        self.history.clear();
        self.state = SessionState::Idle;
        info!(session = %self.id, "Session reset");
    }

    /// Ask a question and wait for the answer.
    pub async fn ask(&mut self, question: &str) -> Result<AskOutcome> {
        self.ask_until(question, std::future::pending::<()>()).await
    }

    /// Ask a question, abandoning it when `cancel` completes first.
    ///
    /// Only a blank question is returned as `Err`; it leaves the history
    /// untouched. Every other failure is recorded as an error turn and
    /// reported through [`AskOutcome::turn`]. If the returned future is
    /// dropped mid-flight, a cancellation turn is still recorded.
    pub async fn ask_until<F>(&mut self, question: &str, cancel: F) -> Result<AskOutcome>
    where
        F: Future<Output = ()>,
    {
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::InvalidInput(
                "Question must not be empty".to_string(),
            ));
        }

        let pipeline = Arc::clone(&self.pipeline);
        let settings = self.settings;
        let prior = self.history.window(pipeline.history_window()).to_vec();

        self.history.push(Turn::user(question));
        self.state = SessionState::Processing;
        let mut in_flight = InFlight {
            state: &mut self.state,
            history: &mut self.history,
            finished: false,
        };

        let result = tokio::select! {
            res = pipeline.run(question, &prior, settings) => res,
            _ = cancel => Err(AppError::Cancelled),
        };

        let outcome = match result {
            Ok(output) => AskOutcome {
                turn: Turn::assistant(output.answer),
                retrieved: output.retrieved,
                summarized_query: output.summarized_query,
            },
            Err(e) => {
                warn!(session = %self.id, kind = e.kind(), "Question failed: {}", e);
                AskOutcome {
                    turn: Turn::error(&e),
                    retrieved: 0,
                    summarized_query: None,
                }
            }
        };

        in_flight.finish(outcome.turn.clone());
        Ok(outcome)
    }
}

/// Restores Idle when a question ends, however it ends.
struct InFlight<'a> {
    state: &'a mut SessionState,
    history: &'a mut ChatHistory,
    finished: bool,
}

impl InFlight<'_> {
    fn finish(&mut self, turn: Turn) {
        self.history.push(turn);
        self.finished = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.history.push(Turn::error(&AppError::Cancelled));
        }
        *self.state = SessionState::Idle;
    }
}

//! Registry of live chat sessions.

use super::{AskOutcome, ChatSession, RagPipeline, SessionSettings};
use crate::types::{AppError, CortexModel, Result, SessionResponse};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Idle time after which an unused session may be dropped.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(60 * 60);

struct Entry {
    session: Arc<Mutex<ChatSession>>,
    last_active: parking_lot::Mutex<Instant>,
}

impl Entry {
    fn touch(&self) {
        *self.last_active.lock() = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_active.lock().elapsed()
    }
}

/// Creates, looks up and drops sessions by id.
///
/// Sessions are independent; each sits behind its own async mutex, and a
/// session whose mutex is held is busy answering a question.
///
/// Clients should `remove` sessions they are done with. Sessions left idle
/// longer than the idle TTL are dropped the next time one is created; a busy
/// session is never dropped.
pub struct SessionManager {
    pipeline: Arc<RagPipeline>,
    defaults: SessionSettings,
    idle_ttl: Option<Duration>,
    sessions: RwLock<HashMap<String, Arc<Entry>>>,
}

impl SessionManager {
    pub fn new(pipeline: Arc<RagPipeline>, defaults: SessionSettings) -> Self {
        Self {
            pipeline,
            defaults,
            idle_ttl: Some(DEFAULT_IDLE_TTL),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Idle time before a session may be dropped; `None` keeps sessions
    /// until they are removed.
    pub fn with_idle_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.idle_ttl = ttl;
        self
    }

    pub fn idle_ttl(&self) -> Option<Duration> {
        self.idle_ttl
    }

    /// The pipeline shared by every session.
    pub fn pipeline(&self) -> Arc<RagPipeline> {
        Arc::clone(&self.pipeline)
    }

    pub fn defaults(&self) -> SessionSettings {
        self.defaults
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Open a new session, overriding the default settings where given.
    pub fn create(&self, model: Option<CortexModel>, remember_history: Option<bool>) -> String {
        let settings = SessionSettings {
            model: model.unwrap_or(self.defaults.model),
            remember_history: remember_history.unwrap_or(self.defaults.remember_history),
        };
        let id = Uuid::new_v4().to_string();
        let session = ChatSession::new(id.clone(), Arc::clone(&self.pipeline), settings);
        let entry = Entry {
            session: Arc::new(Mutex::new(session)),
            last_active: parking_lot::Mutex::new(Instant::now()),
        };

        self.sweep_idle();
        self.sessions.write().insert(id.clone(), Arc::new(entry));
        info!(session = %id, model = %settings.model, "Session created");
        id
    }

    /// Drop sessions idle longer than the TTL. Returns how many were dropped.
    pub fn sweep_idle(&self) -> usize {
        let Some(ttl) = self.idle_ttl else {
            return 0;
        };

        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|id, entry| {
            let busy = entry.session.try_lock().is_err();
            let keep = busy || entry.idle_for() < ttl;
            if !keep {
                debug!(session = %id, "Dropping idle session");
            }
            keep
        });
        let dropped = before - sessions.len();
        if dropped > 0 {
            info!(dropped, remaining = sessions.len(), "Swept idle sessions");
        }
        dropped
    }

    fn get(&self, id: &str) -> Result<Arc<Entry>> {
        self.sessions
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))
    }

    fn lock(&self, id: &str) -> Result<tokio::sync::OwnedMutexGuard<ChatSession>> {
        let entry = self.get(id)?;
        entry.touch();
        Arc::clone(&entry.session)
            .try_lock_owned()
            .map_err(|_| AppError::SessionBusy(format!("Session {} is answering a question", id)))
    }

    /// Drop a session. Returns `NotFound` for unknown ids.
    pub fn remove(&self, id: &str) -> Result<()> {
        if self.sessions.write().remove(id).is_none() {
            return Err(AppError::NotFound(format!("Session {} not found", id)));
        }
        info!(session = %id, "Session removed");
        Ok(())
    }

    /// Settings and transcript of a session.
    pub fn snapshot(&self, id: &str) -> Result<SessionResponse> {
        let session = self.lock(id)?;
        let settings = session.settings();
        Ok(SessionResponse {
            session_id: session.id().to_string(),
            model: settings.model,
            remember_history: settings.remember_history,
            turns: session.history().turns().to_vec(),
        })
    }

    /// Ask a question; a session already answering one is `SessionBusy`.
    pub async fn ask(&self, id: &str, question: &str) -> Result<AskOutcome> {
        self.ask_until(id, question, std::future::pending::<()>()).await
    }

    pub async fn ask_until<F>(&self, id: &str, question: &str, cancel: F) -> Result<AskOutcome>
    where
        F: Future<Output = ()>,
    {
        let mut session = self.lock(id)?;
        let outcome = session.ask_until(question, cancel).await;
        if let Ok(entry) = self.get(id) {
            entry.touch();
        }
        outcome
    }

    pub fn update_settings(
        &self,
        id: &str,
        model: Option<CortexModel>,
        remember_history: Option<bool>,
    ) -> Result<SessionSettings> {
        let mut session = self.lock(id)?;
        if let Some(model) = model {
            session.set_model(model);
        }
        if let Some(remember) = remember_history {
            session.set_remember_history(remember);
        }
        Ok(session.settings())
    }

    pub fn reset(&self, id: &str) -> Result<()> {
        self.lock(id)?.reset();
        Ok(())
    }
}

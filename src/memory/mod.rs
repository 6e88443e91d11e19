//! Conversation history for a chat session.
//!
//! This module provides:
//! - [`ChatHistory`], the append-only list of turns owned by one session
//! - Sliding-window views over that history
//! - Serialization of history for the query summarization prompt

use crate::types::{Role, Turn};

/// Default number of recent turns exposed to downstream logic.
pub const DEFAULT_HISTORY_WINDOW: usize = 7;

/// Ordered, append-only list of chat turns.
///
/// Turns are never edited or removed individually; [`ChatHistory::clear`]
/// is the only way to drop them.
#[derive(Debug, Clone, Default)]
pub struct ChatHistory {
    turns: Vec<Turn>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn at the end of the history.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Full history in insertion order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The most recent `window_size` turns, oldest first.
    pub fn window(&self, window_size: usize) -> &[Turn] {
        window(&self.turns, window_size)
    }

    /// Drop every turn.
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

/// Returns the last `min(window_size, len)` turns, preserving order.
pub fn window(history: &[Turn], window_size: usize) -> &[Turn] {
    let start = history.len().saturating_sub(window_size);
    &history[start..]
}

/// Serializes turns for inclusion in a prompt.
///
/// Error turns are skipped so that a failure notice is never mistaken for
/// case analysis.
pub fn format_history_for_prompt(turns: &[Turn]) -> String {
    turns
        .iter()
        .filter(|t| !t.is_error())
        .map(|t| {
            let speaker = match t.role {
                Role::User => "User",
                Role::Assistant => "Assistant",
            };
            format!("{}: {}", speaker, t.content.trim())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// True when the slice contains at least one non-error turn.
pub fn has_usable_turns(turns: &[Turn]) -> bool {
    turns.iter().any(|t| !t.is_error())
}

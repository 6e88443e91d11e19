//! Legal analysis prompt rendering.
//!
//! The template asks for four fixed sections: how the retrieved cases relate
//! to the scenario, the key principles they establish, how those principles
//! apply, and a recommended course of action.

/// Shown in place of case text when retrieval produced nothing.
pub const NO_CONTEXT_PLACEHOLDER: &str = "No relevant context found.";

pub const DEFAULT_CONTEXT_SNIPPETS: usize = 1;
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 12_000;

/// Renders the analysis prompt from a question, an optional conversation
/// summary and the retrieved snippets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptBuilder {
    max_snippets: usize,
    max_chars: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_SNIPPETS, DEFAULT_MAX_CONTEXT_CHARS)
    }
}

impl PromptBuilder {
    /// `max_snippets` and `max_chars` below one are treated as one.
    ///
    /// `max_chars` only bounds context folded from several snippets; a lone
    /// snippet is always embedded whole.
    pub fn new(max_snippets: usize, max_chars: usize) -> Self {
        Self {
            max_snippets: max_snippets.max(1),
            max_chars: max_chars.max(1),
        }
    }

    /// Render the prompt. Pure and deterministic.
    pub fn build(&self, question: &str, history_summary: &str, context: &[String]) -> String {
        let mut prompt = String::from(
            "You are an expert Indian legal assistant analyzing Supreme Court cases.\n\
             Analyze the following legal scenario and relevant case laws to provide advice.\n\n",
        );

        prompt.push_str("Scenario Question:\n");
        prompt.push_str(question.trim());
        prompt.push_str("\n\n");

        let summary = history_summary.trim();
        if !summary.is_empty() {
            prompt.push_str("Conversation-aware query:\n");
            prompt.push_str(summary);
            prompt.push_str("\n\n");
        }

        prompt.push_str("Context: ");
        prompt.push_str(&self.render_context(context));
        prompt.push_str("\n\n");

        prompt.push_str(
            "Please provide:\n\
             1. A brief analysis of how the top 3 cases relate to the scenario\n\
             2. Key legal principles established in these cases (keep it short)\n\
             3. Potential application to the current scenario\n\
             4. Recommended course of action based on these precedents\n\n\
             Format your response in a clear, structured manner with case citations.\n\
             If certain aspects are not covered by these cases, clearly state so.\n",
        );

        prompt
    }

    /// Folds the leading snippets into one block within the character budget.
    fn render_context(&self, context: &[String]) -> String {
        let Some(first) = context.first() else {
            return NO_CONTEXT_PLACEHOLDER.to_string();
        };

        if self.max_snippets == 1 || context.len() == 1 {
            return first.clone();
        }

        let mut rendered = String::new();
        let mut used = 0usize;
        for (i, snippet) in context.iter().take(self.max_snippets).enumerate() {
            let block = format!("[{}] {}", i + 1, snippet.trim());
            let block_chars = block.chars().count();

            if i == 0 {
                let kept = truncate_chars(&block, self.max_chars);
                used = kept.chars().count();
                rendered.push_str(kept);
                continue;
            }

            // Later snippets are either included whole or dropped.
            if used + 2 + block_chars > self.max_chars {
                break;
            }
            rendered.push_str("\n\n");
            rendered.push_str(&block);
            used += 2 + block_chars;
        }
        rendered
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

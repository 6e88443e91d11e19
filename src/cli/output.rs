//! Colored output helpers for CLI
//!
//! Consistent terminal output for the Nyaya binary: command feedback for
//! `init`/`config`, and transcript rendering for the chat REPL.

use crate::types::{Role, Turn};
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print the title banner
    pub fn banner(&self) {
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        if self.colored {
            println!(
                "\n   {} {}",
                "⚖  Nyaya".bright_yellow().bold(),
                version.dimmed()
            );
            println!(
                "   {}\n",
                "Indian Legal Assistant".bright_white().bold()
            );
            println!(
                "   {}\n",
                "Ask questions about Indian Supreme Court cases and legal precedents.".dimmed()
            );
        } else {
            println!("\n   Nyaya {}", version);
            println!("   Indian Legal Assistant\n");
            println!("   Ask questions about Indian Supreme Court cases and legal precedents.\n");
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a file creation message
    pub fn created(&self, file_type: &str, path: &str) {
        if self.colored {
            println!(
                "  {} {} {}",
                "✓".green().bold(),
                file_type.dimmed(),
                path.bright_white()
            );
        } else {
            println!("  [CREATED] {} {}", file_type, path);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if self.colored {
            println!("    {} {}", "•".blue(), item);
        } else {
            println!("    - {}", item);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "💡".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Print a command suggestion
    pub fn command(&self, cmd: &str) {
        if self.colored {
            println!("     {}", format!("$ {}", cmd).bright_cyan());
        } else {
            println!("     $ {}", cmd);
        }
    }

    /// Print completion message
    pub fn complete(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "✔".green(), message.bright_green().bold());
        } else {
            println!("\n  [DONE] {}", message);
        }
    }

    /// Show the input prompt without a trailing newline
    pub fn prompt(&self) {
        if self.colored {
            print!("\n{} ", "Ask your legal question...".dimmed());
            print!("{} ", "›".bright_yellow().bold());
        } else {
            print!("\nAsk your legal question... > ");
        }
        io::stdout().flush().ok();
    }

    /// Echo the question back before answering it
    pub fn you_asked(&self, question: &str) {
        if self.colored {
            println!("\n{} {}", "You asked:".bold(), question);
        } else {
            println!("\nYou asked: {}", question);
        }
    }

    /// Progress indicator shown while a question is in flight
    pub fn thinking(&self) {
        if self.colored {
            println!("{}", "Generating legal analysis...".dimmed().italic());
        } else {
            println!("Generating legal analysis...");
        }
    }

    /// Render one transcript turn. Error turns are labelled so they are
    /// never read as analysis.
    pub fn turn(&self, turn: &Turn) {
        let speaker = match turn.role {
            Role::User => "You",
            Role::Assistant => "Assistant",
        };

        if turn.is_error() {
            let kind = turn.error_kind.as_deref().unwrap_or("error");
            if self.colored {
                println!(
                    "\n{} {}",
                    format!("[{} failed: {}]", speaker, kind).red().bold(),
                    turn.content.red()
                );
            } else {
                println!("\n[{} failed: {}] {}", speaker, kind, turn.content);
            }
            return;
        }

        if self.colored {
            let label = match turn.role {
                Role::User => speaker.bright_cyan().bold().to_string(),
                Role::Assistant => speaker.bright_yellow().bold().to_string(),
            };
            println!("\n{}\n{}", label, turn.content);
        } else {
            println!("\n{}\n{}", speaker, turn.content);
        }
    }

    /// Print a table header row
    pub fn table_header(&self, columns: &[&str]) {
        let header: String = columns
            .iter()
            .map(|c| format!("{:<15}", c))
            .collect::<Vec<_>>()
            .join(" ");
        if self.colored {
            println!("    {}", header.bright_white().bold());
            println!("    {}", "─".repeat(columns.len() * 16).dimmed());
        } else {
            println!("    {}", header);
            println!("    {}", "-".repeat(columns.len() * 16));
        }
    }

    /// Print a table row
    pub fn table_row(&self, values: &[&str]) {
        let row: String = values
            .iter()
            .map(|v| format!("{:<15}", v))
            .collect::<Vec<_>>()
            .join(" ");
        println!("    {}", row);
    }

    /// Print newline
    pub fn newline(&self) {
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_new() {
        let output = Output::new();
        assert!(output.colored);
    }

    #[test]
    fn test_output_no_color() {
        let output = Output::no_color();
        assert!(!output.colored);
    }

    #[test]
    fn test_turn_rendering_does_not_panic() {
        let error = Turn::error(&crate::types::AppError::Retrieval("HTTP 503".to_string()));
        for output in [Output::new(), Output::no_color()] {
            output.turn(&Turn::user("q"));
            output.turn(&Turn::assistant("a"));
            output.turn(&error);
        }
    }
}

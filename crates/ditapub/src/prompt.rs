//! Interactive operator prompts on the terminal.

use std::io;

use console::Term;
use ditapub_confluence::RemotePage;
use ditapub_sync::{ConflictAction, OperatorPrompt};

/// Asks questions on stderr and reads answers from the terminal.
pub(crate) struct TermPrompt {
    term: Term,
}

impl TermPrompt {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    fn ask(&self, question: &str) -> io::Result<String> {
        self.term.write_str(question)?;
        self.term.read_line()
    }
}

impl OperatorPrompt for TermPrompt {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        loop {
            let answer = self.ask(&format!("{question} [y/N] "))?;
            if let Some(yes) = parse_yes_no(&answer) {
                return Ok(yes);
            }
        }
    }

    fn resolve_conflict(&mut self, page: &RemotePage) -> io::Result<ConflictAction> {
        self.term
            .write_line(&format!("   -  {} ({})", page.title, page.id))?;
        loop {
            let answer = self.ask("Remove [R], Move [M], Abort [A], do Nothing [N]: ")?;
            if let Some(action) = ConflictAction::from_answer(&answer) {
                return Ok(action);
            }
        }
    }
}

/// Parse a yes/no answer; an empty answer means no.
fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "" | "n" | "no" => Some(false),
        _ => None,
    }
}

//! Colored stderr reporting for the CLI.

use console::{Style, Term};
use ditapub_confluence::RemotePage;
use ditapub_sync::Toc;

const RULE_WIDTH: usize = 70;

/// Writes user-facing messages to stderr, colored when it is a terminal.
pub(crate) struct Output {
    term: Term,
    ok: Style,
    warn: Style,
    fail: Style,
    heading: Style,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            ok: Style::new().green(),
            warn: Style::new().yellow(),
            fail: Style::new().red(),
            heading: Style::new().cyan().bold(),
        }
    }

    pub(crate) fn info(&self, msg: &str) {
        self.line(msg, None);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.line(msg, Some(&self.ok));
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.line(msg, Some(&self.warn));
    }

    pub(crate) fn error(&self, msg: &str) {
        self.line(msg, Some(&self.fail));
    }

    pub(crate) fn heading(&self, msg: &str) {
        self.line(msg, Some(&self.heading));
    }

    pub(crate) fn rule(&self) {
        self.line(&"-".repeat(RULE_WIDTH), None);
    }

    /// List pages as `   -  title (id)` lines in the warning color.
    pub(crate) fn pages(&self, pages: &[RemotePage]) {
        for page in pages {
            self.warning(&format!("   -  {} ({})", page.title, page.id));
        }
    }

    /// Print the TOC tree between rules, followed by repeated titles.
    pub(crate) fn outline(&self, toc: &Toc) {
        self.heading("Table of contents");
        self.rule();
        let _ = self.term.write_str(&toc.outline());
        self.rule();
        for title in toc.duplicate_titles() {
            self.warning(&format!(
                "Title '{title}' appears more than once in the TOC; its entries share one page"
            ));
        }
    }

    fn line(&self, msg: &str, style: Option<&Style>) {
        let _ = match style {
            Some(style) => self.term.write_line(&style.apply_to(msg).to_string()),
            None => self.term.write_line(msg),
        };
    }
}

//! `outline` command implementation.

use std::path::PathBuf;

use clap::Args;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the outline command.
#[derive(Args)]
pub(crate) struct OutlineArgs {
    /// TOC page of the XHTML output (usually index.html).
    toc_file: PathBuf,
}

impl OutlineArgs {
    /// Execute the outline command.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOC file is missing or cannot be parsed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let toc = super::load_toc(self.toc_file)?;
        output.outline(&toc);
        output.info(&format!("{} page(s)", toc.desired_titles().len()));
        Ok(())
    }
}

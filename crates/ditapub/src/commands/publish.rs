//! `publish` command implementation.

use std::path::PathBuf;

use clap::Args;
use ditapub_config::{CliSettings, Config};
use ditapub_confluence::{ConfluenceClient, ContentService};
use ditapub_html::TransformOptions;
use ditapub_sync::{
    DeletionReport, ExecutionMode, PublishOptions, PublishReport, Publisher, SyncOptions,
};

use crate::error::CliError;
use crate::output::Output;
use crate::prompt::TermPrompt;

/// Arguments for the publish command.
#[derive(Args)]
pub(crate) struct PublishArgs {
    /// TOC page of the XHTML output (usually index.html).
    toc_file: PathBuf,

    /// Confluence user.
    #[arg(short, long, env = "DITAPUB_USER")]
    user: Option<String>,

    /// Confluence password.
    #[arg(short, long, env = "DITAPUB_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Target space key.
    #[arg(short, long)]
    space: Option<String>,

    /// Title of the page the TOC is published below.
    #[arg(short, long)]
    root_page: Option<String>,

    /// Confluence base URL.
    #[arg(long)]
    url: Option<String>,

    /// HTTP proxy URL.
    #[arg(long)]
    proxy: Option<String>,

    /// Delete pages below the root that the TOC no longer references.
    #[arg(short, long)]
    delete_obsolete: bool,

    /// Offer to delete every page of the space except the root first.
    #[arg(long)]
    clear_space: bool,

    /// Show what would change without modifying Confluence.
    #[arg(long)]
    dry_run: bool,

    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl PublishArgs {
    /// Execute the publish command.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOC is missing or invalid, configuration is
    /// incomplete, or publishing fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let mut toc = super::load_toc(self.toc_file)?;
        output.outline(&toc);

        let cli_settings = CliSettings {
            base_url: self.url,
            user: self.user,
            password: self.password,
            space: self.space,
            root_page: self.root_page,
            proxy: self.proxy,
            delete_obsolete: self.delete_obsolete.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let confluence = config.require_confluence()?;

        let mode = ExecutionMode::from_dry_run(self.dry_run);
        if mode.is_simulate() {
            output.warning("Dry run: Confluence will not be modified");
        }

        let client = ConfluenceClient::new(
            &confluence.base_url,
            confluence.timeout,
            confluence.proxy.as_deref(),
        )?;
        let session = client.login(&confluence.user, &confluence.password)?;

        let options = PublishOptions {
            space: confluence.space,
            root_page: confluence.root_page,
            delete_obsolete: config.publish.delete_obsolete,
            clear_space: self.clear_space,
            sync: SyncOptions {
                transform: TransformOptions {
                    xref_class: config.publish.xref_class,
                },
                malformed_branch: config.publish.malformed_branch,
                mode,
            },
        };

        let mut prompt = TermPrompt::new();
        let report = Publisher::new(&client, &session, &options).publish(&mut toc, &mut prompt)?;
        print_report(&output, &report, mode);
        Ok(())
    }
}

fn print_report(output: &Output, report: &PublishReport, mode: ExecutionMode) {
    output.rule();
    if let Some(cleared) = &report.cleared {
        print_deletion(output, "Cleared", cleared);
    }

    if !report.unresolved_conflicts.is_empty() {
        output.warning("Conflicting pages left in place:");
        output.pages(&report.unresolved_conflicts);
    }

    if !report.obsolete.is_empty() {
        output.warning(&format!("{} obsolete page(s):", report.obsolete.len()));
        output.pages(&report.obsolete);
        match &report.obsolete_deletion {
            Some(deletion) => print_deletion(output, "Deleted obsolete", deletion),
            None => output.info("Obsolete pages kept (use --delete-obsolete to remove them)"),
        }
    }

    for branch in &report.sync.malformed_branches {
        output.warning(&format!("Malformed TOC branch below '{branch}'"));
    }
    for failure in &report.sync.move_failures {
        output.error(&format!(
            "Could not move '{}' ({}) below '{}' ({}): {}",
            failure.page, failure.page_id, failure.target, failure.target_id, failure.error
        ));
    }

    let verb = if mode.is_simulate() {
        "Would publish"
    } else {
        "Published"
    };
    let summary = format!(
        "{verb}: {} created, {} updated, {} attachment(s)",
        report.sync.created, report.sync.updated, report.sync.attachments
    );
    if report.sync.move_failures.is_empty() {
        output.success(&summary);
    } else {
        output.warning(&summary);
    }
    if let Some(root) = &report.root {
        output.heading(&format!("Root page: {} ({})", root.title, root.id));
    }
}

fn print_deletion(output: &Output, label: &str, deletion: &DeletionReport) {
    let count = deletion.removed.len() + deletion.simulated.len();
    output.info(&format!("{label}: {count} page(s)"));
    for failure in &deletion.failed {
        output.error(&format!(
            "Failed to delete '{}' ({}): {}",
            failure.page.title, failure.page.id, failure.error
        ));
    }
}

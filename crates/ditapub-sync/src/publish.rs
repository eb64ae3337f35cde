//! End-to-end publish run.
//!
//! 1. Locate the root page in the space listing.
//! 2. Optionally clear the space, keeping only the root.
//! 3. Resolve pages elsewhere in the space that block TOC titles.
//! 4. Report pages below the root the TOC no longer has, and optionally
//!    delete them.
//! 5. Publish the TOC tree below the root.

use ditapub_confluence::{ContentService, RemotePage, Session};
use tracing::{info, warn};

use crate::conflict::{OperatorPrompt, resolve_conflicts};
use crate::deletion::{DeletionReport, delete_pages};
use crate::error::SyncError;
use crate::inventory::Inventory;
use crate::toc::Toc;
use crate::tree::{SyncOptions, SyncReport, TreeSync};

/// Settings for [`Publisher`].
#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    /// Space key.
    pub space: String,
    /// Title of the page the TOC is published below.
    pub root_page: String,
    /// Delete pages below the root that the TOC does not reference.
    pub delete_obsolete: bool,
    /// Offer to delete every page of the space except the root first.
    pub clear_space: bool,
    /// Tree publishing settings, including the execution mode.
    pub sync: SyncOptions,
}

/// Outcome of [`Publisher::publish`].
#[derive(Debug, Default)]
pub struct PublishReport {
    /// Root page the TOC was published below.
    pub root: Option<RemotePage>,
    /// Result of clearing the space, when confirmed.
    pub cleared: Option<DeletionReport>,
    /// Conflicting pages the operator left in place.
    pub unresolved_conflicts: Vec<RemotePage>,
    /// Pages below the root the TOC does not reference.
    pub obsolete: Vec<RemotePage>,
    /// Result of deleting obsolete pages, when requested and confirmed.
    pub obsolete_deletion: Option<DeletionReport>,
    /// Result of publishing the tree.
    pub sync: SyncReport,
}

/// Publishes a TOC into a space.
pub struct Publisher<'a, S: ?Sized> {
    service: &'a S,
    session: &'a Session,
    options: &'a PublishOptions,
}

impl<'a, S: ContentService + ?Sized> Publisher<'a, S> {
    /// Create a publisher using an authenticated session.
    pub fn new(service: &'a S, session: &'a Session, options: &'a PublishOptions) -> Self {
        Self {
            service,
            session,
            options,
        }
    }

    /// Run the whole publish flow for `toc`, asking `prompt` before
    /// destructive steps.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::RootPageNotFound`] when the root page is
    /// missing, [`SyncError::ConflictingTitle`] when the operator aborts,
    /// and any error from publishing the tree.
    pub fn publish(
        &self,
        toc: &mut Toc,
        prompt: &mut dyn OperatorPrompt,
    ) -> Result<PublishReport, SyncError> {
        let mode = self.options.sync.mode;
        let space = self
            .service
            .get_space(self.session, &self.options.space)
            .map_err(SyncError::remote(format!("fetch space {}", self.options.space)))?;
        info!("Publishing to space '{}' ({})", space.name, space.key);

        let mut inventory =
            Inventory::fetch(self.service, self.session, &space.key, &self.options.root_page)?;
        let mut report = PublishReport::default();

        if self.options.clear_space {
            report.cleared = self.clear_space(&mut inventory, prompt)?;
        }

        let desired = toc.desired_titles();
        report.unresolved_conflicts =
            resolve_conflicts(self.service, self.session, &mut inventory, &desired, prompt, mode)?;
        for page in &report.unresolved_conflicts {
            warn!("Conflicting page '{}' ({}) left in place", page.title, page.id);
        }

        report.obsolete = inventory.obsolete(&desired);
        if !report.obsolete.is_empty() {
            warn!("Found {} obsolete page(s) below '{}':", report.obsolete.len(), inventory.root().title);
            for page in &report.obsolete {
                warn!("   -  {}", page.title);
            }
            if self.options.delete_obsolete {
                let question = format!("Delete {} obsolete page(s)?", report.obsolete.len());
                if prompt.confirm(&question).map_err(SyncError::Prompt)? {
                    let deletion = delete_pages(self.service, self.session, &report.obsolete, mode);
                    if deletion.changed_remote() {
                        inventory.refresh(self.service, self.session)?;
                    }
                    report.obsolete_deletion = Some(deletion);
                }
            }
        }

        let tree = TreeSync::new(
            self.service,
            self.session,
            &self.options.sync,
            inventory.descendants(),
        );
        report.sync = tree.sync(&mut toc.root, inventory.root())?;
        report.root = Some(inventory.root().clone());

        info!(
            "Published: {} created, {} updated, {} attachment(s)",
            report.sync.created, report.sync.updated, report.sync.attachments
        );
        Ok(report)
    }

    /// Delete every page except the root after confirmation.
    fn clear_space(
        &self,
        inventory: &mut Inventory,
        prompt: &mut dyn OperatorPrompt,
    ) -> Result<Option<DeletionReport>, SyncError> {
        let doomed: Vec<RemotePage> = inventory
            .pages()
            .iter()
            .filter(|p| p.id != inventory.root().id)
            .cloned()
            .collect();
        if doomed.is_empty() {
            return Ok(None);
        }

        warn!("The following pages will be deleted:");
        for page in &doomed {
            warn!("- {}", page.title);
        }
        let question = format!(
            "Really delete all {} pages above, including their comments?",
            doomed.len()
        );
        if !prompt.confirm(&question).map_err(SyncError::Prompt)? {
            return Ok(None);
        }

        let deletion = delete_pages(self.service, self.session, &doomed, self.options.sync.mode);
        if deletion.changed_remote() {
            inventory.refresh(self.service, self.session)?;
        }
        Ok(Some(deletion))
    }
}

//! Page removal.

use ditapub_confluence::{ConfluenceError, ContentService, RemotePage, Session};
use tracing::{error, info};

use crate::mode::ExecutionMode;

/// Page whose removal failed.
#[derive(Debug)]
pub struct DeletionFailure {
    /// Page that is still present.
    pub page: RemotePage,
    /// Error reported by the service.
    pub error: ConfluenceError,
}

/// Outcome of [`delete_pages`].
#[derive(Debug, Default)]
pub struct DeletionReport {
    /// Pages that were removed.
    pub removed: Vec<RemotePage>,
    /// Pages that a simulated run would have removed.
    pub simulated: Vec<RemotePage>,
    /// Pages whose removal failed.
    pub failed: Vec<DeletionFailure>,
}

impl DeletionReport {
    /// Whether any page was actually removed.
    #[must_use]
    pub fn changed_remote(&self) -> bool {
        !self.removed.is_empty()
    }
}

/// Remove pages one by one.
///
/// A failure is logged and recorded, and the remaining pages are still
/// processed. In [`ExecutionMode::Simulate`] nothing is removed.
pub fn delete_pages<S: ContentService + ?Sized>(
    service: &S,
    session: &Session,
    pages: &[RemotePage],
    mode: ExecutionMode,
) -> DeletionReport {
    let mut report = DeletionReport::default();
    for page in pages {
        if mode.is_simulate() {
            info!("Simulate: delete page '{}' ({})", page.title, page.id);
            report.simulated.push(page.clone());
            continue;
        }
        match service.remove_page(session, &page.id) {
            Ok(()) => {
                info!("Deleted page '{}' ({})", page.title, page.id);
                report.removed.push(page.clone());
            }
            Err(e) => {
                error!("Failed to delete page '{}' ({}): {e}", page.title, page.id);
                report.failed.push(DeletionFailure {
                    page: page.clone(),
                    error: e,
                });
            }
        }
    }
    report
}

//! Interactive resolution of title conflicts.
//!
//! A page elsewhere in the space with a title the TOC wants blocks
//! publishing, since titles are unique per space. The operator decides per
//! page whether to remove it, move it under the root (where it is then
//! overwritten, keeping history and comments), abort, or leave it.

use std::collections::HashSet;
use std::io;

use ditapub_confluence::{ContentService, MovePosition, RemotePage, Session};
use tracing::{error, info, warn};

use crate::deletion::delete_pages;
use crate::error::SyncError;
use crate::inventory::Inventory;
use crate::mode::ExecutionMode;

/// Operator decision for a conflicting page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictAction {
    /// Delete the page.
    Remove,
    /// Move the page under the publish root.
    Move,
    /// Stop publishing.
    Abort,
    /// Leave the page where it is.
    Skip,
}

impl ConflictAction {
    /// Parse an answer to the `[R]emove/[M]ove/[A]bort/do [N]othing` prompt.
    ///
    /// Accepts the letters and the full words, ignoring case. Returns
    /// `None` for anything else.
    #[must_use]
    pub fn from_answer(answer: &str) -> Option<Self> {
        match answer.trim().to_lowercase().as_str() {
            "r" | "remove" => Some(Self::Remove),
            "m" | "move" => Some(Self::Move),
            "a" | "abort" => Some(Self::Abort),
            "n" | "nothing" | "skip" => Some(Self::Skip),
            _ => None,
        }
    }
}

/// Source of operator decisions.
pub trait OperatorPrompt {
    /// Ask a yes/no question.
    fn confirm(&mut self, question: &str) -> io::Result<bool>;

    /// Ask what to do with a page that blocks a wanted title.
    fn resolve_conflict(&mut self, page: &RemotePage) -> io::Result<ConflictAction>;
}

/// Let the operator resolve every conflict.
///
/// After a round in which pages were removed or moved, the space is listed
/// again and newly found conflicts are asked about. The loop ends when no
/// conflicts remain or a round changed nothing (all skipped, or simulated).
/// Returns the conflicts still present.
///
/// # Errors
///
/// Returns [`SyncError::RootTitleInToc`] before asking anything when the
/// TOC wants the root's own title, [`SyncError::ConflictingTitle`] when the
/// operator aborts, and prompt or listing errors.
pub fn resolve_conflicts<S: ContentService + ?Sized>(
    service: &S,
    session: &Session,
    inventory: &mut Inventory,
    desired: &HashSet<String>,
    prompt: &mut dyn OperatorPrompt,
    mode: ExecutionMode,
) -> Result<Vec<RemotePage>, SyncError> {
    if inventory.root_is_desired(desired) {
        return Err(SyncError::RootTitleInToc(inventory.root().title.clone()));
    }
    let mut conflicts = inventory.conflicts(desired);

    while !conflicts.is_empty() {
        warn!(
            "{} page(s) outside '{}' use titles from the TOC; remove, rename or move them",
            conflicts.len(),
            inventory.root().title
        );

        let mut changed = false;
        for page in &conflicts {
            let action = prompt.resolve_conflict(page).map_err(SyncError::Prompt)?;
            changed |= match action {
                ConflictAction::Remove => {
                    delete_pages(service, session, std::slice::from_ref(page), mode)
                        .changed_remote()
                }
                ConflictAction::Move => move_under_root(service, session, page, inventory.root(), mode),
                ConflictAction::Abort => {
                    return Err(SyncError::ConflictingTitle {
                        titles: conflicts.iter().map(|p| p.title.clone()).collect(),
                    });
                }
                ConflictAction::Skip => {
                    info!("Leaving conflicting page '{}' in place", page.title);
                    false
                }
            };
        }

        if !changed {
            break;
        }
        inventory.refresh(service, session)?;
        conflicts = inventory.conflicts(desired);
    }

    Ok(conflicts)
}

fn move_under_root<S: ContentService + ?Sized>(
    service: &S,
    session: &Session,
    page: &RemotePage,
    root: &RemotePage,
    mode: ExecutionMode,
) -> bool {
    if mode.is_simulate() {
        info!("Simulate: move page '{}' under '{}'", page.title, root.title);
        return false;
    }
    match service.move_page(session, &page.id, &root.id, MovePosition::Append) {
        Ok(()) => {
            info!("Moved page '{}' under '{}'", page.title, root.title);
            true
        }
        Err(e) => {
            error!(
                "Failed to move page '{}' ({}) under '{}' ({}): {e}",
                page.title, page.id, root.title, root.id
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use ditapub_confluence::{MockCall, MockService, PageId, title_key};
    use pretty_assertions::assert_eq;

    use super::*;

    struct Scripted(VecDeque<ConflictAction>);

    impl OperatorPrompt for Scripted {
        fn confirm(&mut self, _question: &str) -> io::Result<bool> {
            Ok(true)
        }

        fn resolve_conflict(&mut self, _page: &RemotePage) -> io::Result<ConflictAction> {
            Ok(self.0.pop_front().unwrap_or(ConflictAction::Skip))
        }
    }

    fn setup() -> (MockService, Session, Inventory, HashSet<String>) {
        let service = MockService::new("DOC")
            .with_page("1", "Manual", None)
            .with_page("2", "Intro", Some("1"))
            .with_page("3", "Setup", None)
            .with_page("4", "Usage", None);
        let session = service.login("u", "p").unwrap();
        let inventory = Inventory::fetch(&service, &session, "DOC", "manual").unwrap();
        let desired = ["Intro", "Setup", "Usage"].iter().map(|t| title_key(t)).collect();
        (service, session, inventory, desired)
    }

    #[test]
    fn test_from_answer() {
        assert_eq!(ConflictAction::from_answer("R"), Some(ConflictAction::Remove));
        assert_eq!(ConflictAction::from_answer(" m\n"), Some(ConflictAction::Move));
        assert_eq!(ConflictAction::from_answer("a"), Some(ConflictAction::Abort));
        assert_eq!(ConflictAction::from_answer("N"), Some(ConflictAction::Skip));
        assert_eq!(ConflictAction::from_answer("x"), None);
        assert_eq!(ConflictAction::from_answer(""), None);
    }

    #[test]
    fn test_remove_and_move_resolve_conflicts() {
        let (service, session, mut inventory, desired) = setup();
        let mut prompt = Scripted(VecDeque::from([ConflictAction::Remove, ConflictAction::Move]));

        let unresolved = resolve_conflicts(
            &service,
            &session,
            &mut inventory,
            &desired,
            &mut prompt,
            ExecutionMode::Apply,
        )
        .unwrap();

        assert!(unresolved.is_empty());
        assert_eq!(
            service.calls(),
            vec![
                MockCall::Remove(PageId::new("3")),
                MockCall::Move {
                    page: PageId::new("4"),
                    target: PageId::new("1"),
                    position: MovePosition::Append,
                },
            ]
        );
        let below_root: Vec<_> = inventory.descendants().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(below_root, vec!["Intro", "Usage"]);
    }

    #[test]
    fn test_skip_leaves_conflicts_unresolved() {
        let (service, session, mut inventory, desired) = setup();
        let mut prompt = Scripted(VecDeque::new());

        let unresolved = resolve_conflicts(
            &service,
            &session,
            &mut inventory,
            &desired,
            &mut prompt,
            ExecutionMode::Apply,
        )
        .unwrap();

        assert_eq!(unresolved.len(), 2);
        assert!(service.calls().is_empty());
    }

    #[test]
    fn test_abort() {
        let (service, session, mut inventory, desired) = setup();
        let mut prompt = Scripted(VecDeque::from([ConflictAction::Skip, ConflictAction::Abort]));

        let err = resolve_conflicts(
            &service,
            &session,
            &mut inventory,
            &desired,
            &mut prompt,
            ExecutionMode::Apply,
        )
        .unwrap_err();

        assert!(
            matches!(err, SyncError::ConflictingTitle { ref titles } if titles == &["Setup", "Usage"])
        );
    }

    #[test]
    fn test_simulate_does_not_loop() {
        let (service, session, mut inventory, desired) = setup();
        let mut prompt = Scripted(VecDeque::from([ConflictAction::Remove, ConflictAction::Move]));

        let unresolved = resolve_conflicts(
            &service,
            &session,
            &mut inventory,
            &desired,
            &mut prompt,
            ExecutionMode::Simulate,
        )
        .unwrap();

        assert_eq!(unresolved.len(), 2);
        assert!(service.calls().is_empty());
    }

    #[test]
    fn test_root_title_in_toc_is_not_offered_for_removal() {
        let (service, session, mut inventory, mut desired) = setup();
        desired.insert(title_key("Manual"));
        let mut prompt = Scripted(VecDeque::from([ConflictAction::Remove]));

        let err = resolve_conflicts(
            &service,
            &session,
            &mut inventory,
            &desired,
            &mut prompt,
            ExecutionMode::Apply,
        )
        .unwrap_err();

        assert!(matches!(err, SyncError::RootTitleInToc(ref title) if title == "Manual"));
        assert_eq!(prompt.0.len(), 1);
        assert!(service.calls().is_empty());
        assert!(service.page_by_title("Manual").is_some());
    }

    #[test]
    fn test_failed_removal_does_not_loop() {
        let service = MockService::new("DOC")
            .with_page("1", "Manual", None)
            .with_page("3", "Setup", None)
            .with_failing_removal("3");
        let session = service.login("u", "p").unwrap();
        let mut inventory = Inventory::fetch(&service, &session, "DOC", "Manual").unwrap();
        let desired = HashSet::from([title_key("Setup")]);
        let mut prompt = Scripted(VecDeque::from([ConflictAction::Remove]));

        let unresolved = resolve_conflicts(
            &service,
            &session,
            &mut inventory,
            &desired,
            &mut prompt,
            ExecutionMode::Apply,
        )
        .unwrap();

        assert_eq!(unresolved.len(), 1);
    }
}

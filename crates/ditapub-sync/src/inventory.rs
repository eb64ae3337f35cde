//! Remote page inventory.
//!
//! Relates the pages of a space to the publish root and to the titles the
//! TOC wants: which pages are below the root, which block a title from
//! elsewhere in the space, and which are no longer referenced.

use std::collections::{HashMap, HashSet};

use ditapub_confluence::{ContentService, PageId, RemotePage, Session, title_key};
use tracing::debug;

use crate::error::SyncError;

/// Pages below `root`, following parent links.
///
/// The walk stops at a top-level page, at a parent missing from `all` and
/// at an already visited page, so cycles terminate. `root` itself is never
/// included.
#[must_use]
pub fn descendants_of(root: &RemotePage, all: &[RemotePage]) -> Vec<RemotePage> {
    let parents: HashMap<&PageId, Option<&PageId>> = all
        .iter()
        .map(|page| (&page.id, page.parent_id.as_ref()))
        .collect();

    all.iter()
        .filter(|page| page.id != root.id && reaches(&page.id, &root.id, &parents))
        .cloned()
        .collect()
}

fn reaches<'a>(
    start: &'a PageId,
    root: &PageId,
    parents: &HashMap<&'a PageId, Option<&'a PageId>>,
) -> bool {
    let mut visited = HashSet::from([start]);
    let mut current = parents.get(start).copied().flatten();
    while let Some(id) = current {
        if id == root {
            return true;
        }
        if !visited.insert(id) {
            return false;
        }
        current = parents.get(id).copied().flatten();
    }
    false
}

/// Pages outside the root's tree whose title the TOC wants.
///
/// `desired` holds [`title_key`]s. Titles are unique per space, so these
/// pages have to be moved or removed before publishing.
#[must_use]
pub fn conflicts_with(
    all: &[RemotePage],
    descendants: &[RemotePage],
    desired: &HashSet<String>,
) -> Vec<RemotePage> {
    let below_root: HashSet<&PageId> = descendants.iter().map(|p| &p.id).collect();
    all.iter()
        .filter(|page| !below_root.contains(&page.id) && desired.contains(&page.title_key()))
        .cloned()
        .collect()
}

/// Pages in the root's tree whose title the TOC no longer has.
#[must_use]
pub fn obsolete_among(descendants: &[RemotePage], desired: &HashSet<String>) -> Vec<RemotePage> {
    descendants
        .iter()
        .filter(|page| !desired.contains(&page.title_key()))
        .cloned()
        .collect()
}

/// Snapshot of a space's pages around the publish root.
#[derive(Debug, Clone)]
pub struct Inventory {
    space: String,
    root: RemotePage,
    pages: Vec<RemotePage>,
    descendants: Vec<RemotePage>,
}

impl Inventory {
    /// List the pages of `space` and locate the root page by title,
    /// ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::RootPageNotFound`] when no page has the title,
    /// or the remote error when listing fails.
    pub fn fetch<S: ContentService + ?Sized>(
        service: &S,
        session: &Session,
        space: &str,
        root_title: &str,
    ) -> Result<Self, SyncError> {
        let pages = list(service, session, space)?;
        let key = title_key(root_title);
        let root = pages
            .iter()
            .find(|p| p.title_key() == key)
            .cloned()
            .ok_or_else(|| SyncError::RootPageNotFound(root_title.to_owned()))?;
        Ok(Self::new(space, root, pages))
    }

    /// Build an inventory from an already fetched page list.
    #[must_use]
    pub fn new(space: impl Into<String>, root: RemotePage, pages: Vec<RemotePage>) -> Self {
        let descendants = descendants_of(&root, &pages);
        Self {
            space: space.into(),
            root,
            pages,
            descendants,
        }
    }

    /// Re-list the space after pages were removed or moved.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::RootPageNotFound`] if the root page is gone.
    pub fn refresh<S: ContentService + ?Sized>(
        &mut self,
        service: &S,
        session: &Session,
    ) -> Result<(), SyncError> {
        let pages = list(service, session, &self.space)?;
        let root = pages
            .iter()
            .find(|p| p.id == self.root.id)
            .cloned()
            .ok_or_else(|| SyncError::RootPageNotFound(self.root.title.clone()))?;
        *self = Self::new(std::mem::take(&mut self.space), root, pages);
        Ok(())
    }

    /// Space key.
    #[must_use]
    pub fn space(&self) -> &str {
        &self.space
    }

    /// Publish root.
    #[must_use]
    pub fn root(&self) -> &RemotePage {
        &self.root
    }

    /// Every page of the space.
    #[must_use]
    pub fn pages(&self) -> &[RemotePage] {
        &self.pages
    }

    /// Pages below the root.
    #[must_use]
    pub fn descendants(&self) -> &[RemotePage] {
        &self.descendants
    }

    /// See [`conflicts_with`]. The root is never reported, even when the
    /// TOC wants its title; check [`Inventory::root_is_desired`] for that.
    #[must_use]
    pub fn conflicts(&self, desired: &HashSet<String>) -> Vec<RemotePage> {
        let mut conflicts = conflicts_with(&self.pages, &self.descendants, desired);
        conflicts.retain(|page| page.id != self.root.id);
        conflicts
    }

    /// Whether the TOC wants the root page's own title.
    #[must_use]
    pub fn root_is_desired(&self, desired: &HashSet<String>) -> bool {
        desired.contains(&self.root.title_key())
    }

    /// See [`obsolete_among`].
    #[must_use]
    pub fn obsolete(&self, desired: &HashSet<String>) -> Vec<RemotePage> {
        obsolete_among(&self.descendants, desired)
    }
}

fn list<S: ContentService + ?Sized>(
    service: &S,
    session: &Session,
    space: &str,
) -> Result<Vec<RemotePage>, SyncError> {
    let pages = service
        .list_pages(session, space)
        .map_err(SyncError::remote(format!("list pages of space {space}")))?;
    debug!(space, count = pages.len(), "listed pages");
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn page(id: &str, title: &str, parent: Option<&str>) -> RemotePage {
        RemotePage {
            id: PageId::new(id),
            title: title.to_owned(),
            parent_id: parent.map(PageId::new),
            space: "DOC".to_owned(),
            version: 1,
        }
    }

    fn titles(pages: &[RemotePage]) -> Vec<&str> {
        pages.iter().map(|p| p.title.as_str()).collect()
    }

    fn desired(titles: &[&str]) -> HashSet<String> {
        titles.iter().map(|t| title_key(t)).collect()
    }

    #[test]
    fn test_descendants_follow_parent_chain() {
        let all = vec![
            page("1", "Home", None),
            page("2", "Manual", Some("1")),
            page("3", "Intro", Some("2")),
            page("4", "Deep", Some("3")),
            page("5", "Elsewhere", Some("1")),
        ];
        assert_eq!(titles(&descendants_of(&all[1], &all)), vec!["Intro", "Deep"]);
    }

    #[test]
    fn test_descendants_stop_at_missing_parent() {
        let all = vec![page("2", "Manual", None), page("3", "Orphan", Some("99"))];
        assert!(descendants_of(&all[0], &all).is_empty());
    }

    #[test]
    fn test_descendants_terminate_on_cycle() {
        let all = vec![
            page("2", "Manual", None),
            page("3", "A", Some("4")),
            page("4", "B", Some("3")),
            page("5", "C", Some("2")),
        ];
        assert_eq!(titles(&descendants_of(&all[0], &all)), vec!["C"]);
    }

    #[test]
    fn test_root_in_cycle_is_not_its_own_descendant() {
        let all = vec![page("2", "Manual", Some("3")), page("3", "A", Some("2"))];
        assert_eq!(titles(&descendants_of(&all[0], &all)), vec!["A"]);
    }

    #[test]
    fn test_conflicts_ignore_case() {
        let all = vec![
            page("1", "Manual", None),
            page("2", "Intro", Some("1")),
            page("3", "SETUP", None),
            page("4", "Unrelated", None),
        ];
        let descendants = descendants_of(&all[0], &all);
        let conflicts = conflicts_with(&all, &descendants, &desired(&["Intro", "Setup"]));
        assert_eq!(titles(&conflicts), vec!["SETUP"]);
    }

    #[test]
    fn test_obsolete_pages() {
        let descendants = vec![
            page("2", "Intro", Some("1")),
            page("3", "Old Topic", Some("1")),
        ];
        let obsolete = obsolete_among(&descendants, &desired(&["intro", "Setup"]));
        assert_eq!(titles(&obsolete), vec!["Old Topic"]);
    }

    #[test]
    fn test_inventory_new() {
        let all = vec![
            page("1", "Manual", None),
            page("2", "Intro", Some("1")),
            page("3", "Setup", None),
        ];
        let inventory = Inventory::new("DOC", all[0].clone(), all);

        assert_eq!(titles(inventory.descendants()), vec!["Intro"]);
        assert_eq!(titles(&inventory.conflicts(&desired(&["Setup"]))), vec!["Setup"]);
        assert_eq!(titles(&inventory.obsolete(&desired(&["Setup"]))), vec!["Intro"]);
    }

    #[test]
    fn test_root_is_never_a_conflict() {
        let all = vec![page("1", "Manual", None), page("3", "Setup", None)];
        let inventory = Inventory::new("DOC", all[0].clone(), all);
        let wanted = desired(&["manual", "Setup"]);

        assert_eq!(titles(&inventory.conflicts(&wanted)), vec!["Setup"]);
        assert!(inventory.root_is_desired(&wanted));
        assert!(!inventory.root_is_desired(&desired(&["Setup"])));
    }
}

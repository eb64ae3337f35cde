//! Publishing of the TOC tree.
//!
//! Nodes are stored top-down so every page can name its parent, then the
//! children of each node are moved into TOC order.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use ditapub_config::MalformedBranchPolicy;
use ditapub_confluence::{ContentService, MovePosition, PageDraft, PageId, RemotePage, Session, title_key};
use ditapub_html::{AttachmentRef, Document, TransformOptions, extract_title, transform_page};
use tracing::{debug, error, info};

use crate::attachments::upload_attachments;
use crate::error::SyncError;
use crate::mode::ExecutionMode;
use crate::toc::{PageBinding, TocLink, TocNode};

/// Settings for [`TreeSync`].
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Content conversion settings.
    pub transform: TransformOptions,
    /// Handling of TOC entries without a link.
    pub malformed_branch: MalformedBranchPolicy,
    /// Whether remote changes are made.
    pub mode: ExecutionMode,
}

/// Failed attempt to put a page below its preceding sibling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveFailure {
    /// Title of the page being moved.
    pub page: String,
    /// ID of the page being moved.
    pub page_id: PageId,
    /// Title of the sibling it should follow.
    pub target: String,
    /// ID of that sibling.
    pub target_id: PageId,
    /// Error reported by the service.
    pub error: String,
}

/// Outcome of [`TreeSync::sync`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Pages created (or that would have been).
    pub created: usize,
    /// Pages updated (or that would have been).
    pub updated: usize,
    /// Files attached.
    pub attachments: usize,
    /// Titles of pages that have a TOC entry without a link below them.
    pub malformed_branches: Vec<String>,
    /// Reordering moves that failed.
    pub move_failures: Vec<MoveFailure>,
}

/// Publishes a TOC tree below a parent page.
pub struct TreeSync<'a, S: ?Sized> {
    service: &'a S,
    session: &'a Session,
    options: &'a SyncOptions,
    known: HashMap<String, RemotePage>,
    /// Title keys a simulated run would have created.
    planned: HashSet<String>,
    report: SyncReport,
}

/// Document converted for upload.
struct PreparedPage {
    title: String,
    content: String,
    files: Vec<AttachmentRef>,
}

impl<'a, S: ContentService + ?Sized> TreeSync<'a, S> {
    /// Create a sync that updates pages from `known` by title and creates
    /// the rest.
    pub fn new(
        service: &'a S,
        session: &'a Session,
        options: &'a SyncOptions,
        known: &[RemotePage],
    ) -> Self {
        Self {
            service,
            session,
            options,
            known: known
                .iter()
                .map(|page| (page.title_key(), page.clone()))
                .collect(),
            planned: HashSet::new(),
            report: SyncReport::default(),
        }
    }

    /// Publish `root` and its descendants below `parent`, binding each
    /// node to its page.
    ///
    /// # Errors
    ///
    /// Stops at the first document that cannot be read or converted, the
    /// first failed store or upload, and at a malformed entry when the
    /// policy is [`MalformedBranchPolicy::Abort`]. Failed moves are only
    /// reported.
    pub fn sync(mut self, root: &mut TocNode, parent: &RemotePage) -> Result<SyncReport, SyncError> {
        self.sync_node(root, &PageBinding::Remote(parent.clone()))?;
        if root.page.is_none() {
            self.reorder(&root.children);
        }
        Ok(self.report)
    }

    fn sync_node(&mut self, node: &mut TocNode, parent: &PageBinding) -> Result<(), SyncError> {
        node.page = match node.primary_link() {
            Some(link) => Some(self.upsert(link, parent)?),
            None => {
                error!(
                    "TOC entry below '{}' has no document link ({} child entries)",
                    parent.title(),
                    node.children.len()
                );
                self.report.malformed_branches.push(parent.title().to_owned());
                match self.options.malformed_branch {
                    MalformedBranchPolicy::Skip => return Ok(()),
                    MalformedBranchPolicy::Abort => {
                        return Err(SyncError::MalformedTocBranch {
                            parent: parent.title().to_owned(),
                        });
                    }
                    MalformedBranchPolicy::UseParent => None,
                }
            }
        };

        let children_parent = node.page.clone().unwrap_or_else(|| parent.clone());
        for child in &mut node.children {
            self.sync_node(child, &children_parent)?;
        }
        // Children of an unbound node are ordered with the parent's children.
        if node.page.is_some() {
            self.reorder(&node.children);
        }
        Ok(())
    }

    /// Create or update the page for a link. At most one store call.
    fn upsert(&mut self, link: &TocLink, parent: &PageBinding) -> Result<PageBinding, SyncError> {
        let prepared = match &link.source {
            Some(path) => self.prepare(path)?,
            None => PreparedPage {
                title: link.title.clone(),
                content: String::new(),
                files: Vec::new(),
            },
        };

        let key = title_key(&prepared.title);
        let existing = self.known.get(&key).cloned();
        let mut draft = match &existing {
            Some(page) => PageDraft::update(page),
            None => PageDraft::create(&prepared.title, parent.space()),
        };
        draft.title = prepared.title;
        draft.content = prepared.content;
        draft.space = parent.space().to_owned();
        draft.parent_id = parent.id().cloned();

        let planned = existing.is_none() && self.planned.contains(&key);
        if draft.is_create() && !planned {
            info!("Creating page '{}' below '{}'", draft.title, parent.title());
            self.report.created += 1;
        } else {
            info!("Updating page '{}' below '{}'", draft.title, parent.title());
            self.report.updated += 1;
        }

        let binding = match self.options.mode {
            ExecutionMode::Apply => {
                let stored = self
                    .service
                    .store_page(self.session, &draft)
                    .map_err(SyncError::remote(format!(
                        "store page '{}' below '{}' ({})",
                        draft.title,
                        parent.title(),
                        draft.id.as_ref().map_or("new", PageId::as_str)
                    )))?;
                debug!(id = %stored.id, version = stored.version, "stored page");
                self.known.insert(key, stored.clone());
                PageBinding::Remote(stored)
            }
            ExecutionMode::Simulate => match existing {
                Some(page) => PageBinding::Remote(RemotePage {
                    title: draft.title,
                    parent_id: draft.parent_id,
                    ..page
                }),
                None => {
                    self.planned.insert(key);
                    PageBinding::Planned {
                        title: draft.title,
                        space: draft.space,
                    }
                }
            },
        };

        if !prepared.files.is_empty() {
            self.report.attachments += upload_attachments(
                self.service,
                self.session,
                &binding,
                &prepared.files,
                self.options.mode,
            )?;
        }
        Ok(binding)
    }

    /// Read and convert a topic document.
    fn prepare(&self, path: &Path) -> Result<PreparedPage, SyncError> {
        info!("Processing {}", path.display());
        let bytes = std::fs::read(path).map_err(SyncError::io(path))?;
        let document = Document::from_bytes(&bytes).map_err(SyncError::html(path))?;
        let title = extract_title(document.root()).map_err(SyncError::html(path))?;
        let base_dir = path.parent().unwrap_or(Path::new("/"));
        let page = transform_page(&document, base_dir, &self.options.transform);

        let mut files = page.images;
        files.extend(page.attachments);
        Ok(PreparedPage {
            title,
            content: page.body,
            files,
        })
    }

    /// Move each bound child directly below the previous bound child.
    fn reorder(&mut self, children: &[TocNode]) {
        let mut bound = Vec::new();
        placed_pages(children, &mut bound);
        for pair in bound.windows(2) {
            let (previous, page) = (pair[0], pair[1]);
            let (Some(page_id), Some(target_id), ExecutionMode::Apply) =
                (page.id(), previous.id(), self.options.mode)
            else {
                debug!(
                    "Simulate: move '{}' below '{}'",
                    page.title(),
                    previous.title()
                );
                continue;
            };
            if page_id == target_id {
                continue;
            }

            if let Err(e) = self
                .service
                .move_page(self.session, page_id, target_id, MovePosition::Below)
            {
                error!(
                    "Failed to move '{}' ({page_id}) below '{}' ({target_id}): {e}",
                    page.title(),
                    previous.title()
                );
                self.report.move_failures.push(MoveFailure {
                    page: page.title().to_owned(),
                    page_id: page_id.clone(),
                    target: previous.title().to_owned(),
                    target_id: target_id.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
}

/// Bindings of `children` in TOC order. An unbound child contributes its
/// own children, which were published to the same parent.
fn placed_pages<'n>(children: &'n [TocNode], out: &mut Vec<&'n PageBinding>) {
    for child in children {
        match &child.page {
            Some(page) => out.push(page),
            None => placed_pages(&child.children, out),
        }
    }
}

//! Table of contents model.
//!
//! The TOC document is an XHTML page with nested lists of links. Each `li`
//! becomes a [`TocNode`], each `a` a [`TocLink`] on the innermost enclosing
//! node. The root node stands for the TOC document itself.

use std::collections::{HashMap, HashSet};
use std::fmt::Write;
use std::path::{Path, PathBuf};

use ditapub_confluence::{PageId, RemotePage, title_key};
use ditapub_html::link::{is_absolute_url, normalize_path, resolve_local};
use ditapub_html::{Document, Element, extract_title, normalize_whitespace};

use crate::error::SyncError;

/// Link from a TOC entry to a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocLink {
    /// Absolute path of the linked document; `None` for section entries
    /// without a document.
    pub source: Option<PathBuf>,
    /// Title as shown in the TOC.
    pub title: String,
}

impl TocLink {
    fn document(source: PathBuf, title: String) -> Self {
        Self {
            source: Some(source),
            title,
        }
    }

    fn section(title: String) -> Self {
        Self {
            source: None,
            title,
        }
    }
}

/// Entry of the flattened TOC, one per link in document order.
pub type FlatTocEntry = TocLink;

/// Remote page a node is published to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageBinding {
    /// Page as stored on (or already present in) the service.
    Remote(RemotePage),
    /// Page that a simulated run would have created.
    Planned {
        /// Page title.
        title: String,
        /// Space key.
        space: String,
    },
}

impl PageBinding {
    /// Page title.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Remote(page) => &page.title,
            Self::Planned { title, .. } => title,
        }
    }

    /// Space key.
    #[must_use]
    pub fn space(&self) -> &str {
        match self {
            Self::Remote(page) => &page.space,
            Self::Planned { space, .. } => space,
        }
    }

    /// Page ID, known only for remote pages.
    #[must_use]
    pub fn id(&self) -> Option<&PageId> {
        match self {
            Self::Remote(page) => Some(&page.id),
            Self::Planned { .. } => None,
        }
    }
}

/// Node of the TOC tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TocNode {
    /// Links found directly in this entry. Only the first one is published;
    /// an empty list marks a malformed entry.
    pub links: Vec<TocLink>,
    /// Nested entries in document order.
    pub children: Vec<TocNode>,
    /// Page the node was published to.
    pub page: Option<PageBinding>,
}

impl TocNode {
    /// Link that determines the node's page.
    #[must_use]
    pub fn primary_link(&self) -> Option<&TocLink> {
        self.links.first()
    }
}

/// Parsed table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toc {
    /// Node of the TOC document itself.
    pub root: TocNode,
    /// Every link in document order, starting with the TOC document.
    pub entries: Vec<FlatTocEntry>,
}

impl Toc {
    /// Read and parse a TOC file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a title is
    /// missing.
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let path = std::path::absolute(path).map_err(SyncError::io(path))?;
        let bytes = std::fs::read(&path).map_err(SyncError::io(&path))?;
        let document = Document::from_bytes(&bytes).map_err(SyncError::html(&path))?;
        build_toc(&document, &path)
    }

    /// Case-insensitive keys of every title the TOC publishes.
    #[must_use]
    pub fn desired_titles(&self) -> HashSet<String> {
        self.entries.iter().map(|e| title_key(&e.title)).collect()
    }

    /// Titles that occur more than once, ignoring case, in first-seen order.
    ///
    /// Each repeated title maps to a single page, so later entries overwrite
    /// the page published for earlier ones.
    #[must_use]
    pub fn duplicate_titles(&self) -> Vec<String> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for entry in &self.entries {
            *counts.entry(title_key(&entry.title)).or_default() += 1;
        }
        let mut reported = HashSet::new();
        self.entries
            .iter()
            .filter(|e| {
                let key = title_key(&e.title);
                counts[&key] > 1 && reported.insert(key)
            })
            .map(|e| e.title.clone())
            .collect()
    }

    /// Indented rendering of the tree: one line per node showing the
    /// document path, or the title for section entries.
    #[must_use]
    pub fn outline(&self) -> String {
        let mut out = String::new();
        write_outline(&self.root, 0, &mut out);
        out
    }
}

fn write_outline(node: &TocNode, depth: usize, out: &mut String) {
    let label = match node.primary_link() {
        Some(TocLink {
            source: Some(path), ..
        }) => path.display().to_string(),
        Some(link) => link.title.clone(),
        None => "ERROR: TOC entry without a document link".to_owned(),
    };
    writeln!(out, "{}{label}", "   ".repeat(depth)).ok();
    for child in &node.children {
        write_outline(child, depth + 1, out);
    }
}

/// Build the TOC tree from a parsed TOC document located at `toc_path`.
///
/// # Errors
///
/// Returns [`SyncError::NoTitleFound`] when the document or one of its links
/// has no title.
pub fn build_toc(document: &Document, toc_path: &Path) -> Result<Toc, SyncError> {
    let toc_path = normalize_path(toc_path);
    let title = extract_title(document.root()).map_err(SyncError::html(&toc_path))?;
    let base_dir = toc_path.parent().unwrap_or(Path::new("/")).to_path_buf();

    let root_link = TocLink::document(toc_path.clone(), title);
    let mut builder = TocBuilder {
        toc_path: &toc_path,
        base_dir: &base_dir,
        entries: vec![root_link.clone()],
    };
    let mut root = TocNode {
        links: vec![root_link],
        ..TocNode::default()
    };

    let body = document.body().unwrap_or_else(|| document.root());
    builder.walk(body, &mut root)?;

    Ok(Toc {
        root,
        entries: builder.entries,
    })
}

struct TocBuilder<'a> {
    toc_path: &'a Path,
    base_dir: &'a Path,
    entries: Vec<FlatTocEntry>,
}

impl TocBuilder<'_> {
    fn walk(&mut self, element: &Element, current: &mut TocNode) -> Result<(), SyncError> {
        for child in &element.children {
            if child.is("li") {
                let mut node = TocNode::default();
                if let Some(title) = section_title(child) {
                    self.add_link(&mut node, TocLink::section(title));
                }
                self.walk(child, &mut node)?;
                current.children.push(node);
            } else if child.is("a") {
                let link = self.link(child)?;
                self.add_link(current, link);
            } else {
                self.walk(child, current)?;
            }
        }
        Ok(())
    }

    fn link(&self, anchor: &Element) -> Result<TocLink, SyncError> {
        let title = extract_title(anchor).map_err(SyncError::html(self.toc_path))?;
        Ok(match anchor.attr("href") {
            Some(href) if !href.is_empty() && !is_absolute_url(href) => {
                TocLink::document(resolve_local(self.base_dir, href), title)
            }
            _ => TocLink::section(title),
        })
    }

    fn add_link(&mut self, node: &mut TocNode, link: TocLink) {
        self.entries.push(link.clone());
        node.links.push(link);
    }
}

/// Title of a section entry: an `li` whose leading text is directly
/// followed by a nested list.
fn section_title(item: &Element) -> Option<String> {
    let first = item.children.first()?;
    if !(first.is("ul") || first.is("ol")) {
        return None;
    }
    let title = normalize_whitespace(&item.text);
    (!title.is_empty()).then_some(title)
}

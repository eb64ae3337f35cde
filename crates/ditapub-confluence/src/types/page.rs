//! Confluence page types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Confluence content ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    /// Wrap a content ID returned by the service.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Raw ID string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Page as listed by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePage {
    /// Page ID.
    pub id: PageId,
    /// Page title.
    pub title: String,
    /// Direct parent, `None` for top-level pages of the space.
    pub parent_id: Option<PageId>,
    /// Key of the space holding the page.
    pub space: String,
    /// Current version number.
    pub version: u32,
}

impl RemotePage {
    /// Case-insensitive lookup key of the title.
    #[must_use]
    pub fn title_key(&self) -> String {
        crate::title_key(&self.title)
    }
}

/// Payload for creating or updating a page.
///
/// A draft without `id` creates a new page; with `id` it updates that page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDraft {
    /// ID of the page to update.
    pub id: Option<PageId>,
    /// Page title.
    pub title: String,
    /// Body in storage format.
    pub content: String,
    /// Target space key.
    pub space: String,
    /// Parent page.
    pub parent_id: Option<PageId>,
    /// Version the update is based on.
    pub version: Option<u32>,
    /// Suppress watcher notifications for this update.
    pub minor_edit: bool,
}

impl PageDraft {
    /// Draft for a page that does not exist yet.
    pub fn create(title: impl Into<String>, space: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: String::new(),
            space: space.into(),
            parent_id: None,
            version: None,
            minor_edit: false,
        }
    }

    /// Draft updating an existing page without notifying watchers.
    #[must_use]
    pub fn update(existing: &RemotePage) -> Self {
        Self {
            id: Some(existing.id.clone()),
            title: existing.title.clone(),
            content: String::new(),
            space: existing.space.clone(),
            parent_id: existing.parent_id.clone(),
            version: Some(existing.version),
            minor_edit: true,
        }
    }

    /// Whether storing this draft creates a new page.
    #[must_use]
    pub fn is_create(&self) -> bool {
        self.id.is_none()
    }
}

/// Where a moved page lands relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePosition {
    /// Sibling directly before the target.
    Above,
    /// Sibling directly after the target.
    Below,
    /// Last child of the target.
    Append,
}

impl MovePosition {
    /// Position segment used by the REST move endpoint.
    #[must_use]
    pub fn rest_name(self) -> &'static str {
        match self {
            Self::Above => "before",
            Self::Below => "after",
            Self::Append => "append",
        }
    }
}

impl fmt::Display for MovePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Above => "above",
            Self::Below => "below",
            Self::Append => "append",
        })
    }
}

/// Content item as returned by the REST API.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Content {
    pub id: PageId,
    pub title: String,
    #[serde(default)]
    pub ancestors: Vec<ContentRef>,
    #[serde(default)]
    pub version: Option<Version>,
}

impl Content {
    /// Convert to a [`RemotePage`]; the direct parent is the last ancestor.
    pub(crate) fn into_remote(self, space: &str) -> RemotePage {
        RemotePage {
            parent_id: self.ancestors.last().map(|a| a.id.clone()),
            id: self.id,
            title: self.title,
            space: space.to_owned(),
            version: self.version.map_or(1, |v| v.number),
        }
    }
}

/// Reference to another content item.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub(crate) struct ContentRef {
    pub id: PageId,
}

/// Page version.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Version {
    pub number: u32,
}

/// Paged content listing.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ContentList {
    pub results: Vec<Content>,
}

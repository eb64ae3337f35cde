//! Confluence space types.

use serde::Deserialize;

use super::page::{ContentRef, PageId};

/// Confluence space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Space {
    /// Numeric space ID.
    pub id: u64,
    /// Space key.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Home page of the space.
    pub home_page_id: Option<PageId>,
}

/// Space as returned by the REST API.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SpaceResponse {
    pub id: u64,
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub homepage: Option<ContentRef>,
}

impl From<SpaceResponse> for Space {
    fn from(raw: SpaceResponse) -> Self {
        Self {
            id: raw.id,
            key: raw.key,
            name: raw.name,
            home_page_id: raw.homepage.map(|h| h.id),
        }
    }
}

/// Current user as returned by the REST API.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CurrentUser {
    #[serde(rename = "type")]
    pub kind: String,
}

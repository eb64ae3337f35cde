//! Content service abstraction.
//!
//! The publish workflow talks to Confluence only through [`ContentService`],
//! so it can run against [`ConfluenceClient`](crate::ConfluenceClient) or an
//! in-memory double in tests.

use std::fmt;

use crate::error::ConfluenceError;
use crate::types::{Attachment, AttachmentMeta, MovePosition, PageDraft, PageId, RemotePage, Space};

/// Authenticated session returned by [`ContentService::login`].
#[derive(Clone)]
pub struct Session {
    user: String,
    authorization: String,
}

impl Session {
    /// Create a session from a user name and a ready `Authorization` header value.
    pub fn new(user: impl Into<String>, authorization: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            authorization: authorization.into(),
        }
    }

    /// Logged in user.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// `Authorization` header value.
    #[must_use]
    pub fn authorization(&self) -> &str {
        &self.authorization
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("authorization", &"<redacted>")
            .finish()
    }
}

/// Remote wiki operations needed to publish a page tree.
///
/// Every call is blocking and independent; nothing is transactional.
pub trait ContentService {
    /// Authenticate and open a session.
    fn login(&self, user: &str, password: &str) -> Result<Session, ConfluenceError>;

    /// Fetch space details.
    fn get_space(&self, session: &Session, space_key: &str) -> Result<Space, ConfluenceError>;

    /// List every page of a space with its parent.
    fn list_pages(
        &self,
        session: &Session,
        space_key: &str,
    ) -> Result<Vec<RemotePage>, ConfluenceError>;

    /// Create the page when `draft.id` is absent, update it otherwise.
    fn store_page(&self, session: &Session, draft: &PageDraft)
    -> Result<RemotePage, ConfluenceError>;

    /// Delete a page.
    fn remove_page(&self, session: &Session, page_id: &PageId) -> Result<(), ConfluenceError>;

    /// Move a page relative to a target page.
    fn move_page(
        &self,
        session: &Session,
        page_id: &PageId,
        target_id: &PageId,
        position: MovePosition,
    ) -> Result<(), ConfluenceError>;

    /// Add an attachment to a page, creating a new version if the name exists.
    fn add_attachment(
        &self,
        session: &Session,
        page_id: &PageId,
        meta: &AttachmentMeta,
        data: &[u8],
    ) -> Result<Attachment, ConfluenceError>;
}

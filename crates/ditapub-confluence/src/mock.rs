//! In-memory content service for testing.
//!
//! Provides [`MockService`] for exercising the publish workflow without a
//! Confluence server.

use std::collections::HashSet;
use std::sync::RwLock;

use crate::error::ConfluenceError;
use crate::service::{ContentService, Session};
use crate::title_key;
use crate::types::{Attachment, AttachmentMeta, MovePosition, PageDraft, PageId, RemotePage, Space};

/// Mutating call recorded by [`MockService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    /// A page was created.
    Create(String),
    /// A page was updated.
    Update {
        /// Updated page.
        id: PageId,
        /// Title after the update.
        title: String,
        /// Whether the update was a minor edit.
        minor_edit: bool,
    },
    /// A page was removed.
    Remove(PageId),
    /// A page was moved.
    Move {
        /// Moved page.
        page: PageId,
        /// Target page.
        target: PageId,
        /// Position relative to the target.
        position: MovePosition,
    },
    /// An attachment was added.
    Attach {
        /// Page receiving the attachment.
        page: PageId,
        /// Attachment file name.
        file_name: String,
    },
}

/// Mock content service for testing.
///
/// Pages live in a single list whose order is the sibling order. Titles are
/// unique per space ignoring case, like on a real server. Use the builder
/// methods to seed pages and inject failures.
///
/// # Example
///
/// ```ignore
/// use ditapub_confluence::{ContentService, MockService};
///
/// let service = MockService::new("DOC")
///     .with_page("1", "Home", None)
///     .with_page("2", "Manual", Some("1"));
///
/// let session = service.login("user", "pass")?;
/// let pages = service.list_pages(&session, "DOC")?;
/// ```
#[derive(Debug)]
pub struct MockService {
    space: Space,
    password: Option<String>,
    pages: RwLock<Vec<RemotePage>>,
    next_id: RwLock<u64>,
    calls: RwLock<Vec<MockCall>>,
    failing_moves: RwLock<HashSet<PageId>>,
    failing_removals: RwLock<HashSet<PageId>>,
}

impl MockService {
    /// Create an empty mock holding a single space.
    #[must_use]
    pub fn new(space_key: impl Into<String>) -> Self {
        let key = space_key.into();
        Self {
            space: Space {
                id: 1,
                name: format!("{key} space"),
                key,
                home_page_id: None,
            },
            password: None,
            pages: RwLock::new(Vec::new()),
            next_id: RwLock::new(1000),
            calls: RwLock::new(Vec::new()),
            failing_moves: RwLock::new(HashSet::new()),
            failing_removals: RwLock::new(HashSet::new()),
        }
    }

    /// Add a page to the space.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(self, id: &str, title: &str, parent: Option<&str>) -> Self {
        self.pages.write().unwrap().push(RemotePage {
            id: PageId::new(id),
            title: title.to_owned(),
            parent_id: parent.map(PageId::new),
            space: self.space.key.clone(),
            version: 1,
        });
        self
    }

    /// Make a page the home page of the space.
    #[must_use]
    pub fn with_home_page(mut self, id: &str) -> Self {
        self.space.home_page_id = Some(PageId::new(id));
        self
    }

    /// Only accept this password on login.
    #[must_use]
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_owned());
        self
    }

    /// Make every move of the given page fail.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failing_move(self, id: &str) -> Self {
        self.failing_moves.write().unwrap().insert(PageId::new(id));
        self
    }

    /// Make removal of the given page fail.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failing_removal(self, id: &str) -> Self {
        self.failing_removals
            .write()
            .unwrap()
            .insert(PageId::new(id));
        self
    }

    /// Current pages in sibling order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn pages(&self) -> Vec<RemotePage> {
        self.pages.read().unwrap().clone()
    }

    /// Find a page by title, ignoring case.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn page_by_title(&self, title: &str) -> Option<RemotePage> {
        let key = title_key(title);
        self.pages
            .read()
            .unwrap()
            .iter()
            .find(|p| p.title_key() == key)
            .cloned()
    }

    /// Titles of the children of a page, in sibling order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn child_titles(&self, parent: &PageId) -> Vec<String> {
        self.pages
            .read()
            .unwrap()
            .iter()
            .filter(|p| p.parent_id.as_ref() == Some(parent))
            .map(|p| p.title.clone())
            .collect()
    }

    /// All recorded mutating calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of pages created so far.
    pub fn create_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, MockCall::Create(_)))
            .count()
    }

    /// Forget recorded calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }

    fn record(&self, call: MockCall) {
        self.calls.write().unwrap().push(call);
    }

    fn check_session(&self, session: &Session) -> Result<(), ConfluenceError> {
        if session.authorization().starts_with("Mock ") {
            Ok(())
        } else {
            Err(ConfluenceError::HttpResponse {
                status: 401,
                body: "not logged in".to_owned(),
            })
        }
    }

    fn check_space(&self, space_key: &str) -> Result<(), ConfluenceError> {
        if space_key == self.space.key {
            Ok(())
        } else {
            Err(ConfluenceError::NotFound(format!("space {space_key}")))
        }
    }

    fn title_taken(pages: &[RemotePage], title: &str, except: Option<&PageId>) -> bool {
        let key = title_key(title);
        pages
            .iter()
            .any(|p| p.title_key() == key && Some(&p.id) != except)
    }

    fn position_of(pages: &[RemotePage], id: &PageId) -> Result<usize, ConfluenceError> {
        pages
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| ConfluenceError::NotFound(format!("page {id}")))
    }
}

impl ContentService for MockService {
    fn login(&self, user: &str, password: &str) -> Result<Session, ConfluenceError> {
        match &self.password {
            Some(expected) if expected != password => {
                Err(ConfluenceError::Authentication(user.to_owned()))
            }
            _ => Ok(Session::new(user, format!("Mock {user}"))),
        }
    }

    fn get_space(&self, session: &Session, space_key: &str) -> Result<Space, ConfluenceError> {
        self.check_session(session)?;
        self.check_space(space_key)?;
        Ok(self.space.clone())
    }

    fn list_pages(
        &self,
        session: &Session,
        space_key: &str,
    ) -> Result<Vec<RemotePage>, ConfluenceError> {
        self.check_session(session)?;
        self.check_space(space_key)?;
        Ok(self.pages())
    }

    fn store_page(
        &self,
        session: &Session,
        draft: &PageDraft,
    ) -> Result<RemotePage, ConfluenceError> {
        self.check_session(session)?;
        self.check_space(&draft.space)?;
        let mut pages = self.pages.write().unwrap();

        if Self::title_taken(&pages, &draft.title, draft.id.as_ref()) {
            return Err(ConfluenceError::HttpResponse {
                status: 400,
                body: format!(
                    "A page with this title already exists: '{}'",
                    draft.title
                ),
            });
        }

        let stored = if let Some(id) = &draft.id {
            let index = Self::position_of(&pages, id)?;
            let page = &mut pages[index];
            page.title.clone_from(&draft.title);
            page.parent_id.clone_from(&draft.parent_id);
            page.version += 1;
            page.clone()
        } else {
            let mut next_id = self.next_id.write().unwrap();
            *next_id += 1;
            let page = RemotePage {
                id: PageId::new(next_id.to_string()),
                title: draft.title.clone(),
                parent_id: draft.parent_id.clone(),
                space: draft.space.clone(),
                version: 1,
            };
            pages.push(page.clone());
            page
        };
        drop(pages);

        self.record(if draft.is_create() {
            MockCall::Create(stored.title.clone())
        } else {
            MockCall::Update {
                id: stored.id.clone(),
                title: stored.title.clone(),
                minor_edit: draft.minor_edit,
            }
        });
        Ok(stored)
    }

    fn remove_page(&self, session: &Session, page_id: &PageId) -> Result<(), ConfluenceError> {
        self.check_session(session)?;
        if self.failing_removals.read().unwrap().contains(page_id) {
            return Err(ConfluenceError::HttpResponse {
                status: 403,
                body: format!("not permitted to remove {page_id}"),
            });
        }

        let mut pages = self.pages.write().unwrap();
        let index = Self::position_of(&pages, page_id)?;
        let removed = pages.remove(index);
        // Children of a removed page move up to its parent, as in the trash.
        for page in pages.iter_mut() {
            if page.parent_id.as_ref() == Some(&removed.id) {
                page.parent_id.clone_from(&removed.parent_id);
            }
        }
        drop(pages);

        self.record(MockCall::Remove(page_id.clone()));
        Ok(())
    }

    fn move_page(
        &self,
        session: &Session,
        page_id: &PageId,
        target_id: &PageId,
        position: MovePosition,
    ) -> Result<(), ConfluenceError> {
        self.check_session(session)?;
        if self.failing_moves.read().unwrap().contains(page_id) {
            return Err(ConfluenceError::HttpResponse {
                status: 500,
                body: format!("cannot move {page_id}"),
            });
        }

        let mut pages = self.pages.write().unwrap();
        let index = Self::position_of(&pages, page_id)?;
        let mut page = pages.remove(index);
        let target_index = match Self::position_of(&pages, target_id) {
            Ok(i) => i,
            Err(e) => {
                pages.insert(index, page);
                return Err(e);
            }
        };

        let insert_at = match position {
            MovePosition::Above => {
                page.parent_id.clone_from(&pages[target_index].parent_id);
                target_index
            }
            MovePosition::Below => {
                page.parent_id.clone_from(&pages[target_index].parent_id);
                target_index + 1
            }
            MovePosition::Append => {
                page.parent_id = Some(target_id.clone());
                pages.len()
            }
        };
        pages.insert(insert_at, page);
        drop(pages);

        self.record(MockCall::Move {
            page: page_id.clone(),
            target: target_id.clone(),
            position,
        });
        Ok(())
    }

    fn add_attachment(
        &self,
        session: &Session,
        page_id: &PageId,
        meta: &AttachmentMeta,
        _data: &[u8],
    ) -> Result<Attachment, ConfluenceError> {
        self.check_session(session)?;
        Self::position_of(&self.pages.read().unwrap(), page_id)?;

        self.record(MockCall::Attach {
            page: page_id.clone(),
            file_name: meta.file_name.clone(),
        });
        Ok(Attachment {
            id: format!("att-{page_id}-{}", meta.file_name),
            title: meta.file_name.clone(),
        })
    }
}

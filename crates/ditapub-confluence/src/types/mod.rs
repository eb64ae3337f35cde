//! Confluence API types.

mod attachment;
mod page;
mod space;

pub use attachment::{Attachment, AttachmentMeta};
pub use page::{MovePosition, PageDraft, PageId, RemotePage};
pub use space::Space;

pub(crate) use attachment::AttachmentsResponse;
pub(crate) use page::{Content, ContentList};
pub(crate) use space::{CurrentUser, SpaceResponse};

//! Confluence attachment types.

use serde::Deserialize;

/// Confluence attachment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Attachment {
    /// Attachment ID.
    pub id: String,
    /// Attachment title/filename.
    pub title: String,
}

/// File name and media type of an attachment upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentMeta {
    /// Name the attachment is stored under.
    pub file_name: String,
    /// MIME type of the payload.
    pub content_type: String,
}

/// Attachments API response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AttachmentsResponse {
    pub results: Vec<Attachment>,
}

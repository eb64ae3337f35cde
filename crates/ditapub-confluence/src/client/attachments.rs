//! Attachment operations for Confluence API.

use rand::RngExt;
use tracing::info;

use super::{ConfluenceClient, checked_body};
use crate::error::ConfluenceError;
use crate::service::Session;
use crate::types::{Attachment, AttachmentMeta, AttachmentsResponse, PageId};

impl ConfluenceClient {
    /// Upload an attachment, adding a new version when the filename exists.
    ///
    /// Uses `PUT .../child/attachment`, which creates or updates by filename,
    /// so no lookup of existing attachments is needed.
    pub(crate) fn upload_attachment(
        &self,
        session: &Session,
        page_id: &PageId,
        meta: &AttachmentMeta,
        data: &[u8],
    ) -> Result<Attachment, ConfluenceError> {
        let url = format!("{}/content/{}/child/attachment", self.api_url(), page_id);

        info!(
            "Uploading attachment '{}' ({} bytes) to page {}",
            meta.file_name,
            data.len(),
            page_id
        );

        let boundary = format!(
            "----DitapubFormBoundary{:016x}",
            rand::rng().random::<u64>()
        );
        let body = multipart_body(&boundary, meta, data);

        let response = self
            .agent
            .put(&url)
            .header("Authorization", session.authorization())
            .header(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .header("X-Atlassian-Token", "nocheck")
            .header("Accept", "application/json")
            .send(&body[..])?;

        let response: AttachmentsResponse = checked_body(response)?.read_json()?;
        response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ConfluenceError::HttpResponse {
                status: 200,
                body: "Empty attachment response".to_owned(),
            })
    }
}

/// Build a single-file `multipart/form-data` body.
fn multipart_body(boundary: &str, meta: &AttachmentMeta, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + 256);

    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            meta.file_name.replace('"', "%22")
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", meta.content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");

    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"minorEdit\"\r\n\r\n");
    body.extend_from_slice(b"true\r\n");

    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

//! Attachment upload.

use ditapub_confluence::{AttachmentMeta, ContentService, Session};
use ditapub_html::AttachmentRef;
use tracing::info;

use crate::error::SyncError;
use crate::mode::ExecutionMode;
use crate::toc::PageBinding;

/// Upload local files to a page.
///
/// Each file is read completely and sent with a content type guessed from
/// its extension. Existing attachments with the same name get a new
/// version. Files are read in both modes, so a dry run reports missing
/// files too. Returns the number of files uploaded (or that would have
/// been).
///
/// # Errors
///
/// Returns an error when a file cannot be read or an upload fails.
pub fn upload_attachments<S: ContentService + ?Sized>(
    service: &S,
    session: &Session,
    page: &PageBinding,
    refs: &[AttachmentRef],
    mode: ExecutionMode,
) -> Result<usize, SyncError> {
    for attachment in refs {
        let data = std::fs::read(&attachment.path).map_err(SyncError::io(&attachment.path))?;
        let meta = AttachmentMeta {
            file_name: attachment.name.clone(),
            content_type: mime_guess::from_path(&attachment.path)
                .first_or_octet_stream()
                .to_string(),
        };

        match (mode, page.id()) {
            (ExecutionMode::Apply, Some(page_id)) => {
                info!(
                    "Uploading {} to '{}'",
                    attachment.path.display(),
                    page.title()
                );
                service
                    .add_attachment(session, page_id, &meta, &data)
                    .map_err(SyncError::remote(format!(
                        "upload '{}' to page '{}'",
                        meta.file_name,
                        page.title()
                    )))?;
            }
            _ => info!(
                "Simulate: upload {} ({}, {} bytes) to '{}'",
                attachment.path.display(),
                meta.content_type,
                data.len(),
                page.title()
            ),
        }
    }
    Ok(refs.len())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use ditapub_confluence::{MockCall, MockService, PageId, RemotePage};
    use pretty_assertions::assert_eq;

    use super::*;

    fn remote_page() -> PageBinding {
        PageBinding::Remote(RemotePage {
            id: PageId::new("7"),
            title: "Setup".to_owned(),
            parent_id: None,
            space: "DOC".to_owned(),
            version: 1,
        })
    }

    fn attachment(dir: &Path, name: &str) -> AttachmentRef {
        let path = dir.join(name);
        std::fs::write(&path, b"data").unwrap();
        AttachmentRef {
            path,
            name: name.to_owned(),
        }
    }

    #[test]
    fn test_uploads_each_file() {
        let dir = tempfile::tempdir().unwrap();
        let service = MockService::new("DOC").with_page("7", "Setup", None);
        let session = service.login("u", "p").unwrap();
        let refs = vec![
            attachment(dir.path(), "diagram.png"),
            attachment(dir.path(), "sample.conf"),
        ];

        let count =
            upload_attachments(&service, &session, &remote_page(), &refs, ExecutionMode::Apply)
                .unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            service.calls(),
            vec![
                MockCall::Attach {
                    page: PageId::new("7"),
                    file_name: "diagram.png".to_owned(),
                },
                MockCall::Attach {
                    page: PageId::new("7"),
                    file_name: "sample.conf".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn test_simulate_reads_but_does_not_upload() {
        let dir = tempfile::tempdir().unwrap();
        let service = MockService::new("DOC");
        let session = service.login("u", "p").unwrap();
        let planned = PageBinding::Planned {
            title: "New".to_owned(),
            space: "DOC".to_owned(),
        };
        let refs = vec![attachment(dir.path(), "a.png")];

        let count =
            upload_attachments(&service, &session, &planned, &refs, ExecutionMode::Simulate)
                .unwrap();

        assert_eq!(count, 1);
        assert!(service.calls().is_empty());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let service = MockService::new("DOC").with_page("7", "Setup", None);
        let session = service.login("u", "p").unwrap();
        let refs = vec![AttachmentRef {
            path: "/nonexistent/a.png".into(),
            name: "a.png".to_owned(),
        }];

        let err = upload_attachments(&service, &session, &remote_page(), &refs, ExecutionMode::Apply)
            .unwrap_err();

        assert!(matches!(err, SyncError::Io { .. }));
    }

    #[test]
    fn test_content_type_is_guessed() {
        assert_eq!(
            mime_guess::from_path("a.png").first_or_octet_stream().to_string(),
            "image/png"
        );
        assert_eq!(
            mime_guess::from_path("a.unknownext")
                .first_or_octet_stream()
                .to_string(),
            "application/octet-stream"
        );
    }
}

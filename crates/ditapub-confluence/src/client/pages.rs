//! Page operations for Confluence API.

use serde_json::{Value, json};
use tracing::{debug, info};

use super::{ConfluenceClient, checked_body, encode};
use crate::error::ConfluenceError;
use crate::service::Session;
use crate::types::{Content, ContentList, MovePosition, PageDraft, PageId, RemotePage};

/// Page size used when listing space content.
const LIST_LIMIT: usize = 100;

impl ConfluenceClient {
    /// List all pages in a space, following pagination.
    pub(crate) fn fetch_space_pages(
        &self,
        session: &Session,
        space_key: &str,
    ) -> Result<Vec<RemotePage>, ConfluenceError> {
        let mut pages = Vec::new();
        let mut start = 0;

        loop {
            let url = format!(
                "{}/content?spaceKey={}&type=page&expand=ancestors,version&limit={LIST_LIMIT}&start={start}",
                self.api_url(),
                encode(space_key)
            );

            debug!("Listing pages of {} from offset {}", space_key, start);

            let response = self
                .agent
                .get(&url)
                .header("Authorization", session.authorization())
                .header("Accept", "application/json")
                .call()?;

            let batch: ContentList = checked_body(response)?.read_json()?;
            let count = batch.results.len();
            pages.extend(batch.results.into_iter().map(|c| c.into_remote(space_key)));

            if count < LIST_LIMIT {
                break;
            }
            start += count;
        }

        info!("Found {} pages in space {}", pages.len(), space_key);
        Ok(pages)
    }

    /// Create a new page.
    pub(crate) fn create_page(
        &self,
        session: &Session,
        draft: &PageDraft,
    ) -> Result<RemotePage, ConfluenceError> {
        let url = format!("{}/content", self.api_url());
        let payload = content_payload(draft);

        info!("Creating page '{}' in space {}", draft.title, draft.space);

        let payload_bytes = serde_json::to_vec(&payload)?;
        let response = self
            .agent
            .post(&url)
            .header("Authorization", session.authorization())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        let content: Content = checked_body(response)?.read_json()?;
        Ok(stored_page(content, draft))
    }

    /// Update existing page (auto-increments version).
    pub(crate) fn update_page(
        &self,
        session: &Session,
        page_id: &PageId,
        draft: &PageDraft,
    ) -> Result<RemotePage, ConfluenceError> {
        let url = format!("{}/content/{}", self.api_url(), page_id);
        let version = draft.version.unwrap_or(1);

        let mut payload = content_payload(draft);
        payload["id"] = json!(page_id);
        payload["version"] = json!({
            "number": version + 1,
            "minorEdit": draft.minor_edit,
        });

        info!(
            "Updating page {} from version {} to {}",
            page_id,
            version,
            version + 1
        );

        let payload_bytes = serde_json::to_vec(&payload)?;
        let response = self
            .agent
            .put(&url)
            .header("Authorization", session.authorization())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        let content: Content = checked_body(response)?.read_json()?;
        Ok(stored_page(content, draft))
    }

    /// Delete a page (moves it to the space trash).
    pub(crate) fn delete_page(
        &self,
        session: &Session,
        page_id: &PageId,
    ) -> Result<(), ConfluenceError> {
        let url = format!("{}/content/{}", self.api_url(), page_id);

        info!("Deleting page {}", page_id);

        let response = self
            .agent
            .delete(&url)
            .header("Authorization", session.authorization())
            .header("Accept", "application/json")
            .call()?;

        checked_body(response)?;
        Ok(())
    }

    /// Move a page relative to a target page.
    pub(crate) fn relocate_page(
        &self,
        session: &Session,
        page_id: &PageId,
        target_id: &PageId,
        position: MovePosition,
    ) -> Result<(), ConfluenceError> {
        let url = format!(
            "{}/content/{}/move/{}/{}",
            self.api_url(),
            page_id,
            position.rest_name(),
            target_id
        );

        debug!("Moving page {} {} page {}", page_id, position, target_id);

        let response = self
            .agent
            .put(&url)
            .header("Authorization", session.authorization())
            .header("X-Atlassian-Token", "nocheck")
            .header("Accept", "application/json")
            .send_empty()?;

        checked_body(response)?;
        Ok(())
    }
}

/// JSON body shared by create and update requests.
fn content_payload(draft: &PageDraft) -> Value {
    let mut payload = json!({
        "type": "page",
        "title": draft.title,
        "space": {"key": draft.space},
        "body": {
            "storage": {
                "value": draft.content,
                "representation": "storage"
            }
        }
    });

    if let Some(parent) = &draft.parent_id {
        payload["ancestors"] = json!([{"id": parent}]);
    }

    payload
}

/// Build the stored page from the response, keeping the requested placement.
fn stored_page(content: Content, draft: &PageDraft) -> RemotePage {
    let mut page = content.into_remote(&draft.space);
    if draft.parent_id.is_some() {
        page.parent_id.clone_from(&draft.parent_id);
    }
    page
}

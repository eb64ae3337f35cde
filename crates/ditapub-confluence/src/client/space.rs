//! Authentication and space operations for Confluence API.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::info;

use super::{ConfluenceClient, checked_body, encode};
use crate::error::ConfluenceError;
use crate::service::Session;
use crate::types::{CurrentUser, Space, SpaceResponse};

impl ConfluenceClient {
    /// Verify credentials against the current-user endpoint.
    ///
    /// Confluence answers bad basic credentials on some versions with an
    /// anonymous user instead of 401, so the user type is checked too.
    pub(crate) fn authenticate(
        &self,
        user: &str,
        password: &str,
    ) -> Result<Session, ConfluenceError> {
        let token = STANDARD.encode(format!("{user}:{password}"));
        let session = Session::new(user, format!("Basic {token}"));

        let url = format!("{}/user/current", self.api_url());
        info!("Logging in to {} as {}", self.base_url, user);

        let response = self
            .agent
            .get(&url)
            .header("Authorization", session.authorization())
            .header("Accept", "application/json")
            .call()?;

        let current: CurrentUser = match checked_body(response) {
            Ok(mut body) => body.read_json()?,
            Err(ConfluenceError::HttpResponse { status: 401 | 403, .. }) => {
                return Err(ConfluenceError::Authentication(user.to_owned()));
            }
            Err(e) => return Err(e),
        };

        if current.kind == "anonymous" {
            return Err(ConfluenceError::Authentication(user.to_owned()));
        }

        Ok(session)
    }

    /// Get space with its home page.
    pub(crate) fn fetch_space(
        &self,
        session: &Session,
        space_key: &str,
    ) -> Result<Space, ConfluenceError> {
        let url = format!(
            "{}/space/{}?expand=homepage",
            self.api_url(),
            encode(space_key)
        );

        info!("Getting space {}", space_key);

        let response = self
            .agent
            .get(&url)
            .header("Authorization", session.authorization())
            .header("Accept", "application/json")
            .call()?;

        let space: SpaceResponse = match checked_body(response) {
            Ok(mut body) => body.read_json()?,
            Err(ConfluenceError::HttpResponse { status: 404, .. }) => {
                return Err(ConfluenceError::NotFound(format!("space {space_key}")));
            }
            Err(e) => return Err(e),
        };

        Ok(space.into())
    }
}

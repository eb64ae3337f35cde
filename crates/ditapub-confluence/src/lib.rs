//! Confluence integration for ditapub.
//!
//! This crate provides:
//! - [`ContentService`]: the remote operations the publish workflow needs
//! - [`ConfluenceClient`]: REST API implementation with basic authentication
//! - [`MockService`]: in-memory implementation (feature `mock`)
//!
//! # API Client
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::time::Duration;
//! use ditapub_confluence::{ConfluenceClient, ContentService};
//!
//! let client = ConfluenceClient::new(
//!     "https://confluence.example.com",
//!     Duration::from_secs(30),
//!     None,
//! )?;
//! let session = client.login("publisher", "secret")?;
//! let pages = client.list_pages(&session, "DOC")?;
//! # Ok(())
//! # }
//! ```

// API client
mod client;
pub use client::ConfluenceClient;

// Service abstraction
mod service;
pub use service::{ContentService, Session};

// Types
mod types;
pub use types::{Attachment, AttachmentMeta, MovePosition, PageDraft, PageId, RemotePage, Space};

// Errors
pub mod error;
pub use error::ConfluenceError;

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{MockCall, MockService};

/// Case-insensitive comparison key for page titles.
///
/// Confluence treats titles that differ only in case as the same page.
#[must_use]
pub fn title_key(title: &str) -> String {
    title.to_lowercase()
}

//! TOC-driven publishing of an XHTML document set to Confluence.
//!
//! The TOC page defines the page hierarchy. A run matches it against the
//! pages already in the space (by title, ignoring case), resolves titles
//! blocked elsewhere in the space, reports or deletes pages the TOC dropped,
//! and then creates or updates every page top-down with its attachments.
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use std::time::Duration;
//! use ditapub_confluence::{ConfluenceClient, ContentService, RemotePage};
//! use ditapub_sync::{ConflictAction, OperatorPrompt, PublishOptions, Publisher, Toc};
//!
//! struct Cautious;
//!
//! impl OperatorPrompt for Cautious {
//!     fn confirm(&mut self, _question: &str) -> std::io::Result<bool> {
//!         Ok(false)
//!     }
//!
//!     fn resolve_conflict(&mut self, _page: &RemotePage) -> std::io::Result<ConflictAction> {
//!         Ok(ConflictAction::Skip)
//!     }
//! }
//!
//! let client = ConfluenceClient::new("https://confluence.example.com", Duration::from_secs(30), None)?;
//! let session = client.login("publisher", "secret")?;
//! let mut toc = Toc::load(Path::new("out/index.html"))?;
//! let options = PublishOptions {
//!     space: "DOC".to_owned(),
//!     root_page: "Product Manual".to_owned(),
//!     ..PublishOptions::default()
//! };
//!
//! let report = Publisher::new(&client, &session, &options).publish(&mut toc, &mut Cautious)?;
//! println!("{} pages created", report.sync.created);
//! # Ok(())
//! # }
//! ```

mod attachments;
mod conflict;
mod deletion;
pub mod error;
mod inventory;
mod mode;
mod publish;
mod toc;
mod tree;

pub use attachments::upload_attachments;
pub use conflict::{ConflictAction, OperatorPrompt, resolve_conflicts};
pub use deletion::{DeletionFailure, DeletionReport, delete_pages};
pub use error::SyncError;
pub use inventory::{Inventory, conflicts_with, descendants_of, obsolete_among};
pub use mode::ExecutionMode;
pub use publish::{PublishOptions, PublishReport, Publisher};
pub use toc::{FlatTocEntry, PageBinding, Toc, TocLink, TocNode, build_toc};
pub use tree::{MoveFailure, SyncOptions, SyncReport, TreeSync};

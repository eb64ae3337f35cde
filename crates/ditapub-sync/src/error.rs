//! Error types for publishing.

use std::io;
use std::path::PathBuf;

use ditapub_confluence::ConfluenceError;
use ditapub_html::HtmlError;

/// Error while publishing a TOC to Confluence.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SyncError {
    /// A document or TOC link has no usable title.
    #[error("no title found in {}", path.display())]
    NoTitleFound {
        /// Document that was inspected.
        path: PathBuf,
    },

    /// A TOC list item has no link, and the policy is to abort.
    #[error("TOC entry below '{parent}' has no document link")]
    MalformedTocBranch {
        /// Title of the page the entry would have been created under.
        parent: String,
    },

    /// The configured root page does not exist in the space.
    #[error("root page '{0}' not found")]
    RootPageNotFound(String),

    /// The TOC wants the title of the publish root itself.
    #[error("TOC uses the title of root page '{0}'; rename the root or the TOC entry")]
    RootTitleInToc(String),

    /// The operator aborted while resolving title conflicts.
    #[error("aborted because of conflicting pages: {}", titles.join(", "))]
    ConflictingTitle {
        /// Titles of the conflicting pages.
        titles: Vec<String>,
    },

    /// A remote call failed.
    #[error("{operation}: {source}")]
    Remote {
        /// What was being done, including the page involved.
        operation: String,
        /// Underlying error.
        #[source]
        source: ConfluenceError,
    },

    /// A local file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// A document could not be parsed.
    #[error("cannot parse {}: {source}", path.display())]
    Html {
        /// Document that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: HtmlError,
    },

    /// Reading an operator answer failed.
    #[error("prompt failed: {0}")]
    Prompt(#[source] io::Error),
}

impl SyncError {
    /// Adapter for `map_err` on remote calls.
    pub(crate) fn remote(operation: impl Into<String>) -> impl FnOnce(ConfluenceError) -> Self {
        let operation = operation.into();
        move |source| Self::Remote { operation, source }
    }

    /// Attach a document path to an HTML error.
    pub(crate) fn html(path: impl Into<PathBuf>) -> impl FnOnce(HtmlError) -> Self {
        let path = path.into();
        move |source| match source {
            HtmlError::NoTitleFound => Self::NoTitleFound { path },
            source => Self::Html { path, source },
        }
    }

    /// Attach a file path to an I/O error.
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

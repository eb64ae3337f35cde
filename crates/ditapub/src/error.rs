//! CLI error types.

use std::path::PathBuf;

use ditapub_config::ConfigError;
use ditapub_confluence::ConfluenceError;
use ditapub_sync::SyncError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("TOC file not found: {}", .0.display())]
    TocNotFound(PathBuf),

    #[error("invalid TOC file: {0}")]
    InvalidToc(#[source] SyncError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Confluence(#[from] ConfluenceError),

    #[error("{0}")]
    Sync(#[from] SyncError),
}

impl CliError {
    /// Process exit code: 2 for a missing or invalid TOC and a missing root
    /// page, 1 otherwise.
    pub(crate) fn exit_code(&self) -> u8 {
        match self {
            Self::TocNotFound(_)
            | Self::InvalidToc(_)
            | Self::Sync(SyncError::RootPageNotFound(_)) => 2,
            _ => 1,
        }
    }
}

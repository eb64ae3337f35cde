//! CLI command implementations.

mod outline;
mod publish;

use std::path::PathBuf;

use ditapub_sync::Toc;

pub(crate) use outline::OutlineArgs;
pub(crate) use publish::PublishArgs;

use crate::error::CliError;

/// Load the TOC, reporting a missing file separately from a broken one.
fn load_toc(path: PathBuf) -> Result<Toc, CliError> {
    if !path.is_file() {
        return Err(CliError::TocNotFound(path));
    }
    Toc::load(&path).map_err(CliError::InvalidToc)
}

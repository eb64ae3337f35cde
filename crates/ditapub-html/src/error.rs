//! Error types for HTML processing.

use std::str::Utf8Error;

/// Error while parsing or interpreting a document.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum HtmlError {
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    /// Encoding error during XML parsing.
    #[error("encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// Input is not valid UTF-8.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] Utf8Error),

    /// Neither a `DC.Title` meta, a `title` element nor link text was found.
    #[error("no title found")]
    NoTitleFound,
}

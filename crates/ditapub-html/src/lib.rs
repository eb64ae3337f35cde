//! XHTML handling for ditapub.
//!
//! Parses DITA-generated XHTML into a small element tree, finds page titles
//! and converts topic bodies into Confluence storage format.
//!
//! ```
//! use std::path::Path;
//! use ditapub_html::{Document, TransformOptions, extract_title, transform_page};
//!
//! let document = Document::parse(
//!     r#"<html><head><title>Setup</title></head>
//!     <body><h1>Setup</h1><p><img src="img/flow.png"/></p></body></html>"#,
//! )?;
//! assert_eq!(extract_title(document.root())?, "Setup");
//!
//! let page = transform_page(&document, Path::new("/docs"), &TransformOptions::default());
//! assert_eq!(page.images[0].name, "flow.png");
//! # Ok::<(), ditapub_html::HtmlError>(())
//! ```

pub mod dom;
pub mod error;
pub mod link;
mod text;
mod title;
mod transform;

pub use dom::{Document, Element};
pub use error::HtmlError;
pub use text::normalize_whitespace;
pub use title::extract_title;
pub use transform::{AttachmentRef, TransformOptions, TransformedPage, transform_page};

//! Conversion of topic XHTML into Confluence storage format.
//!
//! Rewrites applied, in order:
//! 1. `kbd` becomes `span`, keeping only `class`
//! 2. `img` becomes `ac:image` referencing an attachment (or a URL)
//! 3. cross-reference links to local files become attachment links
//! 4. other local links become page links titled after their label
//! 5. the first `h1` is dropped, as Confluence shows the page title itself

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::dom::{Document, Element, serialize_children};
use crate::link::{file_name, is_absolute_url, is_fragment_only, resolve_local};
use crate::text::normalize_whitespace;

/// Transformation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    /// Class prefix marking cross-reference links to attached files.
    pub xref_class: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            xref_class: "xref".to_owned(),
        }
    }
}

/// Local file referenced by a page, to be uploaded as an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Attachment name (the file's base name).
    pub name: String,
}

/// Result of [`transform_page`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedPage {
    /// Storage-format markup of the page body.
    pub body: String,
    /// Files referenced by cross-reference links.
    pub attachments: Vec<AttachmentRef>,
    /// Files referenced by images.
    pub images: Vec<AttachmentRef>,
}

/// Convert a topic document to storage format.
///
/// Relative references resolve against `base_dir`, the directory of the
/// topic file. Nothing is read from disk. Documents without a `body` are
/// converted as a whole.
#[must_use]
pub fn transform_page(
    document: &Document,
    base_dir: &Path,
    options: &TransformOptions,
) -> TransformedPage {
    let mut body = document
        .body()
        .unwrap_or_else(|| document.root())
        .clone();

    rename_kbd(&mut body);
    let images = rewrite_images(&mut body, base_dir);
    let attachments = rewrite_xrefs(&mut body, base_dir, &options.xref_class);
    rewrite_page_links(&mut body);
    body.remove_first("h1");

    TransformedPage {
        body: serialize_children(&body),
        attachments,
        images,
    }
}

fn rename_kbd(body: &mut Element) {
    body.visit_mut(&mut |element: &mut Element| {
        if element.is("kbd") {
            "span".clone_into(&mut element.tag);
            element.attrs.retain(|(key, _)| key == "class");
        }
    });
}

fn rewrite_images(body: &mut Element, base_dir: &Path) -> Vec<AttachmentRef> {
    let mut images = Vec::new();
    body.replace_with(&mut |element: &Element| {
        if !element.is("img") {
            return None;
        }
        let src = element.attr("src").filter(|src| !src.is_empty())?;
        let target = if is_absolute_url(src) {
            Element::new("ri:url").with_attr("ri:value", src)
        } else {
            let image = AttachmentRef {
                path: resolve_local(base_dir, src),
                name: file_name(src),
            };
            let target = Element::new("ri:attachment").with_attr("ri:filename", &image.name);
            images.push(image);
            target
        };
        Some(Element::new("ac:image").with_children(vec![target]))
    });
    images
}

fn rewrite_xrefs(body: &mut Element, base_dir: &Path, xref_class: &str) -> Vec<AttachmentRef> {
    let mut attachments = Vec::new();
    body.replace_with(&mut |element: &Element| {
        if !element.is("a")
            || !element
                .attr("class")
                .is_some_and(|class| class.starts_with(xref_class))
        {
            return None;
        }
        let href = element.attr("href").filter(|href| is_local_file(href))?;
        let attachment = AttachmentRef {
            path: resolve_local(base_dir, href),
            name: file_name(href),
        };
        debug!(href, name = %attachment.name, "cross-reference becomes attachment link");
        let target = Element::new("ri:attachment").with_attr("ri:filename", &attachment.name);
        attachments.push(attachment);
        Some(link(target, &element.text_content()))
    });
    attachments
}

fn rewrite_page_links(body: &mut Element) {
    body.replace_with(&mut |element: &Element| {
        if !element.is("a") {
            return None;
        }
        let href = element.attr("href")?;
        if is_absolute_url(href) || is_fragment_only(href) {
            return None;
        }
        let label = normalize_whitespace(&element.text_content());
        let target = Element::new("ri:page").with_attr("ri:content-title", &label);
        Some(link(target, &label))
    });
}

fn is_local_file(href: &str) -> bool {
    !href.is_empty() && !is_absolute_url(href) && !is_fragment_only(href)
}

/// `ac:link` with the given resource and a plain-text label.
fn link(target: Element, label: &str) -> Element {
    Element::new("ac:link").with_children(vec![
        target,
        Element::new("ac:plain-text-link-body").with_text(normalize_whitespace(label)),
    ])
}

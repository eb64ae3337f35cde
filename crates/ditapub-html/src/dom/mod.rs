//! Element tree for XHTML documents.
//!
//! Text is stored the ElementTree way: `text` is the content before the
//! first child and `tail` the content after the element's end tag. Replacing
//! or removing an element therefore has to take care of its tail.

mod entities;
mod parser;
mod serializer;

use crate::error::HtmlError;

pub use serializer::{serialize_children, serialize_element};

/// Tag of the synthetic node holding a parsed document's top-level content.
pub const DOCUMENT_TAG: &str = "#document";

/// Element in a parsed document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Tag name, including a namespace prefix such as `ac:`.
    pub tag: String,
    /// Attributes in source order.
    pub attrs: Vec<(String, String)>,
    /// Text before the first child.
    pub text: String,
    /// Text after the end tag.
    pub tail: String,
    /// Child elements.
    pub children: Vec<Element>,
}

impl Element {
    /// Create an element with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Set text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set tail content.
    #[must_use]
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = tail.into();
        self
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Element>) -> Self {
        self.children = children;
        self
    }

    /// Whether the element has the given tag, ignoring ASCII case.
    #[must_use]
    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    /// Attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing value.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Concatenated text of this element and its descendants, without the
    /// element's own tail.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.collect_text(out);
            out.push_str(&child.tail);
        }
    }

    /// Descendants in document order (pre-order), excluding `self`.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// First descendant with the given tag.
    #[must_use]
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.descendants().find(|e| e.is(tag))
    }

    /// Mutable reference to the first descendant with the given tag.
    pub fn find_mut(&mut self, tag: &str) -> Option<&mut Element> {
        for child in &mut self.children {
            if child.is(tag) {
                return Some(child);
            }
            if let Some(found) = child.find_mut(tag) {
                return Some(found);
            }
        }
        None
    }

    /// Visit every descendant mutably in document order.
    pub fn visit_mut<F>(&mut self, visit: &mut F)
    where
        F: FnMut(&mut Element),
    {
        for child in &mut self.children {
            visit(child);
            child.visit_mut(visit);
        }
    }

    /// Replace descendants in document order.
    ///
    /// `replace` is called for each descendant; when it returns an element,
    /// that element takes the old one's place (inheriting its tail) and is
    /// not descended into. Otherwise the walk continues into the children.
    pub fn replace_with<F>(&mut self, replace: &mut F)
    where
        F: FnMut(&Element) -> Option<Element>,
    {
        for child in &mut self.children {
            if let Some(mut replacement) = replace(child) {
                replacement.tail = std::mem::take(&mut child.tail);
                *child = replacement;
            } else {
                child.replace_with(replace);
            }
        }
    }

    /// Remove the first descendant with the given tag, keeping its tail text.
    pub fn remove_first(&mut self, tag: &str) -> Option<Element> {
        if let Some(index) = self.children.iter().position(|c| c.is(tag)) {
            let mut removed = self.children.remove(index);
            let tail = std::mem::take(&mut removed.tail);
            match index.checked_sub(1) {
                Some(prev) => self.children[prev].tail.push_str(&tail),
                None => self.text.push_str(&tail),
            }
            return Some(removed);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.remove_first(tag))
    }
}

/// Pre-order iterator over an element's descendants.
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

/// Parsed XHTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parse a document from markup.
    ///
    /// Named HTML entities are converted to characters first, and void
    /// elements (`br`, `img`, `meta`, ...) may be written without a closing
    /// slash.
    ///
    /// # Errors
    ///
    /// Returns an error if the markup is not parseable as XML.
    pub fn parse(markup: &str) -> Result<Self, HtmlError> {
        Ok(Self {
            root: parser::parse(markup)?,
        })
    }

    /// Parse a document from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid UTF-8 or unparseable markup.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HtmlError> {
        Self::parse(std::str::from_utf8(bytes)?)
    }

    /// Synthetic root holding the top-level nodes.
    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// The `body` element, if present.
    #[must_use]
    pub fn body(&self) -> Option<&Element> {
        self.root.find("body")
    }
}

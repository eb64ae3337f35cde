//! Lenient XHTML reader.
//!
//! Builds an [`Element`] tree from quick-xml events. HTML void elements may
//! appear unclosed and stray end tags are dropped, so slightly sloppy HTML
//! exports still parse.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use super::entities::convert_html_entities;
use super::{DOCUMENT_TAG, Element};
use crate::error::HtmlError;

/// Elements that never have content or an end tag in HTML.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "wbr",
];

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

/// Parse markup into a tree rooted at a [`DOCUMENT_TAG`] element.
pub(super) fn parse(markup: &str) -> Result<Element, HtmlError> {
    let markup = convert_html_entities(markup);
    let mut reader = Reader::from_str(&markup);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    // Open elements; index 0 is the document root and is never popped.
    let mut stack = vec![Element::new(DOCUMENT_TAG)];

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let element = start_element(&reader, &e);
                if is_void(&element.tag) {
                    append_child(&mut stack, element);
                } else {
                    stack.push(element);
                }
            }
            Event::Empty(e) => {
                let element = start_element(&reader, &e);
                append_child(&mut stack, element);
            }
            Event::End(e) => {
                let tag = decode_name(&reader, e.name().as_ref());
                if !is_void(&tag) {
                    close(&mut stack, &tag);
                }
            }
            Event::Text(e) => {
                let text = reader.decoder().decode(&e)?;
                append_text(&mut stack, &text);
            }
            Event::GeneralRef(e) => {
                let name = reader.decoder().decode(&e)?;
                append_text(&mut stack, &decode_reference(&name));
            }
            Event::CData(e) => {
                append_text(&mut stack, &String::from_utf8_lossy(&e));
            }
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    while stack.len() > 1 {
        pop_into_parent(&mut stack);
    }
    Ok(stack.pop().unwrap_or_else(|| Element::new(DOCUMENT_TAG)))
}

fn start_element(reader: &Reader<&[u8]>, e: &BytesStart) -> Element {
    let mut element = Element::new(decode_name(reader, e.name().as_ref()));
    for attr in e.html_attributes().flatten() {
        let key = decode_name(reader, attr.key.as_ref());
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        let value = attr.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attr.value).into_owned(),
            std::borrow::Cow::into_owned,
        );
        element.attrs.push((key, value));
    }
    element
}

fn decode_name(reader: &Reader<&[u8]>, name: &[u8]) -> String {
    reader.decoder().decode(name).map_or_else(
        |_| String::from_utf8_lossy(name).into_owned(),
        std::borrow::Cow::into_owned,
    )
}

/// Close the innermost open element named `tag`, closing anything opened
/// inside it. End tags without a matching open element are ignored.
fn close(stack: &mut Vec<Element>, tag: &str) {
    let Some(index) = stack.iter().rposition(|e| e.is(tag)) else {
        return;
    };
    if index == 0 {
        return;
    }
    while stack.len() > index {
        pop_into_parent(stack);
    }
}

fn pop_into_parent(stack: &mut Vec<Element>) {
    if let Some(element) = stack.pop() {
        append_child(stack, element);
    }
}

fn append_child(stack: &mut [Element], element: Element) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    }
}

/// Append text to the open element, or to its last child's tail.
fn append_text(stack: &mut [Element], text: &str) {
    let Some(node) = stack.last_mut() else {
        return;
    };
    match node.children.last_mut() {
        Some(last) => last.tail.push_str(text),
        None => node.text.push_str(text),
    }
}

/// Resolve an XML or character reference; unknown names are kept literally.
fn decode_reference(name: &str) -> String {
    let decoded = match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        _ => name.strip_prefix('#').and_then(|code| {
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => code.parse::<u32>().ok(),
            };
            value.and_then(char::from_u32)
        }),
    };
    decoded.map_or_else(|| format!("&{name};"), String::from)
}

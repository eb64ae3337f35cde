//! Storage-format serializer.

use std::fmt::Write;

use super::Element;

/// Elements whose text Confluence expects inside a CDATA section.
const CDATA_ELEMENTS: &[&str] = &["ac:plain-text-body", "ac:plain-text-link-body"];

/// Serialize an element, its content and its tail.
#[must_use]
pub fn serialize_element(element: &Element) -> String {
    let mut out = String::new();
    write_element(element, &mut out);
    out
}

/// Serialize the content of an element without its own start and end tags.
#[must_use]
pub fn serialize_children(element: &Element) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(&escape_text(&element.text));
    for child in &element.children {
        write_element(child, &mut out);
    }
    out
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);
    for (key, value) in &element.attrs {
        write!(out, r#" {key}="{}""#, escape_attr(value)).ok();
    }

    if element.children.is_empty() && element.text.is_empty() {
        out.push_str(" />");
    } else {
        out.push('>');
        if CDATA_ELEMENTS.contains(&element.tag.as_str()) && element.children.is_empty() {
            write_cdata(&element.text, out);
        } else {
            out.push_str(&escape_text(&element.text));
            for child in &element.children {
                write_element(child, out);
            }
        }
        write!(out, "</{}>", element.tag).ok();
    }

    out.push_str(&escape_text(&element.tail));
}

/// Write text as CDATA, splitting any `]]>` across two sections.
fn write_cdata(text: &str, out: &mut String) {
    out.push_str("<![CDATA[");
    out.push_str(&text.replace("]]>", "]]]]><![CDATA[>"));
    out.push_str("]]>");
}

fn escape_text(text: &str) -> String {
    escape_xml(text, false)
}

fn escape_attr(text: &str) -> String {
    escape_xml(text, true)
}

fn escape_xml(text: &str, in_attribute: bool) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' if in_attribute => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_empty_element_self_closes() {
        let p = Element::new("p")
            .with_text("a")
            .with_children(vec![Element::new("br").with_tail("b")]);
        assert_eq!(serialize_element(&p), "<p>a<br />b</p>");
    }

    #[test]
    fn test_attributes_keep_order_and_escape() {
        let a = Element::new("a")
            .with_attr("href", "x?a=1&b=\"2\"")
            .with_attr("class", "xref")
            .with_text("t");
        assert_eq!(
            serialize_element(&a),
            r#"<a href="x?a=1&amp;b=&quot;2&quot;" class="xref">t</a>"#
        );
    }

    #[test]
    fn test_link_body_is_cdata() {
        let body = Element::new("ac:plain-text-link-body").with_text("a < b");
        assert_eq!(
            serialize_element(&body),
            "<ac:plain-text-link-body><![CDATA[a < b]]></ac:plain-text-link-body>"
        );
    }

    #[test]
    fn test_cdata_terminator_is_split() {
        let body = Element::new("ac:plain-text-link-body").with_text("x]]>y");
        assert_eq!(
            serialize_element(&body),
            "<ac:plain-text-link-body><![CDATA[x]]]]><![CDATA[>y]]></ac:plain-text-link-body>"
        );
    }

    #[test]
    fn test_serialize_children_omits_wrapper() {
        let body = Element::new("body")
            .with_text("\n")
            .with_children(vec![Element::new("p").with_text("1 < 2").with_tail("\n")])
            .with_tail("ignored");
        assert_eq!(serialize_children(&body), "\n<p>1 &lt; 2</p>\n");
    }
}

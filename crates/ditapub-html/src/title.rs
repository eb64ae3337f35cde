//! Page title discovery.

use crate::dom::Element;
use crate::error::HtmlError;
use crate::text::normalize_whitespace;

/// Determine the title of a document or fragment.
///
/// Candidates, first non-empty one wins:
/// 1. `content` of a `<meta name="DC.Title">`
/// 2. text of the first `<title>`
/// 3. the text of `fragment` itself when it is an `<a>` element
///
/// # Errors
///
/// Returns [`HtmlError::NoTitleFound`] when every candidate is missing or
/// blank.
pub fn extract_title(fragment: &Element) -> Result<String, HtmlError> {
    let in_fragment = || std::iter::once(fragment).chain(fragment.descendants());

    let dc_title = in_fragment()
        .filter(|e| e.is("meta") && e.attr("name") == Some("DC.Title"))
        .find_map(|e| non_empty(e.attr("content").unwrap_or_default()));
    if let Some(title) = dc_title {
        return Ok(title);
    }

    if let Some(title) = in_fragment()
        .find(|e| e.is("title"))
        .and_then(|e| non_empty(&e.text_content()))
    {
        return Ok(title);
    }

    if fragment.is("a")
        && let Some(title) = non_empty(&fragment.text_content())
    {
        return Ok(title);
    }

    Err(HtmlError::NoTitleFound)
}

fn non_empty(text: &str) -> Option<String> {
    let text = normalize_whitespace(text);
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dom::Document;

    fn title_of(markup: &str) -> Result<String, HtmlError> {
        extract_title(Document::parse(markup).unwrap().root())
    }

    #[test]
    fn test_dc_title_wins_over_title_element() {
        let markup = r#"<html><head>
            <meta name="DC.Title" content="Installing  the
               Agent"/>
            <title>Installing - Product Guide</title>
        </head></html>"#;
        assert_eq!(title_of(markup).unwrap(), "Installing the Agent");
    }

    #[test]
    fn test_title_element() {
        let markup = "<html><head><title>\n  Setup\n</title></head><body/></html>";
        assert_eq!(title_of(markup).unwrap(), "Setup");
    }

    #[test]
    fn test_blank_dc_title_falls_through() {
        let markup = r#"<html><head><meta name="DC.Title" content="  "/><title>Real</title></head></html>"#;
        assert_eq!(title_of(markup).unwrap(), "Real");
    }

    #[test]
    fn test_anchor_text() {
        let a = Element::new("a")
            .with_attr("href", "setup.html")
            .with_text(" Set\n up ");
        assert_eq!(extract_title(&a).unwrap(), "Set up");
    }

    #[test]
    fn test_anchor_text_only_applies_to_anchor_itself() {
        assert!(matches!(
            title_of(r#"<p><a href="x.html">Nested</a></p>"#),
            Err(HtmlError::NoTitleFound)
        ));
    }

    #[test]
    fn test_no_title() {
        assert!(matches!(
            title_of("<html><body><p>text</p></body></html>"),
            Err(HtmlError::NoTitleFound)
        ));
    }
}

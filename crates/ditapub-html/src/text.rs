//! Text helpers.

/// Collapse whitespace runs to a single space and trim the ends.
///
/// Tidied HTML exports wrap long titles and link labels across lines.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

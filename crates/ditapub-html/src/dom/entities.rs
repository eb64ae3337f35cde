//! Named HTML entities.
//!
//! Exported XHTML still uses HTML entity names that an XML parser rejects.
//! They are rewritten to characters before parsing; the five XML entities
//! are left for the parser.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static ENTITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&([a-zA-Z][a-zA-Z0-9]*);").expect("invalid entity regex"));

/// Entity names and their characters, grouped by the kind of text that
/// typically carries them.
const ENTITIES: &[(&str, char)] = &[
    // Spacing and punctuation
    ("nbsp", '\u{00a0}'),
    ("ensp", '\u{2002}'),
    ("emsp", '\u{2003}'),
    ("thinsp", '\u{2009}'),
    ("shy", '\u{00ad}'),
    ("zwj", '\u{200d}'),
    ("zwnj", '\u{200c}'),
    ("mdash", '\u{2014}'),
    ("ndash", '\u{2013}'),
    ("hellip", '\u{2026}'),
    ("bull", '\u{2022}'),
    ("middot", '\u{00b7}'),
    ("lsquo", '\u{2018}'),
    ("rsquo", '\u{2019}'),
    ("sbquo", '\u{201a}'),
    ("ldquo", '\u{201c}'),
    ("rdquo", '\u{201d}'),
    ("bdquo", '\u{201e}'),
    ("laquo", '\u{00ab}'),
    ("raquo", '\u{00bb}'),
    ("lsaquo", '\u{2039}'),
    ("rsaquo", '\u{203a}'),
    ("iexcl", '\u{00a1}'),
    ("iquest", '\u{00bf}'),
    ("para", '\u{00b6}'),
    ("sect", '\u{00a7}'),
    ("dagger", '\u{2020}'),
    ("Dagger", '\u{2021}'),
    // Symbols used in technical writing
    ("copy", '\u{00a9}'),
    ("reg", '\u{00ae}'),
    ("trade", '\u{2122}'),
    ("deg", '\u{00b0}'),
    ("micro", '\u{00b5}'),
    ("plusmn", '\u{00b1}'),
    ("times", '\u{00d7}'),
    ("divide", '\u{00f7}'),
    ("minus", '\u{2212}'),
    ("le", '\u{2264}'),
    ("ge", '\u{2265}'),
    ("ne", '\u{2260}'),
    ("asymp", '\u{2248}'),
    ("infin", '\u{221e}'),
    ("frac14", '\u{00bc}'),
    ("frac12", '\u{00bd}'),
    ("frac34", '\u{00be}'),
    ("sup1", '\u{00b9}'),
    ("sup2", '\u{00b2}'),
    ("sup3", '\u{00b3}'),
    ("rarr", '\u{2192}'),
    ("larr", '\u{2190}'),
    ("uarr", '\u{2191}'),
    ("darr", '\u{2193}'),
    ("harr", '\u{2194}'),
    ("rArr", '\u{21d2}'),
    ("lArr", '\u{21d0}'),
    ("hArr", '\u{21d4}'),
    ("euro", '\u{20ac}'),
    ("pound", '\u{00a3}'),
    ("yen", '\u{00a5}'),
    ("cent", '\u{00a2}'),
    // Latin-1 letters
    ("Auml", '\u{00c4}'),
    ("Ouml", '\u{00d6}'),
    ("Uuml", '\u{00dc}'),
    ("auml", '\u{00e4}'),
    ("ouml", '\u{00f6}'),
    ("uuml", '\u{00fc}'),
    ("szlig", '\u{00df}'),
    ("Aring", '\u{00c5}'),
    ("aring", '\u{00e5}'),
    ("AElig", '\u{00c6}'),
    ("aelig", '\u{00e6}'),
    ("Oslash", '\u{00d8}'),
    ("oslash", '\u{00f8}'),
    ("Ccedil", '\u{00c7}'),
    ("ccedil", '\u{00e7}'),
    ("Ntilde", '\u{00d1}'),
    ("ntilde", '\u{00f1}'),
    ("Eacute", '\u{00c9}'),
    ("eacute", '\u{00e9}'),
    ("egrave", '\u{00e8}'),
    ("ecirc", '\u{00ea}'),
    ("aacute", '\u{00e1}'),
    ("agrave", '\u{00e0}'),
    ("acirc", '\u{00e2}'),
    ("iacute", '\u{00ed}'),
    ("oacute", '\u{00f3}'),
    ("uacute", '\u{00fa}'),
];

/// Replace named HTML entities with their characters.
///
/// Unknown names and the XML entities (`amp`, `lt`, `gt`, `quot`, `apos`)
/// are kept verbatim.
pub(crate) fn convert_html_entities(markup: &str) -> Cow<'_, str> {
    ENTITY_PATTERN.replace_all(markup, |caps: &regex::Captures| {
        lookup(&caps[1]).map_or_else(|| caps[0].to_owned(), String::from)
    })
}

fn lookup(name: &str) -> Option<char> {
    ENTITIES
        .iter()
        .find(|(entity, _)| *entity == name)
        .map(|(_, ch)| *ch)
}

//! Link target classification and local path resolution.

use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;

/// Whether `href` carries a URL scheme (`https:`, `mailto:`, ...) or is
/// protocol-relative.
///
/// Single-letter schemes are treated as Windows drive letters, not URLs.
#[must_use]
pub fn is_absolute_url(href: &str) -> bool {
    if href.starts_with("//") {
        return true;
    }
    let Some((scheme, _)) = href.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    scheme.len() > 1
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Whether `href` only points into the current document.
#[must_use]
pub fn is_fragment_only(href: &str) -> bool {
    href.starts_with('#')
}

/// Path part of a local href: fragment and query removed, percent-decoded.
#[must_use]
pub fn local_path(href: &str) -> String {
    let end = href.find(['#', '?']).unwrap_or(href.len());
    percent_decode_str(&href[..end])
        .decode_utf8_lossy()
        .into_owned()
}

/// Resolve a local href against `base_dir`.
///
/// The result is normalized lexically; `base_dir` is expected to be absolute.
#[must_use]
pub fn resolve_local(base_dir: &Path, href: &str) -> PathBuf {
    normalize_path(&base_dir.join(local_path(href)))
}

/// Remove `.` and `..` components without touching the filesystem.
///
/// `..` at the root is dropped, matching how absolute paths behave.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                None | Some(Component::ParentDir) => normalized.push(".."),
                Some(Component::RootDir | Component::Prefix(_) | Component::CurDir) => {}
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Final path segment of a local href, used as the attachment name.
#[must_use]
pub fn file_name(href: &str) -> String {
    let path = local_path(href);
    path.rsplit(['/', '\\'])
        .next()
        .map_or_else(String::new, str::to_owned)
}

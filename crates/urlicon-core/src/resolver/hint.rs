//! Icon hints: finding `<link rel="icon">` in a page and turning its href
//! into a fetchable URL.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::url_model::{decode_entities, ParsedUrl};

static LINK_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<link\b[^>]*>").expect("link tag regex"));
static ICON_REL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)\brel\s*=\s*["']\s*(?:shortcut\s+)?icon\s*["']"#).expect("rel regex")
});
static HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)\bhref\s*=\s*"([^"]+)""#).expect("href regex"));

/// First icon hint in `body`, with HTML entities decoded.
///
/// Matches `rel="icon"` and `rel="shortcut icon"` case-insensitively; the
/// attributes may appear in any order and the tag may span lines.
pub fn find_icon_hint(body: &str) -> Option<String> {
    LINK_TAG
        .find_iter(body)
        .map(|m| m.as_str())
        .filter(|tag| ICON_REL.is_match(tag))
        .find_map(|tag| HREF.captures(tag))
        .and_then(|caps| caps.get(1))
        .map(|href| decode_entities(href.as_str().trim()).into_owned())
        .filter(|href| !href.is_empty())
}

/// Builds the candidate URL for `hint` relative to `page`.
///
/// | hint form        | result                                   |
/// |------------------|------------------------------------------|
/// | contains `://`   | as-is                                    |
/// | `../x`           | page directory + `../x`, dots normalized |
/// | `//cdn/x`        | `<scheme>://cdn/x`                       |
/// | `/x`             | `<scheme>://<host>/x`                    |
///
/// Anything else (bare relative paths, `data:` URIs, ...) is unsupported and
/// yields `None`.
pub fn resolve_hint(page: &ParsedUrl, hint: &str) -> Option<String> {
    let candidate = if hint.contains("://") {
        hint.to_string()
    } else if hint.starts_with("../") {
        format!("{}{}{}", page.origin(), directory_prefix(&page.path), hint)
    } else if hint.starts_with("//") {
        format!("{}:{}", page.scheme, hint)
    } else if hint.starts_with('/') {
        format!("{}{}", page.origin(), hint)
    } else {
        return None;
    };
    Some(normalize(candidate))
}

/// Leading directory segments of `path`, ending in `/`.
///
/// Stops before the first segment containing a `.` (a file name), and never
/// includes the last segment, which is the document itself.
fn directory_prefix(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    let dirs = &segments[..segments.len().saturating_sub(1)];

    let mut prefix = String::new();
    for segment in dirs {
        if segment.contains('.') {
            break;
        }
        prefix.push_str(segment);
        prefix.push('/');
    }
    if !prefix.starts_with('/') {
        prefix.insert(0, '/');
    }
    prefix
}

/// Resolves `.`/`..` segments; leaves unparseable URLs alone for the fetcher to reject.
fn normalize(candidate: String) -> String {
    match url::Url::parse(&candidate) {
        Ok(u) => u.to_string(),
        Err(_) => candidate,
    }
}

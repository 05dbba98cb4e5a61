//! Anchor scanning for external links.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::ops::Range;

use crate::url_model::decode_entities;

/// `<a ... href="scheme://...">text</a>` for the external schemes we annotate.
/// `href` must be a whole attribute name. Inner text is matched
/// non-greedily and does not cross lines.
static ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)(<a(?:\s[^>]*?)?\shref="((?:http|https|ftp|telnet|news|mms)://[^"]+?)"[^>]*>)(.+?)</a>"#,
    )
    .expect("anchor regex")
});

/// One external anchor found in markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch<'a> {
    /// Byte range of the whole `<a ...>...</a>` in the scanned markup.
    pub range: Range<usize>,
    pub full_tag: &'a str,
    /// The opening `<a ...>` tag alone.
    pub opening_tag: &'a str,
    /// `href` value with HTML entities decoded.
    pub url: Cow<'a, str>,
    /// Inner text with HTML entities decoded.
    pub link_text: Cow<'a, str>,
}

fn link_match<'a>(caps: &Captures<'a>) -> Option<LinkMatch<'a>> {
    let whole = caps.get(0)?;
    Some(LinkMatch {
        range: whole.range(),
        full_tag: whole.as_str(),
        opening_tag: caps.get(1)?.as_str(),
        url: decode_entities(caps.get(2)?.as_str()),
        link_text: decode_entities(caps.get(3)?.as_str()),
    })
}

/// All external anchors in `markup`, in document order.
pub fn find_links(markup: &str) -> Vec<LinkMatch<'_>> {
    ANCHOR
        .captures_iter(markup)
        .filter_map(|caps| link_match(&caps))
        .collect()
}

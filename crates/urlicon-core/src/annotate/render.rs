//! Markup produced for each matched anchor.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::url_model::{check_plain, check_url};

/// Base class on every annotated element.
pub const BASE_CLASS: &str = "urlicon";

static CLASS_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\sclass\s*=\s*["']"#).expect("class attribute regex"));

/// `urlicon urlicon-<suffix>`, or just `urlicon` without a suffix.
pub fn class_list(suffix: Option<&str>) -> String {
    match suffix {
        Some(s) if !s.is_empty() => format!("{} {}-{}", BASE_CLASS, BASE_CLASS, check_plain(s)),
        _ => BASE_CLASS.to_string(),
    }
}

/// Rebuilt link followed by its icon.
///
/// `<a href="URL">TEXT</a>&nbsp;<img src="ICON" alt="" title="favicon" class="CLASSES" />`
pub fn icon_link(url: &str, text: &str, icon: &str, classes: &str) -> String {
    format!(
        r#"<a href="{}">{}</a>&nbsp;<img src="{}" alt="" title="favicon" class="{}" />"#,
        check_url(url),
        check_plain(text),
        check_url(icon),
        classes
    )
}

/// Adds `classes` to an opening `<a ...>` tag: prefixed into an existing
/// `class="..."` (or single-quoted), or appended as a new attribute before
/// the closing `>`.
pub fn with_class(opening_tag: &str, classes: &str) -> String {
    if let Some(m) = CLASS_ATTR.find(opening_tag) {
        let mut out = String::with_capacity(opening_tag.len() + classes.len() + 1);
        out.push_str(&opening_tag[..m.end()]);
        out.push_str(classes);
        out.push(' ');
        out.push_str(&opening_tag[m.end()..]);
        return out;
    }
    let body = opening_tag.strip_suffix('>').unwrap_or(opening_tag);
    format!(r#"{body} class="{classes}">"#)
}

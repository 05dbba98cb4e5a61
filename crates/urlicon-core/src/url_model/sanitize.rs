//! Output-safe URL and text helpers.

use std::borrow::Cow;

/// Schemes that survive [`strip_dangerous_protocols`].
const ALLOWED_PROTOCOLS: &[&str] = &[
    "ftp", "http", "https", "irc", "mailto", "mms", "news", "nntp", "rtsp", "sftp", "ssh", "tel",
    "telnet", "webcal",
];

/// Removes leading schemes that are not on the allow-list (`javascript:`,
/// `data:`, ...), repeating until the string is stable.
///
/// A colon preceded by `/`, `?` or `#` is not a scheme separator, so relative
/// references such as `/a:b` pass through untouched.
pub fn strip_dangerous_protocols(uri: &str) -> String {
    let mut uri = uri.to_string();
    loop {
        let colon = match uri.find(':') {
            Some(pos) if pos > 0 => pos,
            _ => break,
        };
        let protocol = &uri[..colon];
        if protocol.contains(['/', '?', '#']) {
            break;
        }
        if ALLOWED_PROTOCOLS
            .iter()
            .any(|p| p.eq_ignore_ascii_case(protocol))
        {
            break;
        }
        uri = uri[colon + 1..].to_string();
    }
    uri
}

/// HTML-escapes text for use in element content or a quoted attribute.
pub fn check_plain(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Entities produced by [`check_plain`], plus the common decimal/hex apostrophe.
const ENTITIES: &[(&str, char)] = &[
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&#039;", '\''),
    ("&#39;", '\''),
    ("&#x27;", '\''),
];

/// Decodes the entities [`check_plain`] emits, in a single pass, so that
/// `&amp;lt;` becomes `&lt;` and not `<`. Unknown entities are kept as-is.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, c)) => {
                out.push(*c);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Strips dangerous protocols, then HTML-escapes.
pub fn check_url(uri: &str) -> String {
    check_plain(&strip_dangerous_protocols(uri))
}

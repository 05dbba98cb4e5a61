//! Domain keys: filesystem-safe names derived from a host.

use std::fmt;

/// Longest key we produce; leaves room for the `.ico` suffix under NAME_MAX.
const KEY_MAX: usize = 200;

/// Sanitized cache key for one host (`www.example.com` → `www_example_com`).
///
/// Only ASCII alphanumerics, `_` and `-` survive, so a key can never contain a
/// path separator or a `..` component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainKey(String);

impl DomainKey {
    /// Derives the key for `host`. Returns `None` when nothing usable is left.
    pub fn for_host(host: &str) -> Option<Self> {
        let mut out = String::with_capacity(host.len());
        let mut prev_underscore = false;

        for c in host.trim().chars() {
            let replacement = if c.is_ascii_alphanumeric() || c == '-' {
                c.to_ascii_lowercase()
            } else {
                '_'
            };

            if replacement == '_' {
                if !prev_underscore {
                    out.push('_');
                }
                prev_underscore = true;
            } else {
                out.push(replacement);
                prev_underscore = false;
            }
        }

        let mut key = out.trim_matches('_').to_string();
        key.truncate(KEY_MAX);
        if key.is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

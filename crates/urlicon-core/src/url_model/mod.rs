//! URL modeling: scheme/host/path split and output-safe URL helpers.

mod sanitize;

pub use sanitize::{check_plain, check_url, decode_entities, strip_dangerous_protocols};

/// Scheme, host and path of a URL. Fields are empty when the input could not
/// be parsed; an empty host means "cannot resolve", never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedUrl {
    pub scheme: String,
    /// Lowercased host without port. IPv6 literals keep their brackets.
    pub host: String,
    /// Explicit non-default port, if any.
    pub port: Option<u16>,
    pub path: String,
}

impl ParsedUrl {
    pub fn has_host(&self) -> bool {
        !self.host.is_empty()
    }

    /// `host` or `host:port`.
    pub fn authority(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }

    /// `scheme://authority`, the prefix for root-relative references.
    pub fn origin(&self) -> String {
        format!("{}://{}", self.scheme, self.authority())
    }
}

/// Splits `raw` into scheme, host and path. Never fails.
///
/// An empty authority (`http:///path`) yields an empty host instead of
/// promoting the first path segment to a host.
pub fn parse(raw: &str) -> ParsedUrl {
    let raw = raw.trim();

    if let Some((scheme, rest)) = raw.split_once("://") {
        let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
        if rest[..authority_end].is_empty() {
            return ParsedUrl {
                scheme: scheme.to_ascii_lowercase(),
                path: rest[authority_end..].to_string(),
                ..ParsedUrl::default()
            };
        }
    }

    match url::Url::parse(raw) {
        Ok(u) => ParsedUrl {
            scheme: u.scheme().to_string(),
            host: u.host_str().unwrap_or("").to_ascii_lowercase(),
            port: u.port(),
            path: u.path().to_string(),
        },
        Err(e) => {
            tracing::debug!(url = raw, error = %e, "unparseable URL");
            ParsedUrl::default()
        }
    }
}

/// Second-to-last dot-separated label of `host` (`www.example.com` → `example`).
///
/// Returns `None` for single-label hosts.
pub fn host_label(host: &str) -> Option<&str> {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return None;
    }
    Some(labels[labels.len() - 2]).filter(|l| !l.is_empty())
}

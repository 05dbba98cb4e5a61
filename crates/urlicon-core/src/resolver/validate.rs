//! Acceptance check for fetched icon candidates.

use std::fmt;

use crate::fetch::FetchResponse;

/// Media types accepted as favicons: the IANA registration for
/// `image/vnd.microsoft.icon` plus the common aliases, and the formats W3C
/// suggests for favicons.
pub const ACCEPTED_CONTENT_TYPES: &[&str] = &[
    "application/ico",
    "application/octet-stream",
    "image/vnd.microsoft.icon",
    "image/ico",
    "image/icon",
    "image/x-icon",
    "text/ico",
    "text/plain",
    "image/gif",
    "image/png",
];

/// Why a candidate was not cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Status(u32),
    MissingLength,
    ContentType(Option<String>),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Status(code) => write!(f, "status {}", code),
            Rejection::MissingLength => write!(f, "missing or zero Content-Length"),
            Rejection::ContentType(Some(t)) => write!(f, "content type {}", t),
            Rejection::ContentType(None) => write!(f, "no content type"),
        }
    }
}

/// Accepts only `200`, a positive `Content-Length` and an icon media type.
pub fn validate(response: &FetchResponse) -> Result<(), Rejection> {
    if response.status != 200 {
        return Err(Rejection::Status(response.status));
    }
    if !matches!(response.content_length(), Some(n) if n > 0) {
        return Err(Rejection::MissingLength);
    }
    match response.media_type() {
        Some(t) if ACCEPTED_CONTENT_TYPES.contains(&t.as_str()) => Ok(()),
        other => Err(Rejection::ContentType(other)),
    }
}

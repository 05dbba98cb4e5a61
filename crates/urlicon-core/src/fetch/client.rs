//! Blocking GET over libcurl.

use std::str;

use super::parse::parse_header_lines;
use super::{FetchError, FetchResponse, Fetcher};
use crate::config::HttpConfig;

/// Upper bound on a fetched body. Pages and icons above this are treated as failures.
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// [`Fetcher`] backed by one curl easy handle per request.
///
/// Follows redirects and applies the configured connect/total timeouts, so a
/// slow remote host turns into a fetch failure instead of stalling a transform.
#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    http: HttpConfig,
}

impl CurlFetcher {
    pub fn new(http: HttpConfig) -> Self {
        Self { http }
    }
}

impl Fetcher for CurlFetcher {
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let mut lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(self.http.max_redirects)?;
        easy.connect_timeout(self.http.connect_timeout())?;
        easy.timeout(self.http.timeout())?;
        easy.useragent(&self.http.user_agent)?;

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                if body.len() + data.len() > MAX_BODY_BYTES {
                    return Ok(0); // abort transfer
                }
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        tracing::trace!(%url, status, bytes = body.len(), "fetched");

        Ok(FetchResponse {
            status,
            headers: parse_header_lines(&lines),
            body,
        })
    }
}

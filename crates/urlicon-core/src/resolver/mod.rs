//! Favicon resolution.
//!
//! For one URL, find the icon of its host: check the cache, fetch the page,
//! follow its `<link rel="icon">` hint, fall back to `/favicon.ico` on the
//! webroot, validate what came back and cache it. Network trouble never
//! escapes this module; it only moves the state machine to the next fallback.
//! The only error a caller sees is a cache write failure.

mod hint;
mod validate;

pub use hint::{find_icon_hint, resolve_hint};
pub use validate::{validate, Rejection, ACCEPTED_CONTENT_TYPES};

use std::path::PathBuf;

use crate::cache::{CacheError, DomainKey, IconCache};
use crate::fetch::{FetchError, FetchResponse, Fetcher};
use crate::url_model::{self, ParsedUrl};

/// Outcome of resolving one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// An icon for the host is in the cache at this path.
    Cached(PathBuf),
    /// No icon could be found; use the generic external-link asset.
    Fallback,
}

/// Steps of a single resolution. Each fetch outcome picks the next state.
#[derive(Debug)]
enum State {
    CheckCache,
    FetchPage,
    ParseIconHint(FetchResponse),
    ResolveHint(String),
    FetchWebroot,
    Validate(FetchResponse),
    Resolved(PathBuf),
    Fallback,
}

/// Resolves and caches favicons using an injected fetcher and cache.
#[derive(Debug)]
pub struct FaviconResolver<F> {
    fetcher: F,
    cache: IconCache,
}

impl<F: Fetcher> FaviconResolver<F> {
    pub fn new(fetcher: F, cache: IconCache) -> Self {
        Self { fetcher, cache }
    }

    pub fn cache(&self) -> &IconCache {
        &self.cache
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Resolves the favicon for the host of `url`.
    pub fn resolve(&self, url: &str) -> Result<Resolution, CacheError> {
        let page = url_model::parse(url);
        let Some(key) = self.cache.key_for(&page.host) else {
            tracing::debug!(%url, "no host, using fallback icon");
            return Ok(Resolution::Fallback);
        };

        let mut state = State::CheckCache;
        loop {
            state = match state {
                State::CheckCache => {
                    if self.cache.has(&key) {
                        State::Resolved(self.cache.path_for(&key))
                    } else {
                        State::FetchPage
                    }
                }
                State::FetchPage => self.fetch_page(url, &page),
                State::ParseIconHint(response) => match find_icon_hint(&response.text()) {
                    Some(hint) => State::ResolveHint(hint),
                    None => {
                        tracing::info!(%url, "no favicon in page metadata, trying webroot");
                        State::FetchWebroot
                    }
                },
                State::ResolveHint(hint) => self.fetch_hint(url, &page, &hint),
                State::FetchWebroot => self.fetch_webroot(url, &page),
                State::Validate(response) => self.validate_and_store(url, &key, response)?,
                State::Resolved(path) => return Ok(Resolution::Cached(path)),
                State::Fallback => return Ok(Resolution::Fallback),
            };
        }
    }

    fn fetch_page(&self, url: &str, page: &ParsedUrl) -> State {
        if !matches!(page.scheme.as_str(), "http" | "https") {
            tracing::info!(%url, "not an HTTP page, trying webroot");
            return State::FetchWebroot;
        }
        match self.fetch(url) {
            Ok(response) => State::ParseIconHint(response),
            Err(e) => {
                tracing::info!(%url, error = %e, "could not fetch page, trying webroot");
                State::FetchWebroot
            }
        }
    }

    fn fetch_hint(&self, url: &str, page: &ParsedUrl, hint: &str) -> State {
        let Some(candidate) = resolve_hint(page, hint) else {
            tracing::error!(%url, %hint, "unsupported favicon hint, trying webroot");
            return State::FetchWebroot;
        };
        match self.fetch(&candidate) {
            Ok(response) => State::Validate(response),
            Err(e) => {
                tracing::info!(
                    %url,
                    %candidate,
                    error = %e,
                    "could not fetch hinted favicon, trying webroot"
                );
                State::FetchWebroot
            }
        }
    }

    fn fetch_webroot(&self, url: &str, page: &ParsedUrl) -> State {
        match self.fetch(&webroot_url(page)) {
            Ok(response) => State::Validate(response),
            Err(e) => {
                tracing::info!(%url, error = %e, "could not find favicon in webroot");
                State::Fallback
            }
        }
    }

    fn validate_and_store(
        &self,
        url: &str,
        key: &DomainKey,
        response: FetchResponse,
    ) -> Result<State, CacheError> {
        match validate(&response) {
            Ok(()) => Ok(State::Resolved(self.cache.store(key, &response.body)?)),
            Err(rejection) => {
                tracing::debug!(%url, %rejection, "favicon candidate rejected");
                Ok(State::Fallback)
            }
        }
    }

    /// GET with dangerous schemes stripped; non-2xx counts as a failure.
    fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let url = url_model::strip_dangerous_protocols(url);
        self.fetcher.get(&url)?.error_for_status()
    }
}

/// `http://<host>/favicon.ico`, the conventional location.
pub fn webroot_url(page: &ParsedUrl) -> String {
    format!("http://{}/favicon.ico", page.authority())
}

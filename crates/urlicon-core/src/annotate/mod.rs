//! External link annotation.
//!
//! Rewrites external anchors in an HTML fragment in place; all other text is
//! left byte-for-byte untouched. Not idempotent in the icon modes (the
//! rewritten anchor matches again), so run it once per document.

mod render;
mod scan;

pub use render::{class_list, icon_link, with_class, BASE_CLASS};
pub use scan::{find_links, LinkMatch};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::cache::{CacheError, IconCache};
use crate::config::{UrlIconConfig, DEFAULT_FALLBACK_ICON};
use crate::fetch::{CurlFetcher, Fetcher};
use crate::resolver::{FaviconResolver, Resolution};
use crate::url_model::{self, host_label};

/// What to add to each external link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Append the site's favicon (or the generic icon when none is found).
    #[default]
    #[serde(rename = "favicon")]
    Favicon,
    /// Append the generic external-link icon; no network access.
    #[serde(rename = "icon")]
    GenericIcon,
    /// Only add CSS classes to the existing anchor.
    #[serde(rename = "class")]
    ClassOnly,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Favicon => "favicon",
            Mode::GenericIcon => "icon",
            Mode::ClassOnly => "class",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "favicon" => Ok(Mode::Favicon),
            "icon" => Ok(Mode::GenericIcon),
            "class" => Ok(Mode::ClassOnly),
            other => anyhow::bail!("unknown mode {other:?} (expected favicon, icon or class)"),
        }
    }
}

/// Result of [`Annotator::annotate`].
#[derive(Debug)]
pub struct Annotated {
    /// The rewritten document, complete even when caching failed.
    pub markup: String,
    /// Cache failures met along the way; the links involved use the
    /// fallback icon.
    pub cache_errors: Vec<CacheError>,
}

/// Rewrites external links according to a [`Mode`].
#[derive(Debug)]
pub struct Annotator<F> {
    mode: Mode,
    resolver: FaviconResolver<F>,
    fallback_icon: String,
    cache_url: Option<String>,
}

impl Annotator<CurlFetcher> {
    /// Annotator wired from configuration with a curl fetcher.
    pub fn from_config(cfg: &UrlIconConfig) -> Result<Self> {
        let cache = IconCache::new(cfg.resolved_cache_dir()?);
        let resolver = FaviconResolver::new(CurlFetcher::new(cfg.http.clone()), cache);
        Ok(Annotator::new(cfg.mode, resolver)
            .with_fallback_icon(cfg.fallback_icon.clone())
            .with_cache_url(cfg.cache_url.clone()))
    }
}

impl<F: Fetcher> Annotator<F> {
    pub fn new(mode: Mode, resolver: FaviconResolver<F>) -> Self {
        Self {
            mode,
            resolver,
            fallback_icon: DEFAULT_FALLBACK_ICON.to_string(),
            cache_url: None,
        }
    }

    pub fn with_fallback_icon(mut self, icon: impl Into<String>) -> Self {
        self.fallback_icon = icon.into();
        self
    }

    /// Public URL prefix under which the cache directory is served.
    pub fn with_cache_url(mut self, prefix: Option<String>) -> Self {
        self.cache_url = prefix;
        self
    }

    pub fn resolver(&self) -> &FaviconResolver<F> {
        &self.resolver
    }

    /// Returns `markup` with every external anchor rewritten.
    ///
    /// Always produces the whole document. Unreachable sites and invalid
    /// icons just produce the generic icon; so does a cache filesystem
    /// failure, which is also collected into [`Annotated::cache_errors`].
    pub fn annotate(&self, markup: &str) -> Annotated {
        let mut cache_errors = Vec::new();
        let links = find_links(markup);
        if links.is_empty() {
            return Annotated {
                markup: markup.to_string(),
                cache_errors,
            };
        }

        let mut mode = self.mode;
        if mode == Mode::Favicon {
            if let Err(e) = self.resolver.cache().ensure_dir() {
                tracing::error!(error = %e, "favicon cache unavailable, using fallback icon");
                cache_errors.push(e);
                mode = Mode::GenericIcon;
            }
        }

        let mut out = String::with_capacity(markup.len() + links.len() * 128);
        let mut last = 0;
        for link in &links {
            out.push_str(&markup[last..link.range.start]);
            out.push_str(&self.rewrite(mode, link, &mut cache_errors));
            last = link.range.end;
        }
        out.push_str(&markup[last..]);

        tracing::debug!(
            %mode,
            links = links.len(),
            errors = cache_errors.len(),
            "annotated markup"
        );
        Annotated {
            markup: out,
            cache_errors,
        }
    }

    fn rewrite(&self, mode: Mode, link: &LinkMatch<'_>, errors: &mut Vec<CacheError>) -> String {
        let parsed = url_model::parse(&link.url);
        match mode {
            Mode::Favicon => {
                let icon = self.favicon(&link.url, errors);
                self.icon_link(link, &parsed.host, &icon)
            }
            Mode::GenericIcon => self.icon_link(link, &parsed.host, &self.fallback_icon),
            Mode::ClassOnly => match host_label(&parsed.host) {
                Some(label) => {
                    let opening = with_class(link.opening_tag, &class_list(Some(label)));
                    format!("{}{}", opening, &link.full_tag[link.opening_tag.len()..])
                }
                None => link.full_tag.to_string(),
            },
        }
    }

    /// Icon reference for `url`; the fallback icon when nothing usable is cached.
    fn favicon(&self, url: &str, errors: &mut Vec<CacheError>) -> String {
        match self.resolver.resolve(url) {
            Ok(Resolution::Cached(path)) => self.icon_reference(&path),
            Ok(Resolution::Fallback) => self.fallback_icon.clone(),
            Err(e) => {
                tracing::error!(%url, error = %e, "could not cache favicon, using fallback icon");
                errors.push(e);
                self.fallback_icon.clone()
            }
        }
    }

    fn icon_link(&self, link: &LinkMatch<'_>, host: &str, icon: &str) -> String {
        let key = self.resolver.cache().key_for(host);
        let classes = class_list(key.as_ref().map(|k| k.as_str()));
        icon_link(&link.url, &link.link_text, icon, &classes)
    }

    /// Public reference for a cached icon: `<cache_url>/<file>` or the path itself.
    fn icon_reference(&self, path: &Path) -> String {
        match (&self.cache_url, path.file_name()) {
            (Some(prefix), Some(name)) => format!(
                "{}/{}",
                prefix.trim_end_matches('/'),
                name.to_string_lossy()
            ),
            _ => path.display().to_string(),
        }
    }
}

#[cfg(test)]
mod tests;

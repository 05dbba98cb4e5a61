//! `urlicon resolve <url>` – resolve and cache one favicon.

use anyhow::{Context, Result};
use urlicon_core::cache::IconCache;
use urlicon_core::config::UrlIconConfig;
use urlicon_core::fetch::CurlFetcher;
use urlicon_core::resolver::{FaviconResolver, Resolution};

pub async fn run_resolve(cfg: &UrlIconConfig, url: &str) -> Result<()> {
    let cache = IconCache::new(cfg.resolved_cache_dir()?);
    let resolver = FaviconResolver::new(CurlFetcher::new(cfg.http.clone()), cache);

    let resolution = tokio::task::spawn_blocking({
        let url = url.to_string();
        move || resolver.resolve(&url)
    })
    .await
    .context("resolve task join")??;

    match resolution {
        Resolution::Cached(path) => println!("{}", path.display()),
        Resolution::Fallback => println!("fallback\t{}", cfg.fallback_icon),
    }
    Ok(())
}

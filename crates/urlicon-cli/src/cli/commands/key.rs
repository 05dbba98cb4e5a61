//! `urlicon key <host>` – show cache key and icon path for a host.

use anyhow::Result;
use urlicon_core::cache::IconCache;
use urlicon_core::config::UrlIconConfig;

pub fn run_key(cfg: &UrlIconConfig, host: &str) -> Result<()> {
    let cache = IconCache::new(cfg.resolved_cache_dir()?);
    let Some(key) = cache.key_for(host) else {
        anyhow::bail!("host {host:?} has no usable cache key");
    };
    let state = if cache.has(&key) { "cached" } else { "missing" };
    println!("{:<8} {:<32} {}", state, key, cache.path_for(&key).display());
    Ok(())
}

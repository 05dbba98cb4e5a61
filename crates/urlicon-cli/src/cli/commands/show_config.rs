//! `urlicon config` – print the config location and effective settings.

use anyhow::Result;
use std::path::Path;
use urlicon_core::config::{self, UrlIconConfig};

pub fn run_config(cfg: &UrlIconConfig, explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    println!("# config file: {}", path.display());
    println!("# cache dir:   {}", cfg.resolved_cache_dir()?.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}

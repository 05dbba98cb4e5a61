use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::annotate::Mode;

/// Default public reference for the generic external-link icon.
pub const DEFAULT_FALLBACK_ICON: &str = "/modules/urlicon/Icon_External_Link.png";

/// HTTP client parameters (optional `[http]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Seconds allowed for the TCP/TLS connect phase of each fetch.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for a whole fetch, including the body.
    pub timeout_secs: u64,
    /// Maximum redirects followed per fetch.
    pub max_redirects: u32,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            timeout_secs: 20,
            max_redirects: 5,
            user_agent: concat!("urlicon/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Global configuration loaded from `~/.config/urlicon/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlIconConfig {
    /// What to add to external links: "favicon", "icon" or "class".
    #[serde(default)]
    pub mode: Mode,
    /// Directory holding cached `<domain>.ico` files. Defaults to the XDG cache dir.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Public URL prefix under which `cache_dir` is served. When unset, icon
    /// references in the output are plain filesystem paths.
    #[serde(default)]
    pub cache_url: Option<String>,
    /// Reference to the generic external-link icon.
    #[serde(default = "default_fallback_icon")]
    pub fallback_icon: String,
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_fallback_icon() -> String {
    DEFAULT_FALLBACK_ICON.to_string()
}

impl Default for UrlIconConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            cache_dir: None,
            cache_url: None,
            fallback_icon: default_fallback_icon(),
            http: HttpConfig::default(),
        }
    }
}

impl UrlIconConfig {
    /// Cache directory from config, or `~/.cache/urlicon/favicons`.
    pub fn resolved_cache_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.cache_dir {
            return Ok(dir.clone());
        }
        let xdg_dirs = xdg::BaseDirectories::with_prefix("urlicon")?;
        Ok(xdg_dirs.get_cache_home().join("urlicon").join("favicons"))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("urlicon")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<UrlIconConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = UrlIconConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit file. The file must exist.
pub fn load_from(path: &Path) -> Result<UrlIconConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: UrlIconConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

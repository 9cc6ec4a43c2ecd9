use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::fetch::DEFAULT_MIN_LOADING;
use crate::gallery::DEFAULT_MAX_CARDS;
use crate::source::DEFAULT_DATASET_URL;

const DEFAULT_ENV_PREFIX: &str = "APOD_GALLERY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            user_agent: default_user_agent(),
            timeout: default_timeout(),
        }
    }
}

fn default_url() -> String {
    DEFAULT_DATASET_URL.to_string()
}

fn default_user_agent() -> String {
    format!("apod-gallery/{}", crate::VERSION)
}

fn default_timeout() -> Duration {
    Duration::from_secs(20)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GalleryConfig {
    #[serde(default = "default_max_cards")]
    pub max_cards: usize,
    #[serde(default = "default_min_loading", with = "humantime_serde")]
    pub min_loading: Duration,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            max_cards: default_max_cards(),
            min_loading: default_min_loading(),
        }
    }
}

fn default_max_cards() -> usize {
    DEFAULT_MAX_CARDS
}

fn default_min_loading() -> Duration {
    DEFAULT_MIN_LOADING
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_open_browser")]
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            open_browser: default_open_browser(),
        }
    }
}

fn default_listen_addr() -> String {
    "127.0.0.1:8717".into()
}

fn default_open_browser() -> bool {
    true
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub config_file: Option<PathBuf>,
    pub env_prefix: Option<String>,
}

pub fn load(options: LoadOptions) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(path) = options.config_file.as_ref() {
        if path.exists() {
            let from_file = read_config_file(path)?;
            cfg = merge_config(cfg, from_file);
        }
    } else if let Some(default_path) = default_config_path() {
        if default_path.exists() {
            let from_file = read_config_file(&default_path)?;
            cfg = merge_config(cfg, from_file);
        }
    }

    let prefix = options.env_prefix.as_deref().unwrap_or(DEFAULT_ENV_PREFIX);
    apply_env(&mut cfg, prefix);

    Ok(cfg)
}

fn read_config_file(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&data)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))?;
    Ok(config)
}

fn merge_config(mut base: Config, other: Config) -> Config {
    if !other.source.url.trim().is_empty() {
        base.source.url = other.source.url;
    }
    if !other.source.user_agent.trim().is_empty() {
        base.source.user_agent = other.source.user_agent;
    }
    if !other.source.timeout.is_zero() {
        base.source.timeout = other.source.timeout;
    }

    if other.gallery.max_cards != 0 {
        base.gallery.max_cards = other.gallery.max_cards;
    }
    base.gallery.min_loading = other.gallery.min_loading;

    if !other.server.listen_addr.trim().is_empty() {
        base.server.listen_addr = other.server.listen_addr;
    }
    base.server.open_browser = other.server.open_browser;

    base
}

fn apply_env(cfg: &mut Config, prefix: &str) {
    let mut map: HashMap<String, String> = HashMap::new();
    let upper_prefix = format!("{}_", prefix.to_uppercase());

    for (key, value) in env::vars() {
        if let Some(stripped) = key.strip_prefix(&upper_prefix) {
            let normalized = stripped.to_ascii_lowercase().replace("__", ".");
            map.insert(normalized, value);
        }
    }

    for (key, value) in map {
        apply_env_value(cfg, &key, value);
    }
}

fn apply_env_value(cfg: &mut Config, key: &str, value: String) {
    match key {
        "source.url" => cfg.source.url = value,
        "source.user_agent" => cfg.source.user_agent = value,
        "source.timeout" => {
            if let Ok(duration) = humantime::parse_duration(&value) {
                cfg.source.timeout = duration;
            }
        }
        "gallery.max_cards" => {
            if let Ok(parsed) = value.parse::<usize>() {
                if parsed > 0 {
                    cfg.gallery.max_cards = parsed;
                }
            }
        }
        "gallery.min_loading" => {
            if let Ok(duration) = humantime::parse_duration(&value) {
                cfg.gallery.min_loading = duration;
            }
        }
        "server.listen_addr" => cfg.server.listen_addr = value,
        "server.open_browser" => {
            cfg.server.open_browser = matches!(value.as_str(), "1" | "true" | "TRUE" | "True");
        }
        _ => {}
    }
}

pub fn default_path() -> Option<PathBuf> {
    default_config_path()
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("apod-gallery").join("config.yaml"))
}

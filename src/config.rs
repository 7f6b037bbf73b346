use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tokio::fs;

use crate::api::Operation;
use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// On-disk configuration, `~/.repolens/config.toml`. Every field is
/// optional; absent fields fall back to built-in defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigFile {
    base_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl ConfigFile {
    pub async fn load(path: &Path) -> Result<Option<Self>> {
        let content = match fs::read_to_string(path).await {
            Ok(c) => c,
            Err(_) => return Ok(None),
        };
        let cfg = toml::from_str::<Self>(&content)?;
        Ok(Some(cfg))
    }
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Config {
    /// Resolve configuration: CLI flag (which clap already merged with the
    /// environment) over config file over default.
    pub async fn resolve(
        flag_base_url: Option<String>,
        config_path: Option<PathBuf>,
    ) -> Result<Self> {
        let path = match config_path {
            Some(p) => p,
            None => default_config_path()?,
        };
        let file = ConfigFile::load(&path).await?.unwrap_or_default();

        let base_url = flag_base_url
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = normalize_base_url(&base_url)?;

        let request_timeout =
            Duration::from_secs(file.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));

        Ok(Self {
            base_url,
            request_timeout,
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::config("base URL must not be empty"));
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(Error::config(format!(
            "base URL must start with http:// or https://, got {trimmed:?}"
        )));
    }
    Ok(trimmed.to_string())
}

/// `~/.repolens`, created on demand by the callers that write into it.
pub fn app_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| Error::config("could not determine home directory"))?;
    Ok(home.join(".repolens"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(app_dir()?.join("config.toml"))
}

/// Open the TUI log file in append mode, creating `~/.repolens` first.
pub fn open_log_file() -> Result<std::fs::File> {
    let dir = app_dir()?;
    std::fs::create_dir_all(&dir)?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("repolens.log"))?;
    Ok(file)
}

/// Immutable registry mapping logical operations to absolute URLs. Built
/// once from resolved configuration and injected into the API client.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
        }
    }

    pub fn url(&self, op: Operation) -> String {
        format!("{}{}", self.base_url, op.path())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

//! Configuration management for menu-ocr using the prefer crate.
//!
//! Precedence, lowest to highest: built-in defaults, config file (explicit
//! `--config` path or discovered by prefer), `MENU_OCR_*` environment
//! variables, command-line flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ocr::OcrConfig;

/// Name used for config file discovery (menu-ocr.toml, menu-ocr.yaml, ...).
pub const CONFIG_NAME: &str = "menu-ocr";

/// Default host when a bind address omits it.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default port when a bind address omits it.
pub const DEFAULT_PORT: u16 = 8000;

/// Origin of the bundled web frontend during development.
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

pub const ENV_BIND: &str = "MENU_OCR_BIND";
pub const ENV_CORS_ORIGINS: &str = "MENU_OCR_CORS_ORIGINS";
pub const ENV_UPLOAD_LIMIT: &str = "MENU_OCR_UPLOAD_LIMIT";
pub const ENV_LANGUAGE: &str = "MENU_OCR_LANGUAGE";
pub const ENV_PSM: &str = "MENU_OCR_PSM";
pub const ENV_TESSERACT: &str = "MENU_OCR_TESSERACT";

/// Errors while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidEnv { key: &'static str, value: String },

    #[error("Invalid bind address: {0:?}")]
    InvalidBind(String),

    #[error("Invalid CORS origin: {0:?}")]
    InvalidOrigin(String),
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address: `port`, `host` or `host:port`.
    pub bind: String,
    /// Origins allowed to call the API from a browser. `*` allows any
    /// origin (without credentials).
    pub cors_origins: Vec<String>,
    /// Maximum request body size in bytes. Unlimited when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_limit_bytes: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: format!("{}:{}", DEFAULT_HOST, DEFAULT_PORT),
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            upload_limit_bytes: None,
        }
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// OCR engine settings.
    pub ocr: OcrConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Discover a config file with prefer; defaults when none is found.
    pub async fn load() -> Self {
        match prefer::load(CONFIG_NAME).await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => match Self::load_from_path(path).await {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!("Ignoring config file: {}", e);
                        Self::default()
                    }
                },
                None => Self::default(),
            },
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let mut config = Self::parse(&contents, ext)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse config text in the format named by `ext`.
    pub fn parse(contents: &str, ext: &str) -> Result<Self, ConfigError> {
        match ext {
            "toml" => toml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "TOML",
                message: e.to_string(),
            }),
            "yaml" | "yml" => serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "YAML",
                message: e.to_string(),
            }),
            _ => serde_json::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "JSON",
                message: e.to_string(),
            }),
        }
    }

    /// Apply `MENU_OCR_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup. Empty values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(bind) = get(ENV_BIND) {
            tracing::debug!("Using {} from environment: {}", ENV_BIND, bind);
            self.server.bind = bind;
        }

        if let Some(origins) = get(ENV_CORS_ORIGINS) {
            self.server.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(limit) = get(ENV_UPLOAD_LIMIT) {
            let bytes: usize = limit.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                key: ENV_UPLOAD_LIMIT,
                value: limit.clone(),
            })?;
            self.server.upload_limit_bytes = (bytes > 0).then_some(bytes);
        }

        if let Some(language) = get(ENV_LANGUAGE) {
            self.ocr.language = language;
        }

        if let Some(psm) = get(ENV_PSM) {
            self.ocr.page_segmentation_mode =
                psm.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                    key: ENV_PSM,
                    value: psm.clone(),
                })?;
        }

        if let Some(command) = get(ENV_TESSERACT) {
            self.ocr.command = command;
        }

        Ok(())
    }
}

/// Options for loading configuration.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
}

/// Load configuration from file sources, then apply environment overrides.
///
/// An explicit path that cannot be read or parsed is an error; a discovered
/// file that fails to parse is logged and skipped.
pub async fn load_config(options: &LoadOptions) -> Result<Config, ConfigError> {
    let mut config = match options.config_path {
        Some(ref path) => Config::load_from_path(path).await?,
        None => Config::load().await,
    };

    if let Some(ref path) = config.source_path {
        tracing::debug!("Loaded config from {}", path.display());
    }

    config.apply_env_overrides()?;
    Ok(config)
}

/// Parse a bind address that can be:
/// - Just a port: "8000" -> 0.0.0.0:8000
/// - Just a host: "127.0.0.1" -> 127.0.0.1:8000
/// - Host and port: "127.0.0.1:9000" -> 127.0.0.1:9000
pub fn parse_bind_address(bind: &str) -> Result<(String, u16), ConfigError> {
    let bind = bind.trim();
    if bind.is_empty() {
        return Err(ConfigError::InvalidBind(bind.to_string()));
    }

    // Try parsing as just a port number
    if let Ok(port) = bind.parse::<u16>() {
        return Ok((DEFAULT_HOST.to_string(), port));
    }

    // Try parsing as host:port (bracketed IPv6 keeps its colons)
    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            let host = host.trim_start_matches('[').trim_end_matches(']');
            if host.is_empty() {
                return Err(ConfigError::InvalidBind(bind.to_string()));
            }
            return Ok((host.to_string(), port));
        }
        if !bind.starts_with('[') && bind.matches(':').count() == 1 {
            return Err(ConfigError::InvalidBind(bind.to_string()));
        }
    }

    // Must be just a host, use default port
    Ok((bind.to_string(), DEFAULT_PORT))
}

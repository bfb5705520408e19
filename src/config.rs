use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

use crate::conversion::Quality;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub converter: ConverterConfig,
    pub staging: StagingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "tube-mp3".to_string(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
    /// Directory holding index.html and the UI scripts
    pub assets_dir: String,
    /// Allow cross-origin requests (useful when the UI is hosted elsewhere)
    pub cors: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8501,
            assets_dir: "assets".to_string(),
            cors: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// yt-dlp executable (name on PATH or absolute path)
    pub ytdlp_bin: String,
    /// Passed as --ffmpeg-location when non-empty
    pub ffmpeg_location: String,
    /// Netscape cookie file, used only if it exists
    pub cookie_file: String,
    pub default_quality: Quality,
    /// Upper bound on conversions running at the same time
    pub max_concurrent: usize,
    /// Arguments placed before the generated ones on every invocation
    pub extra_args: Vec<String>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            ytdlp_bin: "yt-dlp".to_string(),
            ffmpeg_location: String::new(),
            cookie_file: "cookies.txt".to_string(),
            default_quality: Quality::default(),
            max_concurrent: 2,
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StagingConfig {
    pub dir: String,
    /// Age after which request directories are pruned; 0 keeps them forever
    pub retention_secs: u64,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            dir: "downloads".to_string(),
            retention_secs: 0,
        }
    }
}

impl StagingConfig {
    pub fn dir_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.dir).as_ref())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load from `path` (extension optional, file optional), then `TUBE_MP3__*` env vars.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("TUBE_MP3").separator("__"))
            .build()
            .with_context(|| format!("Failed to read config from {}", path))?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Parse a TOML document directly, without file or environment sources.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .context("Failed to parse config")?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }
}

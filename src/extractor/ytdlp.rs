use super::classify::classify_stderr;
use super::error::ExtractError;
use super::{Extractor, VideoMetadata};
use crate::config::ConverterConfig;
use crate::conversion::Quality;
use async_trait::async_trait;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// How to invoke yt-dlp
#[derive(Debug, Clone)]
pub struct YtDlpConfig {
    /// Executable name or path
    pub binary: PathBuf,

    /// Passed as `--ffmpeg-location` when set
    pub ffmpeg_location: Option<PathBuf>,

    /// Passed as `--cookies` only if the file exists at call time
    pub cookie_file: PathBuf,

    /// Placed before the generated arguments
    pub extra_args: Vec<String>,
}

impl Default for YtDlpConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("yt-dlp"),
            ffmpeg_location: None,
            cookie_file: PathBuf::from("cookies.txt"),
            extra_args: Vec::new(),
        }
    }
}

impl From<&ConverterConfig> for YtDlpConfig {
    fn from(cfg: &ConverterConfig) -> Self {
        Self {
            binary: PathBuf::from(shellexpand::tilde(&cfg.ytdlp_bin).as_ref()),
            ffmpeg_location: (!cfg.ffmpeg_location.is_empty())
                .then(|| PathBuf::from(shellexpand::tilde(&cfg.ffmpeg_location).as_ref())),
            cookie_file: PathBuf::from(shellexpand::tilde(&cfg.cookie_file).as_ref()),
            extra_args: cfg.extra_args.clone(),
        }
    }
}

/// `Extractor` backed by the yt-dlp command-line tool
pub struct YtDlp {
    config: YtDlpConfig,
}

impl YtDlp {
    pub fn new(config: YtDlpConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &YtDlpConfig {
        &self.config
    }

    fn base_args(&self) -> Vec<OsString> {
        self.config.extra_args.iter().map(OsString::from).collect()
    }

    fn push_cookies(&self, args: &mut Vec<OsString>) {
        if self.config.cookie_file.is_file() {
            args.push("--cookies".into());
            args.push(self.config.cookie_file.clone().into());
        }
    }

    /// Arguments for a metadata-only query
    pub fn probe_args(&self, url: &str) -> Vec<OsString> {
        let mut args = self.base_args();
        args.extend(
            ["--dump-json", "--skip-download", "--no-playlist", "--no-warnings"]
                .into_iter()
                .map(OsString::from),
        );
        self.push_cookies(&mut args);
        args.push("--".into());
        args.push(url.into());
        args
    }

    /// Arguments for download + MP3 transcode
    pub fn convert_args(&self, url: &str, quality: Quality, output_template: &Path) -> Vec<OsString> {
        let mut args = self.base_args();
        args.extend(
            [
                "-f",
                "bestaudio/best",
                "--extract-audio",
                "--audio-format",
                "mp3",
                "--audio-quality",
            ]
            .into_iter()
            .map(OsString::from),
        );
        args.push(format!("{}K", quality.kbps()).into());
        args.extend(
            ["--no-playlist", "--no-progress", "-o"]
                .into_iter()
                .map(OsString::from),
        );
        args.push(output_template.into());
        if let Some(ffmpeg) = &self.config.ffmpeg_location {
            args.push("--ffmpeg-location".into());
            args.push(ffmpeg.clone().into());
        }
        self.push_cookies(&mut args);
        args.push("--".into());
        args.push(url.into());
        args
    }

    /// Run the tool and return stdout, classifying stderr on failure.
    async fn run(&self, args: Vec<OsString>) -> Result<Vec<u8>, ExtractError> {
        debug!("Running {} {:?}", self.config.binary.display(), args);

        let output = Command::new(&self.config.binary)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    ExtractError::ToolMissing(self.config.binary.display().to_string())
                }
                _ => ExtractError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let err = classify_stderr(&stderr);
            warn!(
                "yt-dlp exited with {} ({}): {}",
                output.status,
                err,
                stderr.trim()
            );
            return Err(err);
        }

        Ok(output.stdout)
    }

    /// Installed tool version, useful as a startup check.
    pub async fn version(&self) -> Result<String, ExtractError> {
        let mut args = self.base_args();
        args.push("--version".into());
        let stdout = self.run(args).await?;
        Ok(String::from_utf8_lossy(&stdout).trim().to_string())
    }
}

#[async_trait]
impl Extractor for YtDlp {
    async fn probe(&self, url: &str) -> Result<VideoMetadata, ExtractError> {
        info!("Probing {}", url);

        let stdout = self.run(self.probe_args(url)).await?;
        let metadata: VideoMetadata = serde_json::from_slice(&stdout)?;

        info!(
            "Probed {}: title={:?} duration={:?}",
            url, metadata.title, metadata.duration_secs
        );
        Ok(metadata)
    }

    async fn convert(
        &self,
        url: &str,
        quality: Quality,
        output_template: &Path,
    ) -> Result<(), ExtractError> {
        info!(
            "Converting {} at {} into {}",
            url,
            quality,
            output_template.display()
        );

        self.run(self.convert_args(url, quality, output_template))
            .await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "yt-dlp"
    }
}

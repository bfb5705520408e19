//! Boundary to the external extraction/transcoding tool
//!
//! The `Extractor` trait is the only way the converter reaches the tool:
//! - `probe` fetches metadata without downloading media
//! - `convert` downloads the best audio and transcodes it to MP3
//!
//! Failures come back as the closed `ExtractError` set; text matching on the
//! tool's output lives in `classify`.

mod classify;
mod error;
mod ytdlp;

pub use classify::{classify_stderr, error_detail};
pub use error::ExtractError;
pub use ytdlp::{YtDlp, YtDlpConfig};

use crate::conversion::Quality;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Title used when the tool reports none
pub const FALLBACK_TITLE: &str = "video";

/// Metadata returned by a probe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoMetadata {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    /// Length in seconds, if known (absent for live streams)
    #[serde(default, rename = "duration")]
    pub duration_secs: Option<f64>,

    #[serde(default)]
    pub uploader: Option<String>,
}

impl VideoMetadata {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(FALLBACK_TITLE)
    }
}

/// External capability that turns a video URL into an MP3 file
#[async_trait::async_trait]
pub trait Extractor: Send + Sync {
    /// Query metadata without downloading media
    async fn probe(&self, url: &str) -> Result<VideoMetadata, ExtractError>;

    /// Download best-available audio and transcode it to MP3
    ///
    /// `output_template` is a path whose file name ends in `.%(ext)s`; the tool
    /// substitutes the final extension.
    async fn convert(
        &self,
        url: &str,
        quality: Quality,
        output_template: &Path,
    ) -> Result<(), ExtractError>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

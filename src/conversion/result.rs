use super::request::Quality;
use crate::extractor::ExtractError;
use crate::validator::Rejection;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

/// Longest raw error detail shown to the user
pub const MAX_DETAIL_CHARS: usize = 200;

/// Outcome of one conversion request
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionResult {
    Success(ConvertedAudio),
    Failure(ConversionFailure),
}

impl ConversionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ConversionResult::Success(_))
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            ConversionResult::Success(_) => None,
            ConversionResult::Failure(failure) => Some(failure.kind),
        }
    }
}

/// The staged MP3 produced by a successful conversion
#[derive(Debug, Clone, Serialize)]
pub struct ConvertedAudio {
    /// Key of the staging directory; also the download handle
    pub request_id: Uuid,

    /// Sanitized video title
    pub title: String,

    /// Human-readable summary
    pub message: String,

    /// `<title>.mp3`
    pub file_name: String,

    pub file_path: PathBuf,

    pub size_bytes: u64,

    /// Track duration from the MP3 stream, else from the probe
    pub duration_secs: Option<f64>,

    /// Output sample rate in Hz, when the MP3 stream could be read
    pub sample_rate: Option<u32>,

    pub channels: Option<u16>,

    pub quality: Quality,

    pub completed_at: DateTime<Utc>,
}

/// User-facing failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    EmptyInput,
    MalformedUrl,
    Unavailable,
    AgeRestricted,
    RegionRestricted,
    Forbidden,
    RateLimited,
    Network,
    OutputMissing,
    Unclassified,
}

impl FailureKind {
    /// Fixed message for every kind except `Unclassified`, which carries its detail.
    pub fn message(self) -> &'static str {
        match self {
            FailureKind::EmptyInput => "Please enter a YouTube URL",
            FailureKind::MalformedUrl => "Invalid YouTube URL",
            FailureKind::Unavailable => "Video is unavailable or private",
            FailureKind::AgeRestricted => {
                "Video is age-restricted and cannot be downloaded without signing in"
            }
            FailureKind::RegionRestricted => {
                "Video is not available in this region or on this platform"
            }
            FailureKind::Forbidden => "Access to the video was forbidden or blocked",
            FailureKind::RateLimited => "Too many requests; try again later",
            FailureKind::Network => "Network connection issue. Check your internet.",
            FailureKind::OutputMissing => "File was downloaded but not found in expected location",
            FailureKind::Unclassified => "Error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionFailure {
    pub kind: FailureKind,
    pub user_message: String,
}

impl ConversionFailure {
    pub fn new(kind: FailureKind) -> Self {
        Self {
            kind,
            user_message: kind.message().to_string(),
        }
    }

    /// Falls back to the raw detail, cut to `MAX_DETAIL_CHARS`.
    pub fn unclassified(detail: &str) -> Self {
        let detail = detail.trim();
        let shown: String = detail.chars().take(MAX_DETAIL_CHARS).collect();
        let ellipsis = if detail.chars().count() > MAX_DETAIL_CHARS {
            "..."
        } else {
            ""
        };

        Self {
            kind: FailureKind::Unclassified,
            user_message: format!("Error: {}{}", shown, ellipsis),
        }
    }
}

impl From<Rejection> for ConversionFailure {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::Empty => ConversionFailure::new(FailureKind::EmptyInput),
            Rejection::NotYouTube | Rejection::UnrecognizedShape => {
                ConversionFailure::new(FailureKind::MalformedUrl)
            }
        }
    }
}

impl From<ExtractError> for ConversionFailure {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Unavailable => ConversionFailure::new(FailureKind::Unavailable),
            ExtractError::AgeRestricted => ConversionFailure::new(FailureKind::AgeRestricted),
            ExtractError::RegionRestricted => {
                ConversionFailure::new(FailureKind::RegionRestricted)
            }
            ExtractError::UnsupportedUrl => ConversionFailure::new(FailureKind::MalformedUrl),
            ExtractError::Forbidden => ConversionFailure::new(FailureKind::Forbidden),
            ExtractError::RateLimited => ConversionFailure::new(FailureKind::RateLimited),
            ExtractError::Network(_) => ConversionFailure::new(FailureKind::Network),
            other => ConversionFailure::unclassified(&other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unclassified_truncates_detail() {
        let detail = "x".repeat(500);
        let failure = ConversionFailure::unclassified(&detail);

        assert_eq!(failure.kind, FailureKind::Unclassified);
        assert_eq!(
            failure.user_message.len(),
            "Error: ".len() + MAX_DETAIL_CHARS + "...".len()
        );
    }

    #[test]
    fn test_unclassified_keeps_short_detail() {
        let failure = ConversionFailure::unclassified("  ffmpeg not found  ");
        assert_eq!(failure.user_message, "Error: ffmpeg not found");
    }

    #[test]
    fn test_extract_errors_map_to_kinds() {
        let cases = [
            (ExtractError::Unavailable, FailureKind::Unavailable),
            (ExtractError::AgeRestricted, FailureKind::AgeRestricted),
            (ExtractError::RegionRestricted, FailureKind::RegionRestricted),
            (ExtractError::UnsupportedUrl, FailureKind::MalformedUrl),
            (ExtractError::Forbidden, FailureKind::Forbidden),
            (ExtractError::RateLimited, FailureKind::RateLimited),
            (ExtractError::Network("reset".into()), FailureKind::Network),
            (ExtractError::ToolMissing("yt-dlp".into()), FailureKind::Unclassified),
            (ExtractError::Failed("boom".into()), FailureKind::Unclassified),
        ];

        for (err, kind) in cases {
            assert_eq!(ConversionFailure::from(err).kind, kind);
        }
    }

    #[test]
    fn test_failed_detail_reaches_user() {
        let failure = ConversionFailure::from(ExtractError::Failed(
            "ERROR: Postprocessing: audio conversion failed".into(),
        ));
        assert!(failure.user_message.contains("audio conversion failed"));
    }

    #[test]
    fn test_failure_serializes_with_status_tag() {
        let result = ConversionResult::Failure(ConversionFailure::new(FailureKind::RateLimited));
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["status"], "failure");
        assert_eq!(json["kind"], "rate_limited");
        assert_eq!(json["user_message"], "Too many requests; try again later");
    }
}

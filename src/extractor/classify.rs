//! Maps yt-dlp stderr text onto [`ExtractError`] variants.
//!
//! The patterns follow yt-dlp's wording and need updating when it changes.
//! Nothing outside this module looks at raw error text.

use super::error::ExtractError;

const RATE_LIMITED: &[&str] = &["http error 429", "too many requests"];

const AGE_RESTRICTED: &[&str] = &[
    "confirm your age",
    "age-restricted",
    "age restricted",
    "inappropriate for some users",
];

const REGION_RESTRICTED: &[&str] = &[
    "in your country",
    "geo restrict",
    "geo-restrict",
    "not available in your region",
    "not available on this app",
];

const UNAVAILABLE: &[&str] = &[
    "video unavailable",
    "private video",
    "this video is private",
    "has been removed",
    "does not exist",
];

const UNSUPPORTED_URL: &[&str] = &[
    "unsupported url",
    "invalid url",
    "is not a valid url",
    "incomplete youtube id",
];

const FORBIDDEN: &[&str] = &["http error 403", "forbidden", "not a bot"];

const NETWORK: &[&str] = &[
    "network",
    "connection",
    "timed out",
    "name or service not known",
    "temporary failure in name resolution",
    "unable to download webpage",
];

fn matches_any(haystack: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| haystack.contains(p))
}

/// Classify the stderr of a failed yt-dlp run.
///
/// Order matters: yt-dlp prefixes region and age blocks with "Video unavailable",
/// so the more specific categories are checked first.
pub fn classify_stderr(stderr: &str) -> ExtractError {
    let lowered = stderr.to_lowercase();

    if matches_any(&lowered, RATE_LIMITED) {
        ExtractError::RateLimited
    } else if matches_any(&lowered, AGE_RESTRICTED) {
        ExtractError::AgeRestricted
    } else if matches_any(&lowered, REGION_RESTRICTED) {
        ExtractError::RegionRestricted
    } else if matches_any(&lowered, UNAVAILABLE) {
        ExtractError::Unavailable
    } else if matches_any(&lowered, UNSUPPORTED_URL) {
        ExtractError::UnsupportedUrl
    } else if matches_any(&lowered, FORBIDDEN) {
        ExtractError::Forbidden
    } else if matches_any(&lowered, NETWORK) {
        ExtractError::Network(error_detail(stderr))
    } else {
        ExtractError::Failed(error_detail(stderr))
    }
}

/// Last `ERROR:` line, else the last non-empty line.
pub fn error_detail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if let Some(line) = lines.iter().rev().find(|l| l.starts_with("ERROR:")) {
        return line.trim_start_matches("ERROR:").trim().to_string();
    }

    lines
        .last()
        .map(|line| line.to_string())
        .unwrap_or_else(|| "extractor exited without output".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_unavailable() {
        let err = classify_stderr("ERROR: [youtube] dQw4w9WgXcQ: Video unavailable");
        assert!(matches!(err, ExtractError::Unavailable));
    }

    #[test]
    fn test_private_video() {
        let err = classify_stderr(
            "ERROR: [youtube] abc: Private video. Sign in if you've been granted access to this video",
        );
        assert!(matches!(err, ExtractError::Unavailable));
    }

    #[test]
    fn test_age_gate_wins_over_unavailable() {
        let err = classify_stderr(
            "ERROR: [youtube] abc: Sign in to confirm your age. This video may be inappropriate for some users.",
        );
        assert!(matches!(err, ExtractError::AgeRestricted));
    }

    #[test]
    fn test_region_block_wins_over_unavailable() {
        let err = classify_stderr(
            "ERROR: [youtube] abc: Video unavailable. The uploader has not made this video available in your country",
        );
        assert!(matches!(err, ExtractError::RegionRestricted));
    }

    #[test]
    fn test_unsupported_url() {
        let err = classify_stderr("ERROR: Unsupported URL: https://www.youtube.com/feed/library");
        assert!(matches!(err, ExtractError::UnsupportedUrl));
    }

    #[test]
    fn test_rate_limited() {
        let err = classify_stderr("ERROR: unable to download video data: HTTP Error 429: Too Many Requests");
        assert!(matches!(err, ExtractError::RateLimited));
    }

    #[test]
    fn test_forbidden_and_bot_check() {
        assert!(matches!(
            classify_stderr("ERROR: unable to download video data: HTTP Error 403: Forbidden"),
            ExtractError::Forbidden
        ));
        assert!(matches!(
            classify_stderr("ERROR: [youtube] abc: Sign in to confirm you're not a bot."),
            ExtractError::Forbidden
        ));
    }

    #[test]
    fn test_network() {
        let err = classify_stderr(
            "ERROR: [youtube] abc: Unable to download webpage: <urlopen error [Errno -3] Temporary failure in name resolution>",
        );
        assert!(matches!(err, ExtractError::Network(_)));
    }

    #[test]
    fn test_unknown_keeps_last_error_line() {
        let stderr = "WARNING: something odd\nERROR: first\nERROR: Postprocessing: ffprobe and ffmpeg not found\n";
        match classify_stderr(stderr) {
            ExtractError::Failed(detail) => {
                assert_eq!(detail, "Postprocessing: ffprobe and ffmpeg not found")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_detail_without_error_prefix() {
        assert_eq!(error_detail("line one\nline two\n\n"), "line two");
        assert_eq!(error_detail(""), "extractor exited without output");
    }
}

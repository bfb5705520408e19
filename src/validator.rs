//! YouTube URL gate, checked before any network activity.

use serde::Serialize;
use std::fmt;

const HOST_FRAGMENTS: [&str; 2] = ["youtube.com", "youtu.be"];

/// Accepted URL layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlShape {
    /// `youtube.com/watch?v=<id>`
    Watch,
    /// `youtu.be/<id>`
    Short,
    /// `youtube.com/embed/<id>`
    Embed,
    /// `youtube.com/v/<id>`
    Legacy,
}

impl UrlShape {
    fn marker(self) -> &'static str {
        match self {
            UrlShape::Watch => "watch?v=",
            UrlShape::Short => "youtu.be/",
            UrlShape::Embed => "/embed/",
            UrlShape::Legacy => "/v/",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    Empty,
    NotYouTube,
    UnrecognizedShape,
}

impl Rejection {
    pub fn reason(self) -> &'static str {
        match self {
            Rejection::Empty => "Please enter a YouTube URL",
            Rejection::NotYouTube => "Not a YouTube URL",
            Rejection::UnrecognizedShape => "Unsupported YouTube URL format",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

impl std::error::Error for Rejection {}

fn is_video_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Deterministic check of `input` against the accepted host fragments and path shapes.
pub fn validate(input: &str) -> Result<UrlShape, Rejection> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Rejection::Empty);
    }

    // Host and markers are case-insensitive; the id only has to be non-empty.
    let lowered = input.to_ascii_lowercase();
    if !HOST_FRAGMENTS.iter().any(|host| lowered.contains(host)) {
        return Err(Rejection::NotYouTube);
    }

    [UrlShape::Watch, UrlShape::Short, UrlShape::Embed, UrlShape::Legacy]
        .into_iter()
        .find(|shape| {
            let marker = shape.marker();
            lowered.match_indices(marker).any(|(at, _)| {
                lowered[at + marker.len()..]
                    .chars()
                    .next()
                    .is_some_and(is_video_id_char)
            })
        })
        .ok_or(Rejection::UnrecognizedShape)
}

/// Serializable view of a validation, for the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub valid: bool,
    pub reason: Option<String>,
    pub shape: Option<UrlShape>,
}

impl Validation {
    pub fn of(input: &str) -> Self {
        match validate(input) {
            Ok(shape) => Self {
                valid: true,
                reason: None,
                shape: Some(shape),
            },
            Err(rejection) => Self {
                valid: false,
                reason: Some(rejection.reason().to_string()),
                shape: None,
            },
        }
    }
}

/// Closed set of failures reported by an [`Extractor`](super::Extractor).
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("video is unavailable or private")]
    Unavailable,

    #[error("video is age-restricted")]
    AgeRestricted,

    #[error("video is restricted in this region or on this platform")]
    RegionRestricted,

    #[error("URL is not supported by the extractor")]
    UnsupportedUrl,

    #[error("access forbidden")]
    Forbidden,

    #[error("rate limited")]
    RateLimited,

    #[error("network failure: {0}")]
    Network(String),

    #[error("extractor binary not found: {0}")]
    ToolMissing(String),

    /// Anything the adapter could not classify; carries the tool's own error line.
    #[error("{0}")]
    Failed(String),

    #[error("failed to run extractor: {0}")]
    Io(#[from] std::io::Error),

    #[error("extractor returned unreadable metadata: {0}")]
    InvalidMetadata(#[from] serde_json::Error),
}

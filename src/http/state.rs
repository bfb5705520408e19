use crate::conversion::{Converter, Quality};
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Orchestrator shared by every request
    pub converter: Arc<Converter>,

    /// Bitrate used when a request omits one
    pub default_quality: Quality,

    /// Static UI files served as the fallback route
    pub assets_dir: PathBuf,

    /// Add a permissive CORS layer
    pub cors: bool,
}

impl AppState {
    pub fn new(converter: Arc<Converter>) -> Self {
        Self {
            converter,
            default_quality: Quality::default(),
            assets_dir: PathBuf::from("assets"),
            cors: false,
        }
    }

    pub fn with_default_quality(mut self, quality: Quality) -> Self {
        self.default_quality = quality;
        self
    }

    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = dir.into();
        self
    }

    pub fn with_cors(mut self, cors: bool) -> Self {
        self.cors = cors;
        self
    }
}

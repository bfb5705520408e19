pub mod audio;
pub mod config;
pub mod conversion;
pub mod extractor;
pub mod http;
pub mod staging;
pub mod validator;

pub use audio::{inspect_mp3, Mp3Info};
pub use config::Config;
pub use conversion::{
    sanitize_title, ConversionFailure, ConversionRequest, ConversionResult, ConvertedAudio,
    Converter, FailureKind, Quality,
};
pub use extractor::{ExtractError, Extractor, VideoMetadata, YtDlp, YtDlpConfig};
pub use http::{create_router, AppState};
pub use staging::{spawn_pruner, InFlight, StagedFile, StagingArea};
pub use validator::{validate, Rejection, UrlShape, Validation};

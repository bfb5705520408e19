//! YouTube-to-MP3 conversion orchestration
//!
//! `Converter::convert` takes a `ConversionRequest` and always returns a
//! `ConversionResult`:
//! - URL validation (no network)
//! - metadata probe, failing fast on unavailable or restricted videos
//! - filename sanitization of the video title
//! - download + MP3 transcode into a per-request staging directory
//! - output verification and MP3 inspection

mod converter;
mod request;
mod result;
mod sanitize;

pub use converter::Converter;
pub use request::{ConversionRequest, InvalidQuality, Quality};
pub use result::{
    ConversionFailure, ConversionResult, ConvertedAudio, FailureKind, MAX_DETAIL_CHARS,
};
pub use sanitize::{sanitize_title, MAX_TITLE_BYTES};

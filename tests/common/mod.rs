// Shared test doubles for the extractor boundary.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tube_mp3::{ExtractError, Extractor, Quality, VideoMetadata};

/// `frames` silent MPEG-1 Layer III frames: 128 kbps, 44.1 kHz, mono.
///
/// Each frame is 417 bytes and 1152 samples, so 40 frames last 46080 / 44100 s.
pub fn cbr_mp3(frames: usize) -> Vec<u8> {
    const FRAME_LEN: usize = 417;
    const HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0xC4];

    let mut bytes = Vec::with_capacity(frames * FRAME_LEN);
    for _ in 0..frames {
        let mut frame = vec![0u8; FRAME_LEN];
        frame[..4].copy_from_slice(&HEADER);
        bytes.extend_from_slice(&frame);
    }
    bytes
}

/// Scripted stand-in for yt-dlp
pub struct FakeExtractor {
    pub title: Option<String>,
    pub duration_secs: Option<f64>,
    pub probe_failure: Option<fn() -> ExtractError>,
    pub convert_failure: Option<fn() -> ExtractError>,
    /// Write `<template with mp3>` on convert
    pub write_output: bool,
    pub payload: Vec<u8>,
    pub probes: Mutex<Vec<String>>,
    pub conversions: Mutex<Vec<(String, Quality, PathBuf)>>,
}

impl FakeExtractor {
    pub fn with_title(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            duration_secs: Some(212.0),
            probe_failure: None,
            convert_failure: None,
            write_output: true,
            payload: b"fake mp3 payload".to_vec(),
            probes: Mutex::new(Vec::new()),
            conversions: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_probe(failure: fn() -> ExtractError) -> Self {
        Self {
            probe_failure: Some(failure),
            ..Self::with_title("unused")
        }
    }

    pub fn probe_count(&self) -> usize {
        self.probes.lock().unwrap().len()
    }

    pub fn conversion_count(&self) -> usize {
        self.conversions.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Extractor for FakeExtractor {
    async fn probe(&self, url: &str) -> Result<VideoMetadata, ExtractError> {
        self.probes.lock().unwrap().push(url.to_string());
        if let Some(failure) = self.probe_failure {
            return Err(failure());
        }

        Ok(VideoMetadata {
            id: Some("dQw4w9WgXcQ".to_string()),
            title: self.title.clone(),
            duration_secs: self.duration_secs,
            uploader: None,
        })
    }

    async fn convert(
        &self,
        url: &str,
        quality: Quality,
        output_template: &Path,
    ) -> Result<(), ExtractError> {
        self.conversions
            .lock()
            .unwrap()
            .push((url.to_string(), quality, output_template.to_path_buf()));
        if let Some(failure) = self.convert_failure {
            return Err(failure());
        }

        if self.write_output {
            let target = output_template.to_string_lossy().replace("%(ext)s", "mp3");
            tokio::fs::write(target, &self.payload).await?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "fake"
    }
}

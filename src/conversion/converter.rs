use super::request::ConversionRequest;
use super::result::{ConversionFailure, ConversionResult, ConvertedAudio, FailureKind};
use super::sanitize::sanitize_title;
use crate::audio::{inspect_mp3_async, Mp3Info};
use crate::extractor::{Extractor, FALLBACK_TITLE};
use crate::staging::StagingArea;
use crate::validator::validate;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Drives one request through validate → probe → convert → locate
pub struct Converter {
    /// External extraction/transcoding capability
    extractor: Arc<dyn Extractor>,

    /// Where per-request output directories live
    staging: StagingArea,

    /// Bounds conversions running at once; extra requests wait
    permits: Semaphore,
}

impl Converter {
    pub fn new(extractor: Arc<dyn Extractor>, staging: StagingArea, max_concurrent: usize) -> Self {
        Self {
            extractor,
            staging,
            permits: Semaphore::new(max_concurrent.max(1)),
        }
    }

    pub fn staging(&self) -> &StagingArea {
        &self.staging
    }

    /// Run the whole request; every failure ends up as a user-facing category.
    pub async fn convert(&self, request: &ConversionRequest) -> ConversionResult {
        let request_id = Uuid::new_v4();
        info!(
            "Conversion {} started: url={} quality={}",
            request_id,
            request.url.trim(),
            request.quality
        );

        match self.run(request_id, request).await {
            Ok(audio) => {
                info!(
                    "Conversion {} finished: {} ({} bytes)",
                    request_id,
                    audio.file_path.display(),
                    audio.size_bytes
                );
                ConversionResult::Success(audio)
            }
            Err(failure) => {
                warn!(
                    "Conversion {} failed ({:?}): {}",
                    request_id, failure.kind, failure.user_message
                );
                ConversionResult::Failure(failure)
            }
        }
    }

    async fn run(
        &self,
        request_id: Uuid,
        request: &ConversionRequest,
    ) -> Result<ConvertedAudio, ConversionFailure> {
        validate(&request.url)?;
        let url = request.url.trim();

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ConversionFailure::unclassified("converter is shutting down"))?;

        // Fail fast on unavailable or restricted videos before downloading anything
        let metadata = self.extractor.probe(url).await?;

        let mut title = sanitize_title(metadata.title());
        if title.is_empty() {
            title = FALLBACK_TITLE.to_string();
        }

        let _in_flight = self.staging.begin(request_id);
        let dir = self.staging.allocate(request_id).await.map_err(|e| {
            error!("Staging failed for {}: {:#}", request_id, e);
            ConversionFailure::unclassified(&format!("{:#}", e))
        })?;

        let template = dir.join(format!("{}.%(ext)s", title));
        self.extractor
            .convert(url, request.quality, &template)
            .await?;

        let file_name = format!("{}.mp3", title);
        let file_path = dir.join(&file_name);
        let size_bytes = match tokio::fs::metadata(&file_path).await {
            Ok(meta) if meta.is_file() => meta.len(),
            _ => {
                error!(
                    "{} reported success but {} is missing",
                    self.extractor.name(),
                    file_path.display()
                );
                return Err(ConversionFailure::new(FailureKind::OutputMissing));
            }
        };

        let mp3 = inspect_mp3_async(file_path.clone())
            .await
            .unwrap_or_else(|e| {
                warn!("Could not inspect {}: {:#}", file_path.display(), e);
                Mp3Info::default()
            });

        Ok(ConvertedAudio {
            request_id,
            message: format!("Successfully converted: {}", title),
            title,
            file_name,
            file_path,
            size_bytes,
            duration_secs: mp3.duration_secs.or(metadata.duration_secs),
            sample_rate: mp3.sample_rate,
            channels: mp3.channels,
            quality: request.quality,
            completed_at: Utc::now(),
        })
    }
}

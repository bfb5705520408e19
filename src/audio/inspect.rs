use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::info;

/// Stream parameters of a produced MP3
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Mp3Info {
    pub duration_secs: Option<f64>,
    pub sample_rate: Option<u32>,
    pub channels: Option<u16>,
}

pub fn inspect_mp3(path: impl AsRef<Path>) -> Result<Mp3Info> {
    let path = path.as_ref();

    let file = File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    hint.with_extension("mp3");

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("Not a readable MP3 stream")?;

    let format = probed.format;
    let track = format
        .default_track()
        .context("MP3 stream has no audio track")?;
    let params = &track.codec_params;

    let duration_secs = match (params.time_base, params.n_frames) {
        (Some(time_base), Some(frames)) => {
            let time = time_base.calc_time(frames);
            Some(time.seconds as f64 + time.frac)
        }
        (None, Some(frames)) => params.sample_rate.map(|rate| frames as f64 / rate as f64),
        _ => None,
    };

    let info = Mp3Info {
        duration_secs,
        sample_rate: params.sample_rate,
        channels: params.channels.map(|c| c.count() as u16),
    };

    info!(
        "MP3 inspected: {} ({:?}s, {:?}Hz, {:?} channels)",
        path.display(),
        info.duration_secs,
        info.sample_rate,
        info.channels
    );

    Ok(info)
}

/// `inspect_mp3` on the blocking pool.
pub async fn inspect_mp3_async(path: PathBuf) -> Result<Mp3Info> {
    tokio::task::spawn_blocking(move || inspect_mp3(&path))
        .await
        .context("MP3 inspection task failed")?
}

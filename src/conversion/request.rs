use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// MP3 bitrate offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Quality {
    /// 128 kbps, smallest files
    Kbps128,
    /// 192 kbps, the recommended balance
    #[default]
    Kbps192,
    /// 320 kbps, highest quality
    Kbps320,
}

impl Quality {
    pub const ALL: [Quality; 3] = [Quality::Kbps128, Quality::Kbps192, Quality::Kbps320];

    pub fn kbps(self) -> u16 {
        match self {
            Quality::Kbps128 => 128,
            Quality::Kbps192 => 192,
            Quality::Kbps320 => 320,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unsupported quality {0} kbps (expected 128, 192 or 320)")]
pub struct InvalidQuality(pub u16);

impl TryFrom<u16> for Quality {
    type Error = InvalidQuality;

    fn try_from(kbps: u16) -> Result<Self, Self::Error> {
        match kbps {
            128 => Ok(Quality::Kbps128),
            192 => Ok(Quality::Kbps192),
            320 => Ok(Quality::Kbps320),
            other => Err(InvalidQuality(other)),
        }
    }
}

impl From<Quality> for u16 {
    fn from(quality: Quality) -> Self {
        quality.kbps()
    }
}

impl FromStr for Quality {
    type Err = InvalidQuality;

    /// Accepts "192", "192k" and "192kbps".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .trim_end_matches("kbps")
            .trim_end_matches('k');
        let kbps = digits.parse::<u16>().map_err(|_| InvalidQuality(0))?;
        Quality::try_from(kbps)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}kbps", self.kbps())
    }
}

/// One user action: a URL plus the bitrate to encode at
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub url: String,

    #[serde(default)]
    pub quality: Quality,
}

impl ConversionRequest {
    pub fn new(url: impl Into<String>, quality: Quality) -> Self {
        Self {
            url: url.into(),
            quality,
        }
    }
}

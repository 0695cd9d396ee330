use anyhow::{anyhow, Result};
use std::path::Path;

/// Header-level facts about a track, enough to size a chart.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioInfo {
    pub sample_rate: u32,
    pub channels: u16,
    pub frames: u32, // samples per channel
}

impl AudioInfo {
    /// Probe an audio file without decoding its samples
    pub fn probe(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "wav" => Self::probe_wav(path),
            ext => Err(anyhow!("Unsupported audio format: {}", ext)),
        }
    }

    fn probe_wav(path: &Path) -> Result<Self> {
        let reader = hound::WavReader::open(path)
            .map_err(|e| anyhow!("Failed to open WAV file {}: {}", path.display(), e))?;

        let spec = reader.spec();
        Ok(AudioInfo {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            frames: reader.duration(),
        })
    }

    /// Get audio duration in seconds
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.frames as f64 / self.sample_rate as f64
        }
    }
}

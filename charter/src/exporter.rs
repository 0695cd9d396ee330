use crate::note::Note;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Generator identifier written into every chart's metadata.
pub const GENERATED_BY: &str = concat!("VampireAutoCharter v", env!("CARGO_PKG_VERSION"));

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Metadata {
    pub title: String,
    pub artist: String,
    pub difficulty: Difficulty,
    pub bpm: f64,
    pub duration: f64,
    pub generated_by: String,
}

impl Metadata {
    pub fn new(title: &str, artist: &str, bpm: f64, duration: f64) -> Self {
        Metadata {
            title: title.to_string(),
            artist: artist.to_string(),
            difficulty: Difficulty::Normal,
            bpm,
            duration,
            generated_by: GENERATED_BY.to_string(),
        }
    }
}

/// Full timed-event document for one track.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Chart {
    pub metadata: Metadata,
    pub notes: Vec<Note>,
}

impl Chart {
    pub fn new(metadata: Metadata, notes: Vec<Note>) -> Self {
        Chart { metadata, notes }
    }

    pub fn boss_notes(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter().filter(|n| n.kind.is_boss())
    }

    pub fn ordinary_notes(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter().filter(|n| !n.kind.is_boss())
    }

    /// Export to pretty JSON (two-space indent)
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| anyhow!("Invalid chart format: {}", e))
    }

    /// Save chart to file, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write chart to {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read chart {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("While loading {}", path.display()))
    }
}

use crate::audio::AudioInfo;
use crate::exporter::Chart;
use crate::generator::{ChartGenerator, GeneratorConfig};
use crate::rng::{create_rng, entropy_rng, job_rng};
use crate::validate::validate;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("chart '{title}' needs either a duration or an audio file")]
    MissingDuration { title: String },

    #[error("chart '{title}' has an invalid bpm {bpm}")]
    InvalidBpm { title: String, bpm: f64 },
}

/// One entry of the chart list: what to generate and where to write it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChartJob {
    pub title: String,
    #[serde(default = "default_artist")]
    pub artist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<PathBuf>,
    pub bpm: f64,
    #[serde(alias = "outputPath")]
    pub output_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_artist() -> String {
    "Unknown Artist".to_string()
}

impl ChartJob {
    /// Explicit duration wins, otherwise the length of the audio file.
    pub fn resolve_duration(&self) -> Result<f64> {
        if let Some(duration) = self.duration {
            return Ok(duration);
        }

        match &self.audio {
            Some(audio) => {
                let info = AudioInfo::probe(audio)?;
                log::debug!(
                    "{}: {} Hz, {} channels, {:.3}s",
                    audio.display(),
                    info.sample_rate,
                    info.channels,
                    info.duration()
                );
                Ok(info.duration())
            }
            None => Err(JobError::MissingDuration { title: self.title.clone() }.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobList {
    pub jobs: Vec<ChartJob>,
}

impl JobList {
    /// Load a JSON array of chart jobs
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read chart list {}", path.display()))?;
        let jobs: Vec<ChartJob> = serde_json::from_str(&content)
            .with_context(|| format!("Invalid chart list {}", path.display()))?;

        if jobs.is_empty() {
            log::warn!("Chart list {} is empty", path.display());
        }

        Ok(JobList { jobs })
    }

    /// The two stage tracks shipped with the game.
    pub fn builtin() -> Self {
        JobList {
            jobs: vec![
                ChartJob {
                    title: "Electric Shadows Whispering Doom".to_string(),
                    artist: default_artist(),
                    duration: Some(240.0),
                    audio: None,
                    bpm: 95.0,
                    output_path: PathBuf::from("client/public/charts/electric-shadows-whispering-doom.json"),
                    seed: None,
                },
                ChartJob {
                    title: "Eternal Bloodlust".to_string(),
                    artist: default_artist(),
                    duration: Some(267.0),
                    audio: None,
                    bpm: 110.0,
                    output_path: PathBuf::from("client/public/charts/eternal-bloodlust.json"),
                    seed: None,
                },
            ],
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Base for relative output paths
    pub output_dir: Option<PathBuf>,
    /// Base seed; each job gets its own derived stream
    pub seed: Option<u64>,
    pub generator: GeneratorConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct JobReport {
    pub output: PathBuf,
    pub notes: usize,
    pub bosses: usize,
    pub duration: f64,
    pub bpm: f64,
}

impl fmt::Display for JobReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Generated {}: {} notes, duration={}s, bpm={}",
            self.output.display(),
            self.notes,
            self.duration,
            self.bpm
        )
    }
}

/// Generate and write the chart for `jobs[index]`.
pub fn run_job(index: usize, job: &ChartJob, options: &RunOptions) -> Result<JobReport> {
    if !(job.bpm.is_finite() && job.bpm > 0.0) {
        return Err(JobError::InvalidBpm { title: job.title.clone(), bpm: job.bpm }.into());
    }

    let duration = job.resolve_duration()?;
    let mut rng = match (job.seed, options.seed) {
        (Some(seed), _) => create_rng(seed),
        (None, Some(base)) => job_rng(base, index),
        (None, None) => entropy_rng(),
    };

    log::info!(
        "Generating '{}' ({}s @ {} bpm, seed {:?}, base seed {:?})",
        job.title,
        duration,
        job.bpm,
        job.seed,
        options.seed
    );

    let generator = ChartGenerator::new(options.generator.clone());
    let chart = generator.generate(&mut rng, &job.title, &job.artist, duration, job.bpm);

    for issue in validate(&chart, generator.config()) {
        log::warn!("{}: {}", job.title, issue);
    }

    let output = match &options.output_dir {
        Some(dir) => dir.join(&job.output_path),
        None => job.output_path.clone(),
    };
    chart.save(&output)?;

    Ok(report(&chart, output))
}

fn report(chart: &Chart, output: PathBuf) -> JobReport {
    JobReport {
        output,
        notes: chart.notes.len(),
        bosses: chart.boss_notes().count(),
        duration: chart.metadata.duration,
        bpm: chart.metadata.bpm,
    }
}

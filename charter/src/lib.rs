pub mod audio;
pub mod exporter;
pub mod generator;
pub mod jobs;
pub mod note;
pub mod rng;
pub mod validate;

pub use exporter::{Chart, Difficulty, Metadata};
pub use generator::{ChartGenerator, GeneratorConfig};
pub use note::{Note, NoteKind, Position};

use rand::Rng;

/// Generate a chart with the default placement constants.
pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    title: &str,
    artist: &str,
    duration: f64,
    bpm: f64,
) -> Chart {
    ChartGenerator::default().generate(rng, title, artist, duration, bpm)
}

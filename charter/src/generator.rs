use crate::exporter::{Chart, Metadata};
use crate::note::{round_to, Note, NoteKind, Position};
use crate::rng::entropy_rng;
use rand::Rng;
use std::ops::{Range, RangeInclusive};

/// Placement constants for ordinary and boss notes.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorConfig {
    pub first_note_time: f64,
    pub spacing: Range<f64>,   // random gap between ordinary notes, must start above 0
    pub tail_buffer: f64,      // no ordinary note within this many seconds of the end
    pub note_x: RangeInclusive<i32>,
    pub note_y: RangeInclusive<i32>,
    pub boss_start: f64,
    pub boss_period: f64,
    pub boss_tail_buffer: f64,
    pub boss_x: RangeInclusive<i32>,
    pub boss_y: RangeInclusive<i32>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            first_note_time: 0.5,
            spacing: 0.5..1.5,
            tail_buffer: 2.0,
            note_x: 100..=700,
            note_y: 50..=300,
            boss_start: 30.0,
            boss_period: 60.0,
            boss_tail_buffer: 10.0,
            boss_x: 400..=600,
            boss_y: 100..=250,
        }
    }
}

/// Places randomly spaced ordinary notes plus periodic boss notes.
#[derive(Clone, Debug, Default)]
pub struct ChartGenerator {
    config: GeneratorConfig,
}

impl ChartGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        ChartGenerator { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a chart drawing every random value from `rng`.
    ///
    /// Ordinary notes are drawn first, then bosses, and the two streams are
    /// merged with a stable sort on time. A non-finite or non-positive
    /// duration produces a chart with no notes.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        title: &str,
        artist: &str,
        duration: f64,
        bpm: f64,
    ) -> Chart {
        let metadata = Metadata::new(title, artist, bpm, duration);

        if !duration.is_finite() || duration <= 0.0 {
            log::warn!("Duration {} for '{}' is not usable, emitting empty chart", duration, title);
            return Chart::new(metadata, Vec::new());
        }

        let mut notes = self.place_ordinary(rng, duration);
        let ordinary_count = notes.len();
        notes.extend(self.place_bosses(rng, duration));

        notes.sort_by(|a, b| a.time.total_cmp(&b.time));

        log::debug!(
            "Placed {} ordinary and {} boss notes for '{}'",
            ordinary_count,
            notes.len() - ordinary_count,
            title
        );

        Chart::new(metadata, notes)
    }

    /// Generate with a fresh entropy-seeded stream; output is not reproducible.
    pub fn generate_unseeded(&self, title: &str, artist: &str, duration: f64, bpm: f64) -> Chart {
        self.generate(&mut entropy_rng(), title, artist, duration, bpm)
    }

    fn place_ordinary<R: Rng + ?Sized>(&self, rng: &mut R, duration: f64) -> Vec<Note> {
        let spacing = self.config.spacing.clone();
        if spacing.is_empty() || spacing.start <= 0.0 {
            log::warn!("Note spacing {:?} cannot advance time, skipping ordinary notes", spacing);
            return Vec::new();
        }

        let end = duration - self.config.tail_buffer;
        let mut notes = Vec::new();
        let mut time = self.config.first_note_time;

        while time < end {
            // the written time is rounded, so it is the one bounded by the tail
            if round_to(time, 3) > end {
                break;
            }

            let kind = NoteKind::ORDINARY[rng.gen_range(0..NoteKind::ORDINARY.len())];
            let position = Position {
                x: rng.gen_range(self.config.note_x.clone()),
                y: rng.gen_range(self.config.note_y.clone()),
            };
            let strength = rng.gen_range(0.0..=1.0);
            notes.push(Note::ordinary(time, kind, position, strength));

            time += rng.gen_range(spacing.clone());
        }

        notes
    }

    fn place_bosses<R: Rng + ?Sized>(&self, rng: &mut R, duration: f64) -> Vec<Note> {
        if self.config.boss_period <= 0.0 {
            log::warn!("Boss period {} cannot advance time, skipping bosses", self.config.boss_period);
            return Vec::new();
        }

        let end = duration - self.config.boss_tail_buffer;
        let mut bosses = Vec::new();
        let mut time = self.config.boss_start;

        while time < end {
            let position = Position {
                x: rng.gen_range(self.config.boss_x.clone()),
                y: rng.gen_range(self.config.boss_y.clone()),
            };
            bosses.push(Note::boss(time, position));
            time += self.config.boss_period;
        }

        bosses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;
    use rand::RngCore;

    /// Random source that only ever yields zero bits, so every range draw
    /// lands on its lower bound.
    struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            dest.fill(0);
            Ok(())
        }
    }

    /// Random source whose 64-bit draws all carry `fraction` in the float
    /// mantissa, so every ordinary gap is `0.5 + fraction`. 32-bit draws are
    /// zero, pinning positions to their lower bounds.
    struct GapRng(u64);

    impl GapRng {
        fn new(fraction: f64) -> Self {
            GapRng(((fraction * (1u64 << 52) as f64).round() as u64) << 12)
        }
    }

    impl RngCore for GapRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            dest.fill(0);
            Ok(())
        }
    }

    fn expected_boss_count(duration: f64) -> usize {
        if duration > 40.0 {
            ((duration - 40.0) / 60.0).floor() as usize + 1
        } else {
            0
        }
    }

    #[test]
    fn test_fixed_sequence_source() {
        let chart = ChartGenerator::default().generate(&mut ZeroRng, "t", "a", 10.0, 120.0);

        // 0.5, 1.0, ... 7.5 with the minimum 0.5s gap
        assert_eq!(chart.notes.len(), 15);
        for (i, note) in chart.notes.iter().enumerate() {
            assert_eq!(note.time, 0.5 + 0.5 * i as f64);
            assert_eq!(note.kind, NoteKind::BatPurple);
            assert_eq!(note.position, Position { x: 100, y: 50 });
            assert_eq!(note.strength, 0.0);
        }
    }

    #[test]
    fn test_notes_respect_bounds() {
        let generator = ChartGenerator::default();
        for (seed, duration) in [(1u64, 3.0), (2, 45.5), (3, 123.4), (4, 240.0), (5, 267.0), (6, 600.5)] {
            let chart = generator.generate(&mut create_rng(seed), "t", "a", duration, 100.0);

            for note in &chart.notes {
                assert!(note.time >= 0.5 && note.time < duration);
                if note.kind.is_boss() {
                    assert!(note.time >= 30.0);
                    assert!(note.time <= duration - 10.0);
                    assert_eq!(note.strength, 1.0);
                    assert!((400..=600).contains(&note.position.x));
                    assert!((100..=250).contains(&note.position.y));
                } else {
                    assert!(note.time <= duration - 2.0);
                    assert!((0.0..=1.0).contains(&note.strength));
                    assert!((100..=700).contains(&note.position.x));
                    assert!((50..=300).contains(&note.position.y));
                }
            }

            assert!(chart.notes.windows(2).all(|w| w[0].time <= w[1].time));
        }
    }

    #[test]
    fn test_rounding_never_crosses_tail() {
        // gaps of 0.5004s put the third note at 1.5008, which rounds to 1.501;
        // a cutoff of 1.5009 sits between the raw and the rounded time
        let duration = 3.5009;
        let chart = ChartGenerator::default().generate(&mut GapRng::new(0.0004), "t", "a", duration, 120.0);

        let times: Vec<f64> = chart.notes.iter().map(|n| n.time).collect();
        assert_eq!(times, vec![0.5, 1.0]);
        assert!(chart.notes.iter().all(|n| n.time <= duration - 2.0));
    }

    #[test]
    fn test_fractional_durations_respect_tail() {
        let generator = ChartGenerator::default();
        for seed in 0..40u64 {
            let duration = 20.0 + seed as f64 * 7.123_456_7;
            let chart = generator.generate(&mut create_rng(seed), "t", "a", duration, 100.0);
            let validated = crate::validate::validate(&chart, generator.config());
            assert!(validated.is_empty(), "seed {}: {:?}", seed, validated);
        }
    }

    #[test]
    fn test_ordinary_spacing_window() {
        let duration = 300.0;
        let chart = ChartGenerator::default().generate(&mut create_rng(21), "t", "a", duration, 100.0);
        let times: Vec<f64> = chart.ordinary_notes().map(|n| n.time).collect();

        assert_eq!(times[0], 0.5);
        for pair in times.windows(2) {
            let gap = pair[1] - pair[0];
            assert!((0.5 - 0.001..=1.5 + 0.001).contains(&gap), "gap {}", gap);
        }

        // placement keeps going until the tail
        let last = *times.last().unwrap();
        assert!(last > duration - 2.0 - 1.5 - 0.001);
        assert!(last <= duration - 2.0);
    }

    #[test]
    fn test_boss_cadence() {
        let generator = ChartGenerator::default();
        for duration in [12.0, 40.0, 41.0, 75.0, 99.5, 240.0, 267.0, 600.5] {
            let chart = generator.generate(&mut create_rng(9), "t", "a", duration, 100.0);
            let bosses: Vec<f64> = chart.boss_notes().map(|n| n.time).collect();

            assert_eq!(bosses.len(), expected_boss_count(duration), "duration {}", duration);
            for (i, time) in bosses.iter().enumerate() {
                assert_eq!(*time, 30.0 + 60.0 * i as f64);
            }
        }
    }

    #[test]
    fn test_boss_window_is_exclusive() {
        // 30 and 90 fit, 90 is not strictly before 100 - 10
        let chart = ChartGenerator::default().generate(&mut create_rng(1), "t", "a", 100.0, 100.0);
        assert_eq!(chart.boss_notes().count(), 1);
    }

    #[test]
    fn test_four_minute_track() {
        let chart = ChartGenerator::default().generate(&mut create_rng(11), "t", "a", 240.0, 95.0);
        let last_boss = chart.boss_notes().last().unwrap();

        assert!(last_boss.time <= 230.0);
        assert_eq!(chart.metadata.duration, 240.0);
        assert_eq!(chart.metadata.bpm, 95.0);
    }

    #[test]
    fn test_one_minute_track() {
        let chart = ChartGenerator::default().generate(&mut create_rng(12), "t", "a", 60.0, 120.0);

        assert!(chart.boss_notes().count() <= 1);
        assert_eq!(chart.metadata.bpm, 120.0);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let generator = ChartGenerator::default();
        let a = generator.generate(&mut create_rng(77), "t", "a", 180.0, 128.0);
        let b = generator.generate(&mut create_rng(77), "t", "a", 180.0, 128.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_degenerate_durations() {
        let generator = ChartGenerator::default();
        for duration in [0.0, -5.0, f64::NAN, f64::INFINITY, 2.4] {
            let chart = generator.generate_unseeded("t", "a", duration, 0.0);
            assert!(chart.notes.is_empty());
        }
    }

    #[test]
    fn test_unusable_spacing_skips_ordinary_notes() {
        let config = GeneratorConfig {
            spacing: 0.0..1.0,
            ..GeneratorConfig::default()
        };
        let chart = ChartGenerator::new(config).generate(&mut create_rng(3), "t", "a", 100.0, 90.0);
        assert!(chart.ordinary_notes().next().is_none());
        assert_eq!(chart.boss_notes().count(), 1);
    }
}

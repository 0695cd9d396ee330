use crate::exporter::Chart;
use crate::generator::GeneratorConfig;
use crate::note::NoteKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartIssue {
    #[error("note {index} at {time}s comes before the previous note at {previous}s")]
    Unsorted { index: usize, time: f64, previous: f64 },

    #[error("note {index} at {time}s is before the first playable time {start}s")]
    BeforeStart { index: usize, time: f64, start: f64 },

    #[error("note {index} at {time}s is past the ordinary cutoff {limit}s")]
    PastTail { index: usize, time: f64, limit: f64 },

    #[error("boss note {index} at {time}s is past the boss cutoff {limit}s")]
    BossPastTail { index: usize, time: f64, limit: f64 },

    #[error("note {index} has strength {strength} outside [0, 1]")]
    StrengthOutOfRange { index: usize, strength: f64 },

    #[error("boss note {index} has strength {strength}, expected 1.0")]
    BossStrength { index: usize, strength: f64 },

    #[error("{kind} note {index} at ({x}, {y}) is outside its play area")]
    PositionOutOfBounds { index: usize, kind: &'static str, x: i32, y: i32 },
}

/// Check a chart against the placement rules of `config`.
pub fn validate(chart: &Chart, config: &GeneratorConfig) -> Vec<ChartIssue> {
    let duration = chart.metadata.duration;
    let mut issues = Vec::new();
    let mut previous: Option<f64> = None;

    for (index, note) in chart.notes.iter().enumerate() {
        let time = note.time;

        if let Some(previous) = previous {
            if time < previous {
                issues.push(ChartIssue::Unsorted { index, time, previous });
            }
        }
        previous = Some(time);

        let (start, limit, x_range, y_range) = match note.kind {
            NoteKind::Boss => (
                config.boss_start,
                duration - config.boss_tail_buffer,
                &config.boss_x,
                &config.boss_y,
            ),
            _ => (
                config.first_note_time,
                duration - config.tail_buffer,
                &config.note_x,
                &config.note_y,
            ),
        };

        if time < start {
            issues.push(ChartIssue::BeforeStart { index, time, start });
        }

        if time > limit {
            if note.kind.is_boss() {
                issues.push(ChartIssue::BossPastTail { index, time, limit });
            } else {
                issues.push(ChartIssue::PastTail { index, time, limit });
            }
        }

        if note.kind.is_boss() {
            if note.strength != 1.0 {
                issues.push(ChartIssue::BossStrength { index, strength: note.strength });
            }
        } else if !(0.0..=1.0).contains(&note.strength) {
            issues.push(ChartIssue::StrengthOutOfRange { index, strength: note.strength });
        }

        if !x_range.contains(&note.position.x) || !y_range.contains(&note.position.y) {
            issues.push(ChartIssue::PositionOutOfBounds {
                index,
                kind: note.kind.as_str(),
                x: note.position.x,
                y: note.position.y,
            });
        }
    }

    issues
}

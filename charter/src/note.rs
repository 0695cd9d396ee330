use serde::{Deserialize, Serialize};

/// Visual variant of a note. The four bats are ordinary tokens; `Boss` is the
/// high-intensity spike inserted on a fixed cadence.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    BatPurple,
    BatBlue,
    BatGreen,
    BatRed,
    Boss,
}

impl NoteKind {
    /// Variants an ordinary note draws from, in draw order.
    pub const ORDINARY: [NoteKind; 4] = [
        NoteKind::BatPurple,
        NoteKind::BatBlue,
        NoteKind::BatGreen,
        NoteKind::BatRed,
    ];

    pub fn is_boss(&self) -> bool {
        matches!(self, NoteKind::Boss)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NoteKind::BatPurple => "bat_purple",
            NoteKind::BatBlue => "bat_blue",
            NoteKind::BatGreen => "bat_green",
            NoteKind::BatRed => "bat_red",
            NoteKind::Boss => "boss",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Note {
    pub time: f64, // seconds from track start, millisecond precision
    #[serde(rename = "type")]
    pub kind: NoteKind,
    pub position: Position,
    pub strength: f64, // 0..=1, always 1.0 for bosses
}

impl Note {
    /// Ordinary note; time is rounded to 3 decimals and strength to 2.
    pub fn ordinary(time: f64, kind: NoteKind, position: Position, strength: f64) -> Self {
        Note {
            time: round_to(time, 3),
            kind,
            position,
            strength: round_to(strength, 2),
        }
    }

    pub fn boss(time: f64, position: Position) -> Self {
        Note {
            time: round_to(time, 3),
            kind: NoteKind::Boss,
            position,
            strength: 1.0,
        }
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

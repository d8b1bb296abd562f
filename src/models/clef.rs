//! Clefs and the staff-local index used to place notes vertically.

use super::pitch::{Letter, Pitch};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of the top staff line. The bottom line is 0.
pub const TOP_LINE_INDEX: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clef {
    Treble,
    Bass,
}

impl Clef {
    pub const BOTH: [Clef; 2] = [Clef::Treble, Clef::Bass];

    /// The pitch sitting on the bottom staff line.
    pub fn reference_pitch(self) -> Pitch {
        match self {
            Clef::Treble => Pitch::new(Letter::E, 4),
            Clef::Bass => Pitch::new(Letter::G, 2),
        }
    }

    /// Diatonic distance from the bottom line. 0 = bottom line, 8 = top
    /// line; values outside `[0, 8]` need ledger lines.
    pub fn staff_local_index(self, pitch: Pitch) -> i32 {
        pitch.diatonic_number() - self.reference_pitch().diatonic_number()
    }
}

impl fmt::Display for Clef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clef::Treble => write!(f, "treble"),
            Clef::Bass => write!(f, "bass"),
        }
    }
}

/// Returns `true` when the index lies on or between the five staff lines.
pub fn is_on_staff(index: i32) -> bool {
    (0..=TOP_LINE_INDEX).contains(&index)
}

/// Number of ledger lines a note at this index needs.
pub fn ledger_lines_needed(index: i32) -> i32 {
    if is_on_staff(index) {
        0
    } else if index < 0 {
        (-index) / 2
    } else {
        (index - TOP_LINE_INDEX) / 2
    }
}

/// Vertical layout of one staff, used by render sinks.
///
/// Y grows downward: higher staff indices map to smaller Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaffGeometry {
    pub bottom_line_y: f32,
    pub line_spacing: f32,
}

impl StaffGeometry {
    pub fn new(bottom_line_y: f32, line_spacing: f32) -> Self {
        Self {
            bottom_line_y,
            line_spacing,
        }
    }

    /// Each index step is half a line spacing.
    pub fn y_for_index(&self, index: i32) -> f32 {
        self.bottom_line_y - index as f32 * (self.line_spacing / 2.0)
    }
}

impl Default for StaffGeometry {
    fn default() -> Self {
        Self::new(240.0, 20.0)
    }
}

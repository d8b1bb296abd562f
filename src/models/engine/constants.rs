//! Playfield geometry shared by the spawner, motion engine and renderers.
//!
//! Positions are horizontal playfield units. Notes enter on the right and
//! travel left toward the ship sitting just after the clef glyph.

/// X where new notes appear.
pub const SPAWN_X: f64 = 800.0;
/// X of the clef glyph.
pub const CLEF_X: f64 = 40.0;
/// Distance from the clef glyph to the collision line.
pub const COLLISION_OFFSET: f64 = 80.0;
/// Notes at or left of this line have hit the ship.
pub const COLLISION_X: f64 = CLEF_X + COLLISION_OFFSET;
/// Left edge of the visible playfield.
pub const VISIBLE_MIN_X: f64 = 0.0;

/// Delay before respawning after a chord resolves, in ms.
pub const CHORD_TRANSITION_DELAY_MS: f64 = 150.0;
/// Partial chord presses older than this (with progress) are re-examined.
pub const CHORD_GRACE_PERIOD_MS: f64 = 300.0;
/// Idle time after which partial chord progress resets.
pub const CHORD_RESET_IDLE_MS: f64 = CHORD_GRACE_PERIOD_MS * 3.0;
/// Multiple wrong notes inside this window cost one life.
pub const WRONG_NOTE_FORGIVENESS_MS: f64 = 150.0;

/// Chord progress entries older than this are evicted.
pub const CHORD_PROGRESS_MAX_AGE_MS: f64 = 5000.0;
/// Eviction kicks in above this many tracked chords...
pub const CHORD_PROGRESS_MAX_TRACKED: usize = 10;
/// ...keeping only the most recent ones.
pub const CHORD_PROGRESS_KEEP: usize = 5;

pub const MIN_CHORD_SIZE: usize = 2;
pub const MAX_CHORD_SIZE: usize = 4;
/// Widest chord span, in semitones above the anchor.
pub const CHORD_SPAN_SEMITONES: i32 = 12;
/// Random draws before the chord builder falls back to filling.
pub const CHORD_MAX_DRAWS: usize = 24;

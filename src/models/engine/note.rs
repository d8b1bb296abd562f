//! Notes travelling across the staff.

use super::constants::COLLISION_X;
use crate::models::catalog::CatalogEntry;
use crate::models::clef::Clef;
use crate::models::pitch::{Letter, Pitch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChordId(pub u64);

/// A note on screen, moving toward the ship.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveNote {
    pub id: NoteId,
    pub pitch: Pitch,
    pub clef: Clef,
    pub staff_index: i32,
    /// Horizontal playfield position.
    pub x: f64,
    /// Units per tick, fixed at spawn time.
    pub speed: f64,
    /// Shared by every member of a chord.
    pub chord_id: Option<ChordId>,
}

impl ActiveNote {
    pub fn from_entry(id: NoteId, entry: &CatalogEntry, x: f64, speed: f64) -> Self {
        Self {
            id,
            pitch: entry.pitch,
            clef: entry.clef,
            staff_index: entry.staff_index,
            x,
            speed,
            chord_id: None,
        }
    }

    pub fn letter(&self) -> Letter {
        self.pitch.letter
    }

    pub fn is_chord(&self) -> bool {
        self.chord_id.is_some()
    }

    /// Remaining distance to the collision line.
    pub fn distance_to_collision(&self) -> f64 {
        self.x - COLLISION_X
    }

    pub fn has_collided(&self) -> bool {
        self.x <= COLLISION_X
    }

    /// Whether `letter`/`octave` names this note. The octave only matters
    /// in strict mode and only when the input supplied one.
    pub fn matches(&self, letter: Letter, octave: Option<i32>, strict_octave: bool) -> bool {
        if self.pitch.letter != letter {
            return false;
        }
        match (strict_octave, octave) {
            (true, Some(o)) => self.pitch.octave == o,
            _ => true,
        }
    }
}

/// What the spawner produced for one slot.
#[derive(Clone, Debug, PartialEq)]
pub enum SpawnResult {
    Single(ActiveNote),
    /// Members sorted ascending by pitch, all sharing one chord id.
    Chord(Vec<ActiveNote>),
}

impl SpawnResult {
    pub fn notes(&self) -> &[ActiveNote] {
        match self {
            SpawnResult::Single(note) => std::slice::from_ref(note),
            SpawnResult::Chord(notes) => notes,
        }
    }
}

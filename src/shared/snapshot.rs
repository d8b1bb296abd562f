//! Render snapshots for inter-thread communication.
//!
//! Snapshots are immutable captures of game state sent from the logic thread
//! to the render side. This decouples game logic from drawing.

use crate::models::clef::Clef;
use crate::models::engine::{ChordId, NoteId};
use crate::models::mode::ClefMode;
use crate::models::pitch::Pitch;
use std::time::Instant;

/// High-level render state.
#[derive(Clone, Debug)]
pub enum RenderState {
    /// Nothing published yet.
    Empty,
    /// Active (or frozen, after game over) gameplay.
    InGame(GameplaySnapshot),
}

/// One note as the renderer needs it.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderNote {
    pub id: NoteId,
    pub pitch: Pitch,
    pub clef: Clef,
    /// Staff-local index; see `StaffGeometry::y_for_index`.
    pub staff_index: i32,
    pub x: f64,
    pub chord_id: Option<ChordId>,
    /// Ledger lines to draw above or below the staff.
    pub ledger_lines: i32,
}

/// Snapshot of gameplay state for rendering.
#[derive(Clone, Debug)]
pub struct GameplaySnapshot {
    /// Wall-clock time when snapshot was created.
    pub timestamp: Instant,
    /// Session clock at capture time.
    pub now_ms: f64,

    pub clef_mode: ClefMode,
    /// Staffs to draw.
    pub clefs: Vec<Clef>,
    pub notes: Vec<RenderNote>,

    pub score: u32,
    pub lives: u32,
    pub level: u32,
    pub notes_destroyed: u32,
    pub left_hand_score: u32,
    pub right_hand_score: u32,

    /// Current note speed (units per tick).
    pub speed: f64,
    pub spawn_interval_ms: f64,

    pub game_over: bool,
    /// Best score across sessions in this run.
    pub best_score: u32,
}

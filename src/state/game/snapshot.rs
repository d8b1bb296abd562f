//! Snapshot creation for GameSession - create_snapshot

use super::GameSession;
use crate::models::clef::ledger_lines_needed;
use crate::shared::snapshot::{GameplaySnapshot, RenderNote};

impl GameSession {
    /// Captures the session for rendering.
    pub fn create_snapshot(&self, now_ms: f64, best_score: u32) -> GameplaySnapshot {
        let mut notes: Vec<RenderNote> = self
            .active_notes
            .iter()
            .map(|n| RenderNote {
                id: n.id,
                pitch: n.pitch,
                clef: n.clef,
                staff_index: n.staff_index,
                x: n.x,
                chord_id: n.chord_id,
                ledger_lines: ledger_lines_needed(n.staff_index),
            })
            .collect();
        notes.sort_by(|a, b| a.x.total_cmp(&b.x));

        GameplaySnapshot {
            timestamp: std::time::Instant::now(),
            now_ms,
            clef_mode: self.policy.clef_mode,
            clefs: self.policy.active_clefs().to_vec(),
            notes,
            score: self.stats.score,
            lives: self.stats.lives,
            level: self.stats.level,
            notes_destroyed: self.stats.notes_destroyed,
            left_hand_score: self.stats.left_hand_score,
            right_hand_score: self.stats.right_hand_score,
            speed: self.stats.speed(),
            spawn_interval_ms: self.stats.spawn_interval_ms(),
            game_over: self.is_game_over(),
            best_score: best_score.max(self.stats.score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::models::clef::Clef;
    use crate::models::mode::ClefMode;
    use crate::models::pitch::Letter;

    #[test]
    fn snapshot_orders_notes_and_counts_ledger_lines() {
        let mut session = empty_session(&settings(ClefMode::Grand));
        place(&mut session, Letter::A, 5, Clef::Treble, 600.0);
        place(&mut session, Letter::C, 4, Clef::Bass, 300.0);
        session.stats.score = 12;

        let snap = session.create_snapshot(42.0, 5);
        assert_eq!(snap.clefs, vec![Clef::Treble, Clef::Bass]);
        assert_eq!(snap.notes.len(), 2);
        assert_eq!(snap.notes[0].clef, Clef::Bass);
        // C4 sits one ledger line above the bass staff, A5 one above treble.
        assert_eq!(snap.notes[0].ledger_lines, 1);
        assert_eq!(snap.notes[1].ledger_lines, 1);
        assert_eq!(snap.best_score, 12);
        assert!(!snap.game_over);
    }
}

//! Note motion and collision: update_notes

use super::GameSession;
use crate::models::engine::{NoteId, VISIBLE_MIN_X};
use crate::shared::feedback::FeedbackEvent;

impl GameSession {
    /// Moves every note and resolves collisions with the ship.
    pub(crate) fn update_notes(&mut self, now_ms: f64) {
        for note in &mut self.active_notes {
            note.x -= note.speed;
        }

        // Earliest collider first; a chord counts once.
        let mut collided: Vec<(f64, NoteId)> = Vec::new();
        let mut seen_chords = Vec::new();
        for note in self.active_notes.iter().filter(|n| n.has_collided()) {
            if let Some(cid) = note.chord_id {
                if seen_chords.contains(&cid) {
                    continue;
                }
                seen_chords.push(cid);
            }
            collided.push((note.x, note.id));
        }
        collided.sort_by(|a, b| a.0.total_cmp(&b.0));

        for (_, note_id) in collided {
            if !self.running {
                break;
            }
            self.process_miss(note_id, now_ms);
        }

        let before = self.active_notes.len();
        self.active_notes.retain(|n| n.x >= VISIBLE_MIN_X);
        if self.active_notes.len() != before {
            log::debug!(
                "NOTES: discarded {} note(s) past the visible area",
                before - self.active_notes.len()
            );
        }
    }

    /// A note (or chord) reached the ship.
    fn process_miss(&mut self, note_id: NoteId, now_ms: f64) {
        let removed = self.remove_group(note_id);
        let Some(first) = removed.first() else {
            return;
        };
        let clef = first.clef;
        let was_chord = first.is_chord();
        let pitches = removed.iter().map(|n| n.pitch).collect();

        log::debug!("NOTES: miss on {} staff ({} note(s))", clef, removed.len());
        self.feedback.push(FeedbackEvent::Miss { clef, pitches });

        if self.stats.lose_life() {
            self.game_over();
            return;
        }
        self.request_respawn(clef, was_chord, now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::models::clef::Clef;
    use crate::models::engine::COLLISION_X;
    use crate::models::mode::ClefMode;
    use crate::models::pitch::Letter;
    use crate::shared::feedback::FeedbackEvent;

    #[test]
    fn notes_move_by_their_speed() {
        let mut session = empty_session(&settings(ClefMode::Treble));
        place(&mut session, Letter::C, 5, Clef::Treble, 500.0);
        session.update(16.0);
        assert!((session.active_notes[0].x - (500.0 - 0.8)).abs() < 1e-9);
    }

    #[test]
    fn miss_costs_a_life_and_respawns() {
        let mut session = empty_session(&settings(ClefMode::Treble));
        place(&mut session, Letter::C, 5, Clef::Treble, COLLISION_X + 0.5);
        session.update(16.0);

        assert_eq!(session.stats.lives, 2);
        assert_eq!(session.active_notes.len(), 1);
        assert!(session.active_notes[0].x > COLLISION_X + 100.0);
        assert!(matches!(
            session.drain_feedback().as_slice(),
            [FeedbackEvent::Miss { clef: Clef::Treble, .. }]
        ));
    }

    #[test]
    fn chord_miss_removes_all_members_once() {
        let mut session = empty_session(&settings(ClefMode::Treble));
        let chord = place_chord(
            &mut session,
            &[(Letter::C, 5), (Letter::E, 5), (Letter::G, 5)],
            Clef::Treble,
            COLLISION_X + 0.5,
        );
        session.chords.press(chord, Letter::C, 0.0, 3);
        session.update(16.0);

        assert_eq!(session.stats.lives, 2);
        assert!(session.active_notes.is_empty());
        assert!(session.chord_progress(chord).is_none());
        // Chord transition gap before the next group.
        assert_eq!(session.scheduler.pending(), 1);
    }

    #[test]
    fn third_miss_ends_the_game() {
        let mut session = empty_session(&settings(ClefMode::Treble));
        let mut now = 0.0;
        for expected_lives in [2, 1] {
            session.active_notes.clear();
            place(&mut session, Letter::D, 5, Clef::Treble, COLLISION_X + 0.1);
            now += 200.0;
            session.update(now);
            assert_eq!(session.stats.lives, expected_lives);
            assert!(session.running);
        }

        session.active_notes.clear();
        place(&mut session, Letter::D, 5, Clef::Treble, COLLISION_X + 0.1);
        now += 200.0;
        session.update(now);
        assert_eq!(session.stats.lives, 0);
        assert!(session.is_game_over());
        let events = session.drain_feedback();
        assert!(matches!(events.last(), Some(FeedbackEvent::GameOver { .. })));
    }

    #[test]
    fn dual_misses_in_one_tick_stop_at_game_over() {
        let mut session = empty_session(&settings(ClefMode::Grand));
        session.stats.lives = 1;
        place(&mut session, Letter::C, 5, Clef::Treble, COLLISION_X + 0.1);
        place(&mut session, Letter::C, 3, Clef::Bass, COLLISION_X + 0.2);
        session.update(16.0);
        assert!(session.is_game_over());
        assert_eq!(session.stats.lives, 0);
    }
}

//! Input resolution: matching pitch events against the notes on screen.

use super::GameSession;
use crate::input::events::PitchEvent;
use crate::models::clef::Clef;
use crate::models::engine::{ActiveNote, ChordId, NoteId, WRONG_NOTE_FORGIVENESS_MS};
use crate::models::mode::Hand;
use crate::models::pitch::Letter;
use crate::shared::feedback::FeedbackEvent;
use std::collections::BTreeSet;

/// What a pitch event did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// A single note was destroyed.
    Correct,
    /// A chord letter registered; more are needed.
    ChordPartial,
    /// The last missing chord letter arrived.
    ChordComplete,
    /// Nothing matched. `counted` is false inside the forgiveness window.
    Wrong { counted: bool },
    /// Game over, or nothing on screen to act on.
    Ignored,
}

impl GameSession {
    /// Resolves one pitch event from the keyboard, a button or MIDI.
    pub fn handle_pitch(&mut self, event: &PitchEvent, now_ms: f64) -> InputOutcome {
        if !self.running {
            return InputOutcome::Ignored;
        }

        if let Some(candidate) = self.find_candidate(event.letter, event.target_clef) {
            let group = self.group_of(candidate);
            let strict = self.policy.strict_octave;
            let matched = group
                .iter()
                .find(|n| n.matches(event.letter, event.octave, strict))
                .map(|n| (n.id, n.chord_id));

            match matched {
                Some((_, Some(chord_id))) => {
                    return self.register_chord_press(chord_id, event.letter, now_ms);
                }
                Some((note_id, None)) => {
                    self.complete_single(note_id, now_ms);
                    return InputOutcome::Correct;
                }
                None => {}
            }
        }

        self.handle_wrong_note(event.target_clef, now_ms)
    }

    /// Most imminent note with this letter that the input may act on.
    fn find_candidate(&self, letter: Letter, target: Option<Clef>) -> Option<NoteId> {
        self.active_notes
            .iter()
            .filter(|n| n.letter() == letter && self.policy.accepts(n.clef, target))
            .min_by(|a, b| a.distance_to_collision().total_cmp(&b.distance_to_collision()))
            .map(|n| n.id)
    }

    /// The note itself, or every member of its chord.
    fn group_of(&self, note_id: NoteId) -> Vec<ActiveNote> {
        let chord_id = self
            .active_notes
            .iter()
            .find(|n| n.id == note_id)
            .and_then(|n| n.chord_id);
        self.active_notes
            .iter()
            .filter(|n| match chord_id {
                Some(cid) => n.chord_id == Some(cid),
                None => n.id == note_id,
            })
            .cloned()
            .collect()
    }

    fn scoring_hand(&self, clef: Clef) -> Option<Hand> {
        self.policy
            .is_hand_separated()
            .then(|| Hand::for_clef(clef))
    }

    fn complete_single(&mut self, note_id: NoteId, now_ms: f64) {
        let removed = self.remove_group(note_id);
        let Some(note) = removed.into_iter().next() else {
            return;
        };

        self.stats.record_correct(self.scoring_hand(note.clef));
        self.feedback.push(FeedbackEvent::CorrectSingle {
            clef: note.clef,
            pitch: note.pitch,
        });
        log::debug!("INPUT: {} correct (score {})", note.pitch, self.stats.score);

        if !self.check_level_up(now_ms) {
            self.request_respawn(note.clef, false, now_ms);
        }
    }

    fn register_chord_press(&mut self, chord_id: ChordId, letter: Letter, now_ms: f64) -> InputOutcome {
        let members: Vec<ActiveNote> = self.chord_members(chord_id).into_iter().cloned().collect();
        let Some(clef) = members.first().map(|n| n.clef) else {
            return InputOutcome::Ignored;
        };
        let required: BTreeSet<Letter> = members.iter().map(|n| n.letter()).collect();

        let progress = self.chords.press(chord_id, letter, now_ms, members.len());
        if !progress.covers(&required) {
            let pressed = progress.pressed.len();
            log::debug!(
                "INPUT: chord {:?} {}/{} letters",
                chord_id,
                pressed,
                required.len()
            );
            self.feedback.push(FeedbackEvent::ChordProgress {
                clef,
                pressed,
                required: required.len(),
            });
            return InputOutcome::ChordPartial;
        }

        let removed = members
            .first()
            .map(|n| self.remove_group(n.id))
            .unwrap_or_default();

        self.stats.record_correct(self.scoring_hand(clef));
        self.feedback.push(FeedbackEvent::CorrectChord {
            clef,
            size: removed.len(),
        });
        log::debug!(
            "INPUT: chord of {} complete (score {})",
            removed.len(),
            self.stats.score
        );

        if !self.check_level_up(now_ms) {
            self.request_respawn(clef, true, now_ms);
        }
        InputOutcome::ChordComplete
    }

    /// Destroys the leftmost visible group and applies the forgiveness
    /// window to the life loss.
    fn handle_wrong_note(&mut self, target: Option<Clef>, now_ms: f64) -> InputOutcome {
        let leftmost = self
            .active_notes
            .iter()
            .filter(|n| self.policy.accepts(n.clef, target))
            .min_by(|a, b| a.x.total_cmp(&b.x))
            .map(|n| n.id);

        let Some(note_id) = leftmost else {
            log::debug!("INPUT: stray input with nothing on screen");
            return InputOutcome::Ignored;
        };

        let removed = self.remove_group(note_id);
        let Some(first) = removed.first() else {
            return InputOutcome::Ignored;
        };
        let clef = first.clef;
        let was_chord = first.is_chord();

        let counted = match self.last_counted_error_ms {
            Some(last) if now_ms - last <= WRONG_NOTE_FORGIVENESS_MS => false,
            _ => {
                self.last_counted_error_ms = Some(now_ms);
                true
            }
        };

        self.feedback.push(FeedbackEvent::WrongNote { clef, counted });
        if !counted {
            log::debug!("INPUT: wrong note forgiven");
        }

        if counted && self.stats.lose_life() {
            self.game_over();
        } else {
            self.request_respawn(clef, was_chord, now_ms);
        }
        InputOutcome::Wrong { counted }
    }
}

//! Core gameplay session for the note-reading game.
//!
//! The `GameSession` owns everything that changes during play:
//! - Active notes and their motion toward the ship
//! - Spawn slots and delayed respawn tasks
//! - Chord press progress
//! - Score, lives and level progression
//!
//! It is driven from a single thread: `update` once per tick and
//! `handle_pitch` for each input event, both with an explicit `now`.

mod chords;
mod input;
mod notes;
mod progression;
mod scheduler;
mod snapshot;
mod spawner;

pub use chords::{ChordProgress, ChordTracker};
pub use input::InputOutcome;
pub use scheduler::Scheduler;
pub use spawner::SpawnSlot;

use crate::models::catalog::NoteCatalog;
use crate::models::clef::Clef;
use crate::models::engine::{ActiveNote, ChordId, NoteId};
use crate::models::mode::ModePolicy;
use crate::models::settings::SettingsState;
use crate::models::stats::GameStats;
use crate::shared::feedback::FeedbackEvent;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// One game, from start (or restart) to game over.
pub struct GameSession {
    /// Playable pitches, built once.
    pub catalog: NoteCatalog,
    /// Mode rules frozen at session start.
    pub policy: ModePolicy,
    /// Score, lives, level.
    pub stats: GameStats,
    /// Notes currently on the staff.
    pub active_notes: Vec<ActiveNote>,
    /// False once the game is over.
    pub running: bool,

    /// Per-clef spawn slots.
    pub(crate) slots: Vec<SpawnSlot>,
    /// Delayed respawns, guarded by session epoch.
    pub(crate) scheduler: Scheduler,
    /// Partial chord presses.
    pub(crate) chords: ChordTracker,
    /// Time of the last wrong note that cost a life.
    pub(crate) last_counted_error_ms: Option<f64>,
    /// Pending feedback for the audio/visual sinks.
    pub(crate) feedback: Vec<FeedbackEvent>,

    pub(crate) rng: StdRng,
    next_note_id: u64,
    next_chord_id: u64,
}

impl GameSession {
    /// Starts a session with an OS-seeded random source.
    pub fn new(settings: &SettingsState, now_ms: f64) -> Self {
        Self::with_rng(settings, StdRng::from_os_rng(), now_ms)
    }

    /// Starts a session with a deterministic random source.
    pub fn with_seed(settings: &SettingsState, seed: u64, now_ms: f64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed), now_ms)
    }

    fn with_rng(settings: &SettingsState, rng: StdRng, now_ms: f64) -> Self {
        let policy = ModePolicy::from_settings(settings);
        log::info!(
            "SESSION: Starting {:?} (ledger lines: {}, strict octave: {}) at {:.0}ms",
            policy.clef_mode,
            policy.max_ledger_lines,
            policy.strict_octave,
            now_ms
        );

        Self {
            catalog: NoteCatalog::build(),
            slots: SpawnSlot::for_policy(&policy),
            policy,
            stats: GameStats::new(),
            active_notes: Vec::new(),
            running: true,
            scheduler: Scheduler::new(),
            chords: ChordTracker::new(),
            last_counted_error_ms: None,
            feedback: Vec::new(),
            rng,
            next_note_id: 0,
            next_chord_id: 0,
        }
    }

    /// Resets the session in place with freshly read settings.
    ///
    /// Bumps the scheduler epoch so respawns queued by the previous game
    /// never fire in the new one.
    pub fn restart(&mut self, settings: &SettingsState, now_ms: f64) {
        let epoch = self.scheduler.advance_epoch();
        self.policy = ModePolicy::from_settings(settings);
        self.slots = SpawnSlot::for_policy(&self.policy);
        self.stats = GameStats::new();
        self.active_notes.clear();
        self.chords.clear();
        self.last_counted_error_ms = None;
        self.feedback.clear();
        self.running = true;
        log::info!(
            "SESSION: Restarted as {:?} at {:.0}ms (epoch {})",
            self.policy.clef_mode,
            now_ms,
            epoch
        );
    }

    /// Advances the session by one tick.
    ///
    /// Order: due respawns, spawn check, motion/collision, chord cleanup.
    pub fn update(&mut self, now_ms: f64) {
        if !self.running {
            return;
        }

        self.run_due_tasks(now_ms);
        self.spawn_check(now_ms);
        self.update_notes(now_ms);

        let live = self.live_chord_ids();
        self.chords.collect_garbage(now_ms, &live);
    }

    pub fn is_game_over(&self) -> bool {
        !self.running
    }

    /// Takes the feedback queued since the last call.
    pub fn drain_feedback(&mut self) -> Vec<FeedbackEvent> {
        std::mem::take(&mut self.feedback)
    }

    /// Notes on the given clef's staff.
    pub fn notes_on(&self, clef: Clef) -> impl Iterator<Item = &ActiveNote> {
        self.active_notes.iter().filter(move |n| n.clef == clef)
    }

    /// All members of a chord, in pitch order.
    pub fn chord_members(&self, chord_id: ChordId) -> Vec<&ActiveNote> {
        self.active_notes
            .iter()
            .filter(|n| n.chord_id == Some(chord_id))
            .collect()
    }

    pub fn chord_progress(&self, chord_id: ChordId) -> Option<&ChordProgress> {
        self.chords.get(chord_id)
    }

    pub(crate) fn live_chord_ids(&self) -> Vec<ChordId> {
        let mut ids: Vec<ChordId> = self.active_notes.iter().filter_map(|n| n.chord_id).collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Removes a note, or its whole chord, and clears chord progress.
    /// Returns the removed notes.
    pub(crate) fn remove_group(&mut self, note_id: NoteId) -> Vec<ActiveNote> {
        let chord_id = self
            .active_notes
            .iter()
            .find(|n| n.id == note_id)
            .and_then(|n| n.chord_id);

        let (removed, kept): (Vec<ActiveNote>, Vec<ActiveNote>) =
            std::mem::take(&mut self.active_notes)
                .into_iter()
                .partition(|n| match chord_id {
                    Some(cid) => n.chord_id == Some(cid),
                    None => n.id == note_id,
                });
        self.active_notes = kept;

        if let Some(cid) = chord_id {
            self.chords.remove(cid);
        }
        removed
    }

    /// Ends the game. The session stays frozen until restart.
    pub(crate) fn game_over(&mut self) {
        self.running = false;
        self.scheduler.cancel_all();
        self.feedback.push(FeedbackEvent::GameOver {
            score: self.stats.score,
            level: self.stats.level,
        });
        log::info!(
            "SESSION: Game over (score {}, level {}, notes {})",
            self.stats.score,
            self.stats.level,
            self.stats.notes_destroyed
        );
    }

    pub(crate) fn next_note_id(&mut self) -> NoteId {
        self.next_note_id += 1;
        NoteId(self.next_note_id)
    }

    pub(crate) fn next_chord_id(&mut self) -> ChordId {
        self.next_chord_id += 1;
        ChordId(self.next_chord_id)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::models::catalog::CatalogEntry;
    use crate::models::engine::SPAWN_X;
    use crate::models::mode::ClefMode;
    use crate::models::pitch::{Letter, Pitch};

    pub fn settings(mode: ClefMode) -> SettingsState {
        SettingsState {
            clef_mode: mode,
            ..SettingsState::default()
        }
    }

    /// A running session with nothing on screen.
    pub fn empty_session(settings: &SettingsState) -> GameSession {
        let mut session = GameSession::with_seed(settings, 7, 0.0);
        for slot in &mut session.slots {
            slot.last_spawn_ms = 0.0;
        }
        session
    }

    /// Places a single note at `x`, bypassing the spawner.
    pub fn place(session: &mut GameSession, letter: Letter, octave: i32, clef: Clef, x: f64) -> NoteId {
        let entry = CatalogEntry::new(Pitch::new(letter, octave), clef);
        let id = session.next_note_id();
        let speed = session.stats.speed();
        session
            .active_notes
            .push(ActiveNote::from_entry(id, &entry, x, speed));
        id
    }

    /// Places a chord at `x`, bypassing the spawner.
    pub fn place_chord(session: &mut GameSession, pitches: &[(Letter, i32)], clef: Clef, x: f64) -> ChordId {
        let chord_id = session.next_chord_id();
        for &(letter, octave) in pitches {
            let entry = CatalogEntry::new(Pitch::new(letter, octave), clef);
            let id = session.next_note_id();
            let mut note = ActiveNote::from_entry(id, &entry, x, session.stats.speed());
            note.chord_id = Some(chord_id);
            session.active_notes.push(note);
        }
        chord_id
    }

    pub fn far() -> f64 {
        SPAWN_X
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::models::mode::ClefMode;
    use crate::models::pitch::Letter;

    #[test]
    fn first_tick_spawns_one_group_per_slot() {
        let mut session = GameSession::with_seed(&settings(ClefMode::Grand), 1, 0.0);
        session.update(16.0);
        assert_eq!(session.notes_on(Clef::Treble).count(), 1);
        assert_eq!(session.notes_on(Clef::Bass).count(), 1);
    }

    #[test]
    fn restart_resets_everything_and_invalidates_tasks() {
        let s = settings(ClefMode::Treble);
        let mut session = empty_session(&s);
        place_chord(&mut session, &[(Letter::C, 5), (Letter::E, 5)], Clef::Treble, 500.0);
        session.handle_pitch(&crate::input::events::PitchEvent::letter(Letter::C), 10.0);
        session.handle_pitch(&crate::input::events::PitchEvent::letter(Letter::E), 20.0);
        assert_eq!(session.scheduler.pending(), 1);
        session.stats.lives = 1;

        session.restart(&s, 30.0);
        assert_eq!(session.scheduler.pending(), 0);
        assert!(session.active_notes.is_empty());
        assert_eq!(session.stats, GameStats::new());
        assert!(session.running);
    }

    #[test]
    fn game_over_freezes_updates() {
        let mut session = empty_session(&settings(ClefMode::Treble));
        session.game_over();
        session.update(10_000.0);
        assert!(session.active_notes.is_empty());
        assert!(session.is_game_over());
        assert!(matches!(
            session.drain_feedback().last(),
            Some(FeedbackEvent::GameOver { .. })
        ));
    }

    #[test]
    fn remove_group_takes_whole_chord() {
        let mut session = empty_session(&settings(ClefMode::Treble));
        let chord = place_chord(
            &mut session,
            &[(Letter::C, 5), (Letter::E, 5), (Letter::G, 5)],
            Clef::Treble,
            far(),
        );
        let member = session.chord_members(chord)[1].id;
        let removed = session.remove_group(member);
        assert_eq!(removed.len(), 3);
        assert!(session.active_notes.is_empty());
    }
}

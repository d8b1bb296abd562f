//! Spawner: decides when and what to put on each staff.

use super::GameSession;
use super::scheduler::{ScheduledKind, TaskHandle};
use crate::models::catalog::CatalogEntry;
use crate::models::clef::Clef;
use crate::models::engine::{
    ActiveNote, CHORD_MAX_DRAWS, CHORD_SPAN_SEMITONES, CHORD_TRANSITION_DELAY_MS, MAX_CHORD_SIZE,
    MIN_CHORD_SIZE, SPAWN_X, SpawnResult,
};
use crate::models::mode::{HandMode, ModePolicy};
use rand::Rng;

/// Occupancy slot for one clef. Holds at most one spawn group.
#[derive(Debug, Clone)]
pub struct SpawnSlot {
    pub clef: Clef,
    pub last_spawn_ms: f64,
    /// Delayed respawn waiting to fire for this slot.
    pub pending: Option<TaskHandle>,
}

impl SpawnSlot {
    pub fn new(clef: Clef) -> Self {
        Self {
            clef,
            last_spawn_ms: f64::NEG_INFINITY,
            pending: None,
        }
    }

    /// One slot in single-clef modes, one per enabled clef otherwise.
    pub fn for_policy(policy: &ModePolicy) -> Vec<Self> {
        policy.enabled_clefs().into_iter().map(Self::new).collect()
    }
}

impl GameSession {
    /// Whether the slot for `clef` holds no notes.
    pub fn is_slot_empty(&self, clef: Clef) -> bool {
        !self.active_notes.iter().any(|n| n.clef == clef)
    }

    /// Regular interval-driven spawning.
    pub(crate) fn spawn_check(&mut self, now_ms: f64) {
        let interval = self.stats.spawn_interval_ms();
        let ready: Vec<Clef> = self
            .slots
            .iter()
            .filter(|slot| slot.pending.is_none())
            .filter(|slot| now_ms - slot.last_spawn_ms >= interval)
            .map(|slot| slot.clef)
            .collect();

        for clef in ready {
            // Occupancy is capped at one group, so an empty slot always has
            // room.
            if self.is_slot_empty(clef) {
                self.spawn_slot(clef, now_ms);
            }
        }
    }

    /// Fires respawns whose delay has elapsed.
    pub(crate) fn run_due_tasks(&mut self, now_ms: f64) {
        for (handle, kind) in self.scheduler.take_due(now_ms) {
            match kind {
                ScheduledKind::Respawn(clef) => {
                    if let Some(slot) = self.slots.iter_mut().find(|s| s.clef == clef) {
                        if slot.pending == Some(handle) {
                            slot.pending = None;
                        }
                    }
                    if self.is_slot_empty(clef) {
                        self.spawn_slot(clef, now_ms);
                    }
                }
            }
        }
    }

    /// Queues the next group for `clef` after one resolved.
    ///
    /// Chords leave a short transition gap; melody notes respawn at once.
    pub(crate) fn request_respawn(&mut self, clef: Clef, was_chord: bool, now_ms: f64) {
        if !self.running {
            return;
        }
        if was_chord {
            let handle = self
                .scheduler
                .schedule(ScheduledKind::Respawn(clef), now_ms + CHORD_TRANSITION_DELAY_MS);
            if let Some(slot) = self.slots.iter_mut().find(|s| s.clef == clef) {
                if let Some(old) = slot.pending.replace(handle) {
                    self.scheduler.cancel(old);
                }
            }
        } else {
            self.spawn_slot(clef, now_ms);
        }
    }

    /// Fills the slot for `clef` if it exists and is empty.
    pub(crate) fn spawn_slot(&mut self, clef: Clef, now_ms: f64) -> Option<SpawnResult> {
        let slot_idx = self.slots.iter().position(|s| s.clef == clef)?;
        if !self.is_slot_empty(clef) {
            return None;
        }

        if let Some(handle) = self.slots[slot_idx].pending.take() {
            self.scheduler.cancel(handle);
        }

        let result = self.build_spawn(clef)?;
        self.slots[slot_idx].last_spawn_ms = now_ms;

        match &result {
            SpawnResult::Single(note) => {
                log::debug!("SPAWN: {} on {} staff (index {})", note.pitch, clef, note.staff_index)
            }
            SpawnResult::Chord(notes) => log::debug!(
                "SPAWN: chord [{}] on {} staff",
                notes
                    .iter()
                    .map(|n| n.pitch.to_string())
                    .collect::<Vec<_>>()
                    .join(" "),
                clef
            ),
        }

        self.active_notes.extend(result.notes().iter().cloned());
        Some(result)
    }

    fn build_spawn(&mut self, clef: Clef) -> Option<SpawnResult> {
        let eligible =
            self.catalog
                .eligible(self.policy.clef_mode, clef, self.policy.max_ledger_lines);
        let speed = self.stats.speed();

        if self.policy.slot_mode(clef) == HandMode::Chords {
            let entries = pick_chord_entries(&eligible, &mut self.rng);
            if entries.len() >= MIN_CHORD_SIZE {
                let chord_id = self.next_chord_id();
                let notes = entries
                    .iter()
                    .map(|entry| {
                        let mut note =
                            ActiveNote::from_entry(self.next_note_id(), entry, SPAWN_X, speed);
                        note.chord_id = Some(chord_id);
                        note
                    })
                    .collect();
                return Some(SpawnResult::Chord(notes));
            }
            log::debug!("SPAWN: not enough notes for a chord, spawning a single note");
        }

        let entry = pick_single_entry(&eligible, &mut self.rng)?;
        let id = self.next_note_id();
        Some(SpawnResult::Single(ActiveNote::from_entry(
            id, &entry, SPAWN_X, speed,
        )))
    }
}

pub fn pick_single_entry<R: Rng>(eligible: &[CatalogEntry], rng: &mut R) -> Option<CatalogEntry> {
    if eligible.is_empty() {
        return None;
    }
    Some(eligible[rng.random_range(0..eligible.len())])
}

/// Picks 2-4 distinct entries around a random anchor, sorted low to
/// high. Lowest to highest never exceeds an octave.
///
/// After a bounded number of draws, remaining places are filled with the
/// unused entries nearest the anchor that keep the span. Sets too sparse for
/// a partner return the anchor alone.
pub fn pick_chord_entries<R: Rng>(eligible: &[CatalogEntry], rng: &mut R) -> Vec<CatalogEntry> {
    if eligible.is_empty() {
        return Vec::new();
    }

    let size = rng
        .random_range(MIN_CHORD_SIZE..=MAX_CHORD_SIZE)
        .min(eligible.len());
    let anchor = eligible[rng.random_range(0..eligible.len())];
    let mut window: Vec<CatalogEntry> = eligible
        .iter()
        .filter(|e| (e.midi() - anchor.midi()).abs() <= CHORD_SPAN_SEMITONES)
        .copied()
        .collect();

    let mut chosen = vec![anchor];
    let mut draws = 0;
    while chosen.len() < size && draws < CHORD_MAX_DRAWS {
        draws += 1;
        let candidate = window[rng.random_range(0..window.len())];
        if fits_chord(&chosen, &candidate) {
            chosen.push(candidate);
        }
    }

    if chosen.len() < size {
        window.sort_by_key(|e| (e.midi() - anchor.midi()).abs());
        for entry in window {
            if chosen.len() >= size {
                break;
            }
            if fits_chord(&chosen, &entry) {
                chosen.push(entry);
            }
        }
    }

    chosen.sort_by_key(|e| e.midi());
    chosen
}

fn fits_chord(chosen: &[CatalogEntry], candidate: &CatalogEntry) -> bool {
    if chosen.iter().any(|c| c.pitch == candidate.pitch) {
        return false;
    }
    let midi = candidate.midi();
    let low = chosen.iter().map(|c| c.midi()).fold(midi, i32::min);
    let high = chosen.iter().map(|c| c.midi()).fold(midi, i32::max);
    high - low <= CHORD_SPAN_SEMITONES
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::models::catalog::NoteCatalog;
    use crate::models::mode::ClefMode;
    use crate::models::pitch::{Letter, Pitch};
    use crate::models::settings::SettingsState;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn group_count(session: &GameSession, clef: Clef) -> usize {
        let mut singles = 0;
        let mut chords: Vec<_> = Vec::new();
        for n in session.notes_on(clef) {
            match n.chord_id {
                Some(id) => chords.push(id),
                None => singles += 1,
            }
        }
        chords.sort();
        chords.dedup();
        singles + chords.len()
    }

    #[test]
    fn chords_never_span_more_than_an_octave() {
        let cat = NoteCatalog::build();
        for ledger in [2, 4] {
            let eligible = cat.eligible(ClefMode::Treble, Clef::Treble, ledger);
            let mut rng = StdRng::seed_from_u64(42);
            for _ in 0..1000 {
                let chord = pick_chord_entries(&eligible, &mut rng);
                assert!((MIN_CHORD_SIZE..=MAX_CHORD_SIZE).contains(&chord.len()));
                assert!(chord.windows(2).all(|w| w[0].midi() < w[1].midi()));
                let (first, last) = (chord[0], chord[chord.len() - 1]);
                assert!(
                    last.midi() - first.midi() <= CHORD_SPAN_SEMITONES,
                    "{} to {} spans more than an octave",
                    first.pitch,
                    last.pitch
                );
            }
        }
    }

    #[test]
    fn chord_builder_degrades_gracefully() {
        let sparse = vec![
            CatalogEntry::new(Pitch::new(Letter::C, 2), Clef::Bass),
            CatalogEntry::new(Pitch::new(Letter::C, 4), Clef::Bass),
        ];
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            // Two octaves apart: no partner fits, the caller spawns a single.
            assert_eq!(pick_chord_entries(&sparse, &mut rng).len(), 1);
        }

        let octave = vec![
            CatalogEntry::new(Pitch::new(Letter::C, 3), Clef::Bass),
            CatalogEntry::new(Pitch::new(Letter::C, 4), Clef::Bass),
        ];
        for _ in 0..50 {
            let chord = pick_chord_entries(&octave, &mut rng);
            assert_eq!(chord.len(), 2);
            assert!(chord[0].midi() < chord[1].midi());
        }
        assert!(pick_chord_entries(&[], &mut rng).is_empty());
    }

    #[test]
    fn interval_gates_regular_spawns() {
        let mut session = empty_session(&settings(ClefMode::Treble));
        session.update(1000.0);
        assert!(session.active_notes.is_empty());
        session.update(2200.0);
        assert_eq!(session.active_notes.len(), 1);
    }

    #[test]
    fn occupied_slot_never_spawns() {
        let mut session = GameSession::with_seed(&settings(ClefMode::Grand), 11, 0.0);
        let mut now = 0.0;
        for _ in 0..2000 {
            now += 16.0;
            session.update(now);
            assert!(group_count(&session, Clef::Treble) <= 1);
            assert!(group_count(&session, Clef::Bass) <= 1);
            if !session.running {
                break;
            }
        }
    }

    #[test]
    fn chord_mode_spawns_chords() {
        let s = SettingsState {
            clef_mode: ClefMode::Treble,
            right_hand: HandMode::Chords,
            ..SettingsState::default()
        };
        let mut session = GameSession::with_seed(&s, 5, 0.0);
        session.update(0.0);
        let ids: Vec<_> = session.active_notes.iter().map(|n| n.chord_id).collect();
        assert!(ids.len() >= MIN_CHORD_SIZE);
        assert!(ids.iter().all(|id| id.is_some() && *id == ids[0]));
    }

    #[test]
    fn hard_mode_disabled_hand_has_no_slot() {
        let s = SettingsState {
            clef_mode: ClefMode::HardMode,
            left_hand: HandMode::None,
            ..SettingsState::default()
        };
        let mut session = GameSession::with_seed(&s, 9, 0.0);
        session.update(0.0);
        assert_eq!(session.notes_on(Clef::Treble).count(), 1);
        assert_eq!(session.notes_on(Clef::Bass).count(), 0);
        assert!(session.notes_on(Clef::Treble).all(|n| n.pitch.to_midi() >= 60));
    }

    #[test]
    fn ledger_budget_controls_spawned_range() {
        let s = SettingsState {
            max_ledger_lines: 0,
            ..SettingsState::default()
        };
        let mut session = GameSession::with_seed(&s, 21, 0.0);
        for i in 0..100 {
            session.active_notes.clear();
            session.spawn_slot(Clef::Treble, i as f64);
            let note = &session.active_notes[0];
            assert!((0..=8).contains(&note.staff_index));
        }

        let wide = SettingsState {
            max_ledger_lines: 4,
            ..SettingsState::default()
        };
        let mut session = GameSession::with_seed(&wide, 21, 0.0);
        let mut saw_a5 = false;
        for i in 0..500 {
            session.active_notes.clear();
            session.spawn_slot(Clef::Treble, i as f64);
            let note = &session.active_notes[0];
            if note.pitch == Pitch::new(Letter::A, 5) {
                assert_eq!(note.staff_index, 10);
                saw_a5 = true;
            }
        }
        assert!(saw_a5);
    }

    #[test]
    fn chord_resolution_delays_respawn() {
        let mut session = empty_session(&settings(ClefMode::Treble));
        session.request_respawn(Clef::Treble, true, 100.0);
        session.update(200.0);
        assert!(session.active_notes.is_empty());
        session.update(250.0);
        assert_eq!(session.active_notes.len(), 1);
        assert!(session.slots[0].pending.is_none());
    }

    #[test]
    fn melody_resolution_respawns_immediately() {
        let mut session = empty_session(&settings(ClefMode::Treble));
        session.request_respawn(Clef::Treble, false, 100.0);
        assert_eq!(session.active_notes.len(), 1);
        assert_eq!(session.slots[0].last_spawn_ms, 100.0);
    }
}

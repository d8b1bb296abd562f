//! Chord press tracking with grace-period reset and stale-entry eviction.

use crate::models::engine::{
    CHORD_GRACE_PERIOD_MS, CHORD_PROGRESS_KEEP, CHORD_PROGRESS_MAX_AGE_MS,
    CHORD_PROGRESS_MAX_TRACKED, CHORD_RESET_IDLE_MS, ChordId,
};
use crate::models::pitch::Letter;
use std::collections::{BTreeSet, HashMap};

/// Letters pressed so far for one chord.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordProgress {
    pub pressed: BTreeSet<Letter>,
    pub timestamps: HashMap<Letter, f64>,
    pub first_press_ms: f64,
}

impl ChordProgress {
    fn new(now_ms: f64) -> Self {
        Self {
            pressed: BTreeSet::new(),
            timestamps: HashMap::new(),
            first_press_ms: now_ms,
        }
    }

    fn reset(&mut self, now_ms: f64) {
        self.pressed.clear();
        self.timestamps.clear();
        self.first_press_ms = now_ms;
    }

    fn record(&mut self, letter: Letter, now_ms: f64) {
        self.pressed.insert(letter);
        self.timestamps.insert(letter, now_ms);
    }

    /// Time of the most recent press, or the first press if none.
    pub fn last_press_ms(&self) -> f64 {
        self.timestamps
            .values()
            .copied()
            .fold(self.first_press_ms, f64::max)
    }

    /// Whether every required letter has been pressed.
    pub fn covers(&self, required: &BTreeSet<Letter>) -> bool {
        required.is_subset(&self.pressed)
    }
}

#[derive(Debug, Default)]
pub struct ChordTracker {
    progress: HashMap<ChordId, ChordProgress>,
}

impl ChordTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ChordId) -> Option<&ChordProgress> {
        self.progress.get(&id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.progress.len()
    }

    /// Registers a matching press for `id`.
    ///
    /// Progress is created on the first press. Progress that has sat idle
    /// past the reset window starts over. If the pressed set ever grows
    /// past `note_count` it is reset and this press starts a new attempt.
    pub fn press(
        &mut self,
        id: ChordId,
        letter: Letter,
        now_ms: f64,
        note_count: usize,
    ) -> &ChordProgress {
        let progress = self
            .progress
            .entry(id)
            .or_insert_with(|| ChordProgress::new(now_ms));

        if !progress.pressed.is_empty()
            && now_ms - progress.first_press_ms > CHORD_GRACE_PERIOD_MS
            && now_ms - progress.last_press_ms() > CHORD_RESET_IDLE_MS
        {
            log::debug!(
                "CHORD: {:?} idle for {:.0}ms, starting over",
                id,
                now_ms - progress.last_press_ms()
            );
            progress.reset(now_ms);
        }

        progress.record(letter, now_ms);

        if progress.pressed.len() > note_count {
            log::warn!(
                "CHORD: {:?} has {} pressed letters for {} notes, resetting",
                id,
                progress.pressed.len(),
                note_count
            );
            progress.reset(now_ms);
            progress.record(letter, now_ms);
        }

        progress
    }

    pub fn remove(&mut self, id: ChordId) -> Option<ChordProgress> {
        self.progress.remove(&id)
    }

    pub fn clear(&mut self) {
        self.progress.clear();
    }

    /// Drops progress that is too old or whose chord is gone, then caps the
    /// number of tracked chords.
    pub fn collect_garbage(&mut self, now_ms: f64, live: &[ChordId]) {
        self.progress.retain(|id, p| {
            let keep = now_ms - p.first_press_ms <= CHORD_PROGRESS_MAX_AGE_MS && live.contains(id);
            if !keep {
                log::debug!("CHORD: evicting progress for {:?}", id);
            }
            keep
        });

        if self.progress.len() > CHORD_PROGRESS_MAX_TRACKED {
            let mut by_recency: Vec<(ChordId, f64)> = self
                .progress
                .iter()
                .map(|(id, p)| (*id, p.last_press_ms()))
                .collect();
            by_recency.sort_by(|a, b| b.1.total_cmp(&a.1));
            let keep: Vec<ChordId> = by_recency
                .into_iter()
                .take(CHORD_PROGRESS_KEEP)
                .map(|(id, _)| id)
                .collect();
            self.progress.retain(|id, _| keep.contains(id));
        }
    }
}

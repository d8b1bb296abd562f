//! Per-clef catalogs of playable pitches with precomputed staff positions.

use super::clef::{Clef, TOP_LINE_INDEX};
use super::mode::ClefMode;
use super::pitch::{Letter, Pitch};

/// Highest bass pitch in hard mode (B3).
pub const HARD_MODE_BASS_CEILING: i32 = 59;
/// Lowest treble pitch in hard mode (C4).
pub const HARD_MODE_TREBLE_FLOOR: i32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub pitch: Pitch,
    pub clef: Clef,
    pub staff_index: i32,
}

impl CatalogEntry {
    pub fn new(pitch: Pitch, clef: Clef) -> Self {
        Self {
            pitch,
            clef,
            staff_index: clef.staff_local_index(pitch),
        }
    }

    pub fn midi(&self) -> i32 {
        self.pitch.to_midi()
    }

    /// `[-L, 8 + L]`, or exactly the staff when `L = 0`.
    pub fn fits_ledger_budget(&self, max_ledger_lines: i32) -> bool {
        let l = max_ledger_lines.max(0);
        (-l..=TOP_LINE_INDEX + l).contains(&self.staff_index)
    }

    /// Hard mode keeps the bass hand at or below B3 and the treble hand at
    /// or above C4.
    pub fn fits_hard_mode_range(&self) -> bool {
        match self.clef {
            Clef::Bass => self.midi() <= HARD_MODE_BASS_CEILING,
            Clef::Treble => self.midi() >= HARD_MODE_TREBLE_FLOOR,
        }
    }
}

/// All catalogs, built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct NoteCatalog {
    pub treble: Vec<CatalogEntry>,
    pub bass: Vec<CatalogEntry>,
    pub grand: Vec<CatalogEntry>,
    /// Same data as `grand`; the two modes differ in routing, not content.
    pub hard_mode: Vec<CatalogEntry>,
}

impl NoteCatalog {
    pub fn build() -> Self {
        // Treble: A3..=A5, bass: C2..=C4.
        let treble = enumerate(Pitch::new(Letter::A, 3), Pitch::new(Letter::A, 5), Clef::Treble);
        let bass = enumerate(Pitch::new(Letter::C, 2), Pitch::new(Letter::C, 4), Clef::Bass);

        let grand: Vec<CatalogEntry> = treble.iter().chain(bass.iter()).copied().collect();
        let hard_mode = grand.clone();

        log::debug!(
            "CATALOG: {} treble, {} bass entries",
            treble.len(),
            bass.len()
        );

        Self {
            treble,
            bass,
            grand,
            hard_mode,
        }
    }

    pub fn for_mode(&self, mode: ClefMode) -> &[CatalogEntry] {
        match mode {
            ClefMode::Treble => &self.treble,
            ClefMode::Bass => &self.bass,
            ClefMode::Grand => &self.grand,
            ClefMode::HardMode => &self.hard_mode,
        }
    }

    /// Entries a spawn slot may draw from.
    ///
    /// Falls back to the slot's unfiltered entries when the filters leave
    /// nothing, so spawning never stalls.
    pub fn eligible(&self, mode: ClefMode, clef: Clef, max_ledger_lines: i32) -> Vec<CatalogEntry> {
        let hard = mode == ClefMode::HardMode;
        let unfiltered: Vec<CatalogEntry> = self
            .for_mode(mode)
            .iter()
            .filter(|e| e.clef == clef)
            .copied()
            .collect();

        let filtered: Vec<CatalogEntry> = unfiltered
            .iter()
            .filter(|e| e.fits_ledger_budget(max_ledger_lines))
            .filter(|e| !hard || e.fits_hard_mode_range())
            .copied()
            .collect();

        if filtered.is_empty() {
            log::warn!(
                "CATALOG: no {} entries within {} ledger lines, using full range",
                clef,
                max_ledger_lines
            );
            unfiltered
        } else {
            filtered
        }
    }
}

fn enumerate(low: Pitch, high: Pitch, clef: Clef) -> Vec<CatalogEntry> {
    let mut entries = Vec::new();
    for octave in low.octave..=high.octave {
        for letter in Letter::ALL {
            let pitch = Pitch::new(letter, octave);
            let n = pitch.diatonic_number();
            if n >= low.diatonic_number() && n <= high.diatonic_number() {
                entries.push(CatalogEntry::new(pitch, clef));
            }
        }
    }
    entries
}

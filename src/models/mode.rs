//! Play modes and the per-session policy derived from settings.

use super::clef::Clef;
use super::settings::SettingsState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClefMode {
    #[default]
    Treble,
    Bass,
    /// Treble and bass staves running independently, one shared score.
    Grand,
    /// Treble and bass with per-hand enable/disable, per-hand scoring and
    /// clipped pitch ranges.
    HardMode,
}

impl ClefMode {
    pub fn is_dual_clef(self) -> bool {
        matches!(self, ClefMode::Grand | ClefMode::HardMode)
    }
}

/// What a hand is asked to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HandMode {
    None,
    #[default]
    Melody,
    Chords,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    /// Left hand reads the bass staff, right hand the treble staff.
    pub fn for_clef(clef: Clef) -> Self {
        match clef {
            Clef::Treble => Hand::Right,
            Clef::Bass => Hand::Left,
        }
    }
}

/// Read-only mode rules for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModePolicy {
    pub clef_mode: ClefMode,
    pub left_hand: HandMode,
    pub right_hand: HandMode,
    pub strict_octave: bool,
    pub max_ledger_lines: i32,
}

impl ModePolicy {
    pub fn from_settings(settings: &SettingsState) -> Self {
        let clef_mode = if settings.hard_mode {
            ClefMode::HardMode
        } else {
            settings.clef_mode
        };

        let mut policy = Self {
            clef_mode,
            left_hand: settings.left_hand,
            right_hand: settings.right_hand,
            strict_octave: settings.strict_octave,
            max_ledger_lines: settings.max_ledger_lines.min(super::settings::MAX_LEDGER_LINES)
                as i32,
        };

        if clef_mode == ClefMode::HardMode
            && policy.left_hand == HandMode::None
            && policy.right_hand == HandMode::None
        {
            log::warn!("SETTINGS: both hands disabled in hard mode, enabling right hand");
            policy.right_hand = HandMode::Melody;
        }
        policy
    }

    pub fn is_dual_clef(&self) -> bool {
        self.clef_mode.is_dual_clef()
    }

    /// Per-hand scoring and per-hand level thresholds.
    pub fn is_hand_separated(&self) -> bool {
        self.clef_mode == ClefMode::HardMode
    }

    pub fn hand_mode(&self, hand: Hand) -> HandMode {
        match hand {
            Hand::Left => self.left_hand,
            Hand::Right => self.right_hand,
        }
    }

    /// What the slot for `clef` spawns. `None` only disables a slot in hard
    /// mode; elsewhere it plays as melody.
    pub fn slot_mode(&self, clef: Clef) -> HandMode {
        match self.hand_mode(Hand::for_clef(clef)) {
            HandMode::None if !self.is_hand_separated() => HandMode::Melody,
            mode => mode,
        }
    }

    pub fn is_clef_enabled(&self, clef: Clef) -> bool {
        self.active_clefs().contains(&clef) && self.slot_mode(clef) != HandMode::None
    }

    /// Clefs that own a spawn slot in this mode.
    pub fn active_clefs(&self) -> &'static [Clef] {
        match self.clef_mode {
            ClefMode::Treble => &[Clef::Treble],
            ClefMode::Bass => &[Clef::Bass],
            ClefMode::Grand | ClefMode::HardMode => &Clef::BOTH,
        }
    }

    /// Clefs that currently spawn notes.
    pub fn enabled_clefs(&self) -> Vec<Clef> {
        self.active_clefs()
            .iter()
            .copied()
            .filter(|c| self.is_clef_enabled(*c))
            .collect()
    }

    pub fn is_hand_enabled(&self, hand: Hand) -> bool {
        match hand {
            Hand::Left => self.is_clef_enabled(Clef::Bass),
            Hand::Right => self.is_clef_enabled(Clef::Treble),
        }
    }

    /// Whether an input may act on notes of `clef`, given an optional
    /// routing target from the input source.
    pub fn accepts(&self, clef: Clef, target: Option<Clef>) -> bool {
        if let Some(target) = target {
            if self.is_dual_clef() && target != clef {
                return false;
            }
        }
        !self.is_hand_separated() || self.is_clef_enabled(clef)
    }
}

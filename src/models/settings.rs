//! Settings source: loaded from `settings.toml` once per session.

use super::mode::{ClefMode, HandMode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default location of the settings file.
pub const SETTINGS_PATH: &str = "settings.toml";

/// Upper bound for `max_ledger_lines`; the catalog never goes further.
pub const MAX_LEDGER_LINES: u8 = 4;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsState {
    pub clef_mode: ClefMode,
    /// Ledger-line budget around the staff (0 = staff only).
    pub max_ledger_lines: u8,
    pub left_hand: HandMode,
    pub right_hand: HandMode,
    /// Require the octave to match when the input carries one.
    pub strict_octave: bool,
    /// Forces hand-separated play regardless of `clef_mode`.
    pub hard_mode: bool,
    /// Keyboard overrides: key -> letter, e.g. `h = "C"`.
    pub keybinds: HashMap<String, String>,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            clef_mode: ClefMode::Treble,
            max_ledger_lines: 2,
            left_hand: HandMode::Melody,
            right_hand: HandMode::Melody,
            strict_octave: false,
            hard_mode: false,
            keybinds: HashMap::new(),
        }
    }
}

impl SettingsState {
    /// Reads `path`, falling back to defaults when it is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("SETTINGS: {} not found, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("SETTINGS: {}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let mut settings: Self = toml::from_str(content)?;
        if settings.max_ledger_lines > MAX_LEDGER_LINES {
            log::warn!(
                "SETTINGS: max_ledger_lines {} clamped to {}",
                settings.max_ledger_lines,
                MAX_LEDGER_LINES
            );
            settings.max_ledger_lines = MAX_LEDGER_LINES;
        }
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

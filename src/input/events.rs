use crate::models::clef::Clef;
use crate::models::pitch::{Letter, Pitch};

/// Raw events delivered to the input thread by a frontend.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInputEvent {
    /// A typed key.
    Key(char),
    /// An on-screen note button, optionally bound to one staff.
    Button { label: String, clef: Option<Clef> },
    /// Bytes of one MIDI message.
    Midi(Vec<u8>),
    /// A full pitch typed in scientific notation ("C4").
    Scientific(Pitch),
    Restart,
    Quit,
}

/// One pitch played by the user, normalised across input devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PitchEvent {
    pub letter: Letter,
    /// Known for MIDI and scientific input; keyboard letters carry none.
    pub octave: Option<i32>,
    /// Set by buttons that belong to one staff.
    pub target_clef: Option<Clef>,
}

impl PitchEvent {
    pub fn letter(letter: Letter) -> Self {
        Self {
            letter,
            octave: None,
            target_clef: None,
        }
    }

    pub fn with_octave(letter: Letter, octave: i32) -> Self {
        Self {
            letter,
            octave: Some(octave),
            target_clef: None,
        }
    }

    pub fn from_pitch(pitch: Pitch) -> Self {
        Self::with_octave(pitch.letter, pitch.octave)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameAction {
    Pitch(PitchEvent),
    Restart,
    Quit,
}

/// An action plus the session-clock time the input thread received it.
#[derive(Debug, Clone, PartialEq)]
pub struct StampedAction {
    pub action: GameAction,
    pub at_ms: f64,
}

#[derive(Debug, Clone)]
pub enum InputCommand {
    /// Key → letter overrides from settings.
    ReloadKeybinds(std::collections::HashMap<String, String>),
}

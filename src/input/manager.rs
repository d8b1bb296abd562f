use super::events::{GameAction, PitchEvent, RawInputEvent};
use super::midi;
use crate::models::clef::Clef;
use crate::models::pitch::{Letter, Pitch};
use std::collections::HashMap;

/// Turns raw frontend events into game actions.
pub struct InputManager {
    bindings: HashMap<char, Letter>,
}

impl InputManager {
    pub fn new(keybinds: &HashMap<String, String>) -> Self {
        let mut manager = Self {
            bindings: HashMap::new(),
        };
        manager.reload_keybinds(keybinds);
        manager
    }

    pub fn process(&mut self, event: RawInputEvent) -> Option<GameAction> {
        match event {
            RawInputEvent::Key(c) => {
                let letter = self.bindings.get(&c.to_ascii_lowercase()).copied()?;
                Some(GameAction::Pitch(PitchEvent::letter(letter)))
            }
            RawInputEvent::Button { label, clef } => match label.parse::<Letter>() {
                Ok(letter) => Some(GameAction::Pitch(PitchEvent {
                    letter,
                    octave: None,
                    target_clef: clef,
                })),
                Err(e) => {
                    log::warn!("INPUT: Bad button label: {}", e);
                    None
                }
            },
            RawInputEvent::Midi(bytes) => {
                midi::note_on_pitch(&bytes).map(|p| GameAction::Pitch(PitchEvent::from_pitch(p)))
            }
            RawInputEvent::Scientific(pitch) => Some(GameAction::Pitch(PitchEvent::from_pitch(pitch))),
            RawInputEvent::Restart => Some(GameAction::Restart),
            RawInputEvent::Quit => Some(GameAction::Quit),
        }
    }

    /// Rebuilds the bindings: defaults first, then `key = "letter"`
    /// overrides. Overrides missing from `keybinds` no longer apply.
    pub fn reload_keybinds(&mut self, keybinds: &HashMap<String, String>) {
        self.bindings.clear();
        self.load_default_bindings();
        for (key, target) in keybinds {
            let mut chars = key.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                log::warn!("INPUT: Ignoring keybind for '{}': not a single key", key);
                continue;
            };
            match target.parse::<Letter>() {
                Ok(letter) => {
                    self.bindings.insert(c.to_ascii_lowercase(), letter);
                }
                Err(e) => log::warn!("INPUT: Ignoring keybind '{}': {}", key, e),
            }
        }
    }

    fn load_default_bindings(&mut self) {
        for letter in Letter::ALL {
            self.bindings
                .insert(letter.as_char().to_ascii_lowercase(), letter);
        }
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(&HashMap::new())
    }
}

/// Parses one console line: `c`, `C4`, `treble:C`, `midi 60`, `restart`,
/// `quit`. Returns `None` for anything else.
pub fn parse_console_line(line: &str) -> Option<RawInputEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    match line.to_ascii_lowercase().as_str() {
        "restart" | "r" => return Some(RawInputEvent::Restart),
        "quit" | "exit" | "q" => return Some(RawInputEvent::Quit),
        _ => {}
    }

    if let Some(rest) = line.strip_prefix("midi") {
        let note = rest.trim().parse::<u8>().ok()?;
        return Some(RawInputEvent::Midi(vec![0x90, note.min(127), 100]));
    }

    if let Some((staff, label)) = line.split_once(':') {
        let clef = match staff.trim().to_ascii_lowercase().as_str() {
            "treble" | "t" => Clef::Treble,
            "bass" | "b" => Clef::Bass,
            _ => return None,
        };
        return Some(RawInputEvent::Button {
            label: label.trim().to_string(),
            clef: Some(clef),
        });
    }

    let mut chars = line.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(RawInputEvent::Key(c));
    }

    line.parse::<Pitch>().ok().map(RawInputEvent::Scientific)
}

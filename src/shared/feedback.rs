//! Fire-and-forget notifications for audio and visual effects.

use crate::models::clef::Clef;
use crate::models::pitch::Pitch;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackEvent {
    CorrectSingle { clef: Clef, pitch: Pitch },
    CorrectChord { clef: Clef, size: usize },
    /// A chord letter registered but the chord is not complete yet.
    ChordProgress {
        clef: Clef,
        pressed: usize,
        required: usize,
    },
    /// `counted` is false when the forgiveness window absorbed the error.
    WrongNote { clef: Clef, counted: bool },
    /// A note or chord reached the ship.
    Miss { clef: Clef, pitches: Vec<Pitch> },
    LevelUp { level: u32, bonus_life: bool },
    GameOver { score: u32, level: u32 },
}

impl fmt::Display for FeedbackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackEvent::CorrectSingle { clef, pitch } => write!(f, "correct {pitch} ({clef})"),
            FeedbackEvent::CorrectChord { clef, size } => {
                write!(f, "chord of {size} complete ({clef})")
            }
            FeedbackEvent::ChordProgress {
                clef,
                pressed,
                required,
            } => write!(f, "chord {pressed}/{required} ({clef})"),
            FeedbackEvent::WrongNote { clef, counted: true } => write!(f, "wrong note ({clef})"),
            FeedbackEvent::WrongNote {
                clef,
                counted: false,
            } => write!(f, "wrong note, forgiven ({clef})"),
            FeedbackEvent::Miss { clef, pitches } => {
                let names: Vec<String> = pitches.iter().map(|p| p.to_string()).collect();
                write!(f, "too slow: {} ({clef})", names.join(" "))
            }
            FeedbackEvent::LevelUp {
                level,
                bonus_life: true,
            } => write!(f, "level {level}, bonus life"),
            FeedbackEvent::LevelUp { level, .. } => write!(f, "level {level}"),
            FeedbackEvent::GameOver { score, level } => {
                write!(f, "game over: score {score}, level {level}")
            }
        }
    }
}

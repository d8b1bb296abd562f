//! Pitch model: natural letters, octaves and MIDI numbers.
//!
//! The game never surfaces accidentals. Chromatic MIDI input collapses onto
//! the natural letter directly below it (C# plays as C, F# as F, ...).

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PitchError {
    #[error("invalid pitch letter '{0}' (expected A-G)")]
    InvalidPitchLetter(char),
    #[error("invalid scientific pitch '{0}'")]
    InvalidScientific(String),
}

/// A natural (white-key) note letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    /// All letters in diatonic order starting from C.
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Semitone offset above C within one octave.
    pub fn semitone_offset(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    /// Position of the letter in the C-based diatonic scale (C = 0, B = 6).
    pub fn diatonic_index(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 1,
            Letter::E => 2,
            Letter::F => 3,
            Letter::G => 4,
            Letter::A => 5,
            Letter::B => 6,
        }
    }

    /// Parses a letter, case-insensitive.
    pub fn from_char(c: char) -> Result<Self, PitchError> {
        match c.to_ascii_uppercase() {
            'C' => Ok(Letter::C),
            'D' => Ok(Letter::D),
            'E' => Ok(Letter::E),
            'F' => Ok(Letter::F),
            'G' => Ok(Letter::G),
            'A' => Ok(Letter::A),
            'B' => Ok(Letter::B),
            _ => Err(PitchError::InvalidPitchLetter(c)),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }

    /// Natural letter for a pitch class, rounding black keys down.
    fn from_pitch_class(pc: i32) -> Self {
        match pc {
            0 | 1 => Letter::C,
            2 | 3 => Letter::D,
            4 => Letter::E,
            5 | 6 => Letter::F,
            7 | 8 => Letter::G,
            9 | 10 => Letter::A,
            _ => Letter::B,
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Letter {
    type Err = PitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Letter::from_char(c),
            _ => Err(PitchError::InvalidScientific(s.to_string())),
        }
    }
}

/// A natural pitch: letter plus scientific octave (C4 = middle C).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub letter: Letter,
    pub octave: i32,
}

impl Pitch {
    pub const fn new(letter: Letter, octave: i32) -> Self {
        Self { letter, octave }
    }

    /// `(octave + 1) * 12 + offset`, so C4 = 60.
    pub fn to_midi(self) -> i32 {
        to_midi(self.letter, self.octave)
    }

    /// Inverse of [`Pitch::to_midi`] for naturals; black keys map to the
    /// natural directly below.
    pub fn from_midi(midi: i32) -> Self {
        let octave = midi.div_euclid(12) - 1;
        let letter = Letter::from_pitch_class(midi.rem_euclid(12));
        Self { letter, octave }
    }

    /// Number of diatonic steps above C0. Adjacent letters differ by 1 and
    /// octaves by 7.
    pub fn diatonic_number(self) -> i32 {
        self.octave * 7 + self.letter.diatonic_index()
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.octave)
    }
}

impl FromStr for Pitch {
    type Err = PitchError;

    /// Parses scientific notation (`"C4"`, `"a3"`, `"B-1"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let first = chars
            .next()
            .ok_or_else(|| PitchError::InvalidScientific(s.to_string()))?;
        let letter = Letter::from_char(first)?;
        let octave = chars
            .as_str()
            .parse::<i32>()
            .map_err(|_| PitchError::InvalidScientific(s.to_string()))?;
        Ok(Self { letter, octave })
    }
}

pub fn to_midi(letter: Letter, octave: i32) -> i32 {
    (octave + 1) * 12 + letter.semitone_offset()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_c_is_sixty() {
        assert_eq!(to_midi(Letter::C, 4), 60);
        assert_eq!(to_midi(Letter::A, 4), 69);
        assert_eq!(to_midi(Letter::B, 3), 59);
    }

    #[test]
    fn naturals_round_trip_through_midi() {
        for octave in 1..=6 {
            for letter in Letter::ALL {
                let back = Pitch::from_midi(to_midi(letter, octave));
                assert_eq!(back.letter, letter);
                assert_eq!(back.octave, octave);
            }
        }
    }

    #[test]
    fn black_keys_round_down_to_natural() {
        // C#4, D#4, F#4, G#4, A#4
        assert_eq!(Pitch::from_midi(61), Pitch::new(Letter::C, 4));
        assert_eq!(Pitch::from_midi(63), Pitch::new(Letter::D, 4));
        assert_eq!(Pitch::from_midi(66), Pitch::new(Letter::F, 4));
        assert_eq!(Pitch::from_midi(68), Pitch::new(Letter::G, 4));
        assert_eq!(Pitch::from_midi(70), Pitch::new(Letter::A, 4));
    }

    #[test]
    fn invalid_letter_is_rejected() {
        assert_eq!(
            Letter::from_char('H'),
            Err(PitchError::InvalidPitchLetter('H'))
        );
        assert!("X4".parse::<Pitch>().is_err());
        assert!("C".parse::<Pitch>().is_err());
    }

    #[test]
    fn scientific_parse_and_display() {
        let p: Pitch = "f5".parse().unwrap();
        assert_eq!(p, Pitch::new(Letter::F, 5));
        assert_eq!(p.to_string(), "F5");
    }

    #[test]
    fn diatonic_steps_are_uniform() {
        let c4 = Pitch::new(Letter::C, 4);
        let d4 = Pitch::new(Letter::D, 4);
        let c5 = Pitch::new(Letter::C, 5);
        assert_eq!(d4.diatonic_number() - c4.diatonic_number(), 1);
        assert_eq!(c5.diatonic_number() - c4.diatonic_number(), 7);
    }
}

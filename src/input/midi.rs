//! MIDI message decoding. Only note-on messages produce pitches.

use crate::models::pitch::Pitch;

const STATUS_MASK: u8 = 0xF0;
const NOTE_ON: u8 = 0x90;
const NOTE_OFF: u8 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiMessage {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8 },
    Other,
}

/// Decodes one message. A note-on with zero velocity is a note-off.
pub fn decode(bytes: &[u8]) -> MidiMessage {
    let &[status, note, velocity, ..] = bytes else {
        return MidiMessage::Other;
    };
    let channel = status & 0x0F;
    match status & STATUS_MASK {
        NOTE_ON if velocity > 0 => MidiMessage::NoteOn {
            channel,
            note,
            velocity,
        },
        NOTE_ON | NOTE_OFF => MidiMessage::NoteOff { channel, note },
        _ => MidiMessage::Other,
    }
}

/// The pitch struck by a note-on message, if any.
pub fn note_on_pitch(bytes: &[u8]) -> Option<Pitch> {
    match decode(bytes) {
        MidiMessage::NoteOn { note, .. } => Some(Pitch::from_midi(i32::from(note))),
        _ => None,
    }
}

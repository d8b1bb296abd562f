pub mod constants;
pub mod note;

pub use constants::*;
pub use note::{ActiveNote, ChordId, NoteId, SpawnResult};

//! Plain game data: pitches, clefs, catalogs, settings and counters.

pub mod catalog;
pub mod clef;
pub mod engine;
pub mod mode;
pub mod pitch;
pub mod settings;
pub mod stats;

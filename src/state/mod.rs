//! State management module.
//!
//! - `GameSession` - one game, from start to game over
//! - `GlobalState` - settings, the current session and the best score

pub mod game;
pub mod global;

// Re-exports for convenient access
pub use game::GameSession;
pub use global::GlobalState;

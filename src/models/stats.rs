//! Score, lives and the level difficulty curve.

use super::mode::Hand;

pub const STARTING_LIVES: u32 = 3;
pub const MAX_LIVES: u32 = 3;
/// Correct answers needed per level (per enabled hand in hard mode).
pub const CORRECT_PER_LEVEL: u32 = 10;
/// Levels that grant a bonus life on arrival.
pub const BONUS_LIFE_LEVELS: [u32; 2] = [4, 8];

/// Note speed in playfield units per tick.
pub fn speed_for_level(level: u32) -> f64 {
    match level {
        0 | 1 => 0.8,
        2 => 1.4,
        3 => 1.8,
        4 => 2.2,
        l => 2.2 + (l - 4) as f64 * 0.4,
    }
}

/// Minimum time between regular spawns, in milliseconds.
pub fn spawn_interval_ms(level: u32) -> f64 {
    match level {
        0 | 1 => 2200.0,
        2 => 1600.0,
        3 => 1400.0,
        4 => 1200.0,
        l => (1200.0 - (l - 4) as f64 * 50.0).max(800.0),
    }
}

/// Plain progression counters for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    pub score: u32,
    pub lives: u32,
    pub notes_destroyed: u32,
    pub level: u32,
    /// Correct answers since the last level-up (shared counter).
    pub correct_answers: u32,
    /// Cumulative per-hand scores (hard mode).
    pub left_hand_score: u32,
    pub right_hand_score: u32,
    /// Per-hand progress toward the next level (hard mode).
    pub left_hand_correct: u32,
    pub right_hand_correct: u32,
}

impl GameStats {
    pub fn new() -> Self {
        Self {
            score: 0,
            lives: STARTING_LIVES,
            notes_destroyed: 0,
            level: 1,
            correct_answers: 0,
            left_hand_score: 0,
            right_hand_score: 0,
            left_hand_correct: 0,
            right_hand_correct: 0,
        }
    }

    /// Credits one completed group (a single note or a whole chord).
    pub fn record_correct(&mut self, hand: Option<Hand>) {
        self.score += 1;
        self.notes_destroyed += 1;
        self.correct_answers += 1;
        match hand {
            Some(Hand::Left) => {
                self.left_hand_score += 1;
                self.left_hand_correct += 1;
            }
            Some(Hand::Right) => {
                self.right_hand_score += 1;
                self.right_hand_correct += 1;
            }
            None => {}
        }
    }

    /// Removes one life. Returns `true` when no lives remain.
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives == 0
    }

    pub fn hand_correct(&self, hand: Hand) -> u32 {
        match hand {
            Hand::Left => self.left_hand_correct,
            Hand::Right => self.right_hand_correct,
        }
    }

    pub fn reset_hand_correct(&mut self, hand: Hand) {
        match hand {
            Hand::Left => self.left_hand_correct = 0,
            Hand::Right => self.right_hand_correct = 0,
        }
    }

    /// Moves to the next level. Returns `true` if a bonus life was granted.
    pub fn advance_level(&mut self) -> bool {
        self.level += 1;
        if BONUS_LIFE_LEVELS.contains(&self.level) && self.lives < MAX_LIVES {
            self.lives += 1;
            return true;
        }
        false
    }

    pub fn speed(&self) -> f64 {
        speed_for_level(self.level)
    }

    pub fn spawn_interval_ms(&self) -> f64 {
        spawn_interval_ms(self.level)
    }
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

//! Level progression after a completed answer.

use super::GameSession;
use crate::models::mode::Hand;
use crate::models::stats::CORRECT_PER_LEVEL;
use crate::shared::feedback::FeedbackEvent;

impl GameSession {
    fn level_threshold_reached(&self) -> bool {
        if !self.policy.is_hand_separated() {
            return self.stats.correct_answers >= CORRECT_PER_LEVEL;
        }
        let mut enabled = [Hand::Left, Hand::Right]
            .into_iter()
            .filter(|h| self.policy.is_hand_enabled(*h))
            .peekable();
        enabled.peek().is_some() && enabled.all(|h| self.stats.hand_correct(h) >= CORRECT_PER_LEVEL)
    }

    /// Advances the level if the threshold is met. Returns `true` on level-up.
    ///
    /// A new level clears the staff, drops chord progress and pending
    /// respawns, and lets every slot spawn on the next tick.
    pub(crate) fn check_level_up(&mut self, now_ms: f64) -> bool {
        if !self.level_threshold_reached() {
            return false;
        }

        if self.policy.is_hand_separated() {
            for hand in [Hand::Left, Hand::Right] {
                if self.stats.hand_correct(hand) >= CORRECT_PER_LEVEL {
                    self.stats.reset_hand_correct(hand);
                }
            }
        }
        self.stats.correct_answers = 0;
        let bonus_life = self.stats.advance_level();

        self.active_notes.clear();
        self.chords.clear();
        self.scheduler.cancel_all();
        for slot in &mut self.slots {
            slot.pending = None;
            slot.last_spawn_ms = f64::NEG_INFINITY;
        }

        self.feedback.push(FeedbackEvent::LevelUp {
            level: self.stats.level,
            bonus_life,
        });
        log::info!(
            "LEVEL: reached level {} at {:.0}ms (speed {:.1}, interval {:.0}ms{})",
            self.stats.level,
            now_ms,
            self.stats.speed(),
            self.stats.spawn_interval_ms(),
            if bonus_life { ", bonus life" } else { "" }
        );
        true
    }
}

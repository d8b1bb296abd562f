//! Global state: settings, the current session and cross-session records.

use crate::input::events::{GameAction, InputCommand};
use crate::models::settings::SettingsState;
use crate::shared::feedback::FeedbackEvent;
use crate::shared::snapshot::RenderState;
use crate::state::game::{GameSession, InputOutcome};
use crossbeam_channel::Sender;
use std::path::PathBuf;

/// Owns the long-lived state the logic thread works on.
pub struct GlobalState {
    pub(super) session: GameSession,
    pub(super) settings: SettingsState,
    /// Re-read on every restart. `None` keeps the in-memory settings.
    settings_path: Option<PathBuf>,
    input_cmd_tx: Option<Sender<InputCommand>>,
    best_score: u32,
    quit_requested: bool,
}

impl GlobalState {
    /// Loads settings from `settings_path` and starts the first session.
    pub fn new(settings_path: PathBuf, input_cmd_tx: Sender<InputCommand>, now_ms: f64) -> Self {
        log::info!("LOGIC: Initializing Global State");
        let settings = SettingsState::load_or_default(&settings_path);
        let mut state = Self::with_settings(settings, now_ms);
        state.settings_path = Some(settings_path);
        state.input_cmd_tx = Some(input_cmd_tx);
        state
    }

    /// Fixed settings, no settings file and no input thread.
    pub fn with_settings(settings: SettingsState, now_ms: f64) -> Self {
        Self {
            session: GameSession::new(&settings, now_ms),
            settings,
            settings_path: None,
            input_cmd_tx: None,
            best_score: 0,
            quit_requested: false,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn best_score(&self) -> u32 {
        self.best_score.max(self.session.stats.score)
    }

    pub fn should_quit(&self) -> bool {
        self.quit_requested
    }

    /// Ticks the session.
    pub fn update(&mut self, now_ms: f64) {
        let was_running = self.session.running;
        self.session.update(now_ms);
        if was_running && self.session.is_game_over() {
            self.record_game_over();
        }
    }

    /// Routes one action. Pitch events are resolved immediately.
    pub fn handle_action(&mut self, action: GameAction, now_ms: f64) {
        match action {
            GameAction::Pitch(event) => {
                let was_running = self.session.running;
                let outcome = self.session.handle_pitch(&event, now_ms);
                if outcome == InputOutcome::Ignored && !was_running {
                    log::debug!("LOGIC: Game over, ignoring {:?} (restart to play)", event.letter);
                }
                if was_running && self.session.is_game_over() {
                    self.record_game_over();
                }
            }
            GameAction::Restart => self.restart(now_ms),
            GameAction::Quit => {
                log::info!("LOGIC: Quit requested");
                self.quit_requested = true;
            }
        }
    }

    /// Starts a fresh session with settings re-read from disk.
    pub fn restart(&mut self, now_ms: f64) {
        self.best_score = self.best_score();
        self.reload_settings();
        self.session.restart(&self.settings, now_ms);
    }

    pub fn drain_feedback(&mut self) -> Vec<FeedbackEvent> {
        self.session.drain_feedback()
    }

    pub fn create_snapshot(&self, now_ms: f64) -> RenderState {
        RenderState::InGame(self.session.create_snapshot(now_ms, self.best_score))
    }

    fn record_game_over(&mut self) {
        let score = self.session.stats.score;
        if score > self.best_score {
            log::info!("LOGIC: New best score {} (was {})", score, self.best_score);
            self.best_score = score;
        } else {
            log::info!("LOGIC: Best score remains {}", self.best_score);
        }
    }

    /// Reloads settings from disk and forwards keybinds to the input thread.
    fn reload_settings(&mut self) {
        let Some(path) = &self.settings_path else {
            return;
        };
        self.settings = SettingsState::load_or_default(path);
        if let Some(tx) = &self.input_cmd_tx {
            if let Err(e) = tx.send(InputCommand::ReloadKeybinds(self.settings.keybinds.clone())) {
                log::error!("LOGIC: Failed to forward keybinds to input thread: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::events::PitchEvent;
    use crate::models::clef::Clef;
    use crate::models::mode::ClefMode;
    use crate::models::pitch::Letter;

    fn state() -> GlobalState {
        GlobalState::with_settings(SettingsState::default(), 0.0)
    }

    #[test]
    fn best_score_survives_restart() {
        let mut state = state();
        state.session.stats.score = 7;
        state.session.stats.lives = 1;
        state.session.active_notes.clear();
        state.update(0.0);
        // Whatever spawned on the first tick is the leftmost note; any
        // wrong letter on an otherwise empty staff costs the last life.
        let wrong = state
            .session
            .notes_on(Clef::Treble)
            .map(|n| n.letter())
            .next()
            .map(|l| if l == Letter::C { Letter::D } else { Letter::C })
            .unwrap();
        state.handle_action(GameAction::Pitch(PitchEvent::letter(wrong)), 10.0);
        assert!(state.session.is_game_over());
        assert_eq!(state.best_score(), 7);

        state.handle_action(GameAction::Restart, 20.0);
        assert!(state.session.running);
        assert_eq!(state.session.stats.score, 0);
        assert_eq!(state.best_score(), 7);
        match state.create_snapshot(20.0) {
            RenderState::InGame(snap) => assert_eq!(snap.best_score, 7),
            RenderState::Empty => panic!("expected a gameplay snapshot"),
        }
    }

    #[test]
    fn restart_rereads_settings_file() {
        let dir = std::env::temp_dir().join(format!("rstaff-global-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        std::fs::write(&path, "clef_mode = \"bass\"\n").unwrap();

        let (tx, rx) = crossbeam_channel::unbounded();
        let mut state = GlobalState::new(path.clone(), tx, 0.0);
        assert_eq!(state.session.policy.clef_mode, ClefMode::Bass);

        std::fs::write(&path, "clef_mode = \"grand\"\n[keybinds]\nh = \"C\"\n").unwrap();
        state.handle_action(GameAction::Restart, 100.0);
        assert_eq!(state.session.policy.clef_mode, ClefMode::Grand);
        match rx.try_recv() {
            Ok(InputCommand::ReloadKeybinds(map)) => assert_eq!(map.get("h").map(String::as_str), Some("C")),
            other => panic!("expected keybind reload, got {:?}", other),
        }

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn quit_is_latched() {
        let mut state = state();
        assert!(!state.should_quit());
        state.handle_action(GameAction::Quit, 0.0);
        assert!(state.should_quit());
    }
}

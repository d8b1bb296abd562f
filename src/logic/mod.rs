//! Logic thread module for game state management and updates.
//!
//! This module contains the main game loop that runs at a fixed tick rate
//! and is the only place the game session is mutated.

pub mod clock;
pub mod feedback_thread;

use crate::logic::clock::{Clock, SystemClock};
use crate::state::GlobalState;
use crate::system::bus::{SystemBus, SystemEvent};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

/// Target ticks per second for the logic thread (one animation frame).
const TPS: u64 = 60;

/// Runs one logic tick. Returns `false` once quit was requested.
///
/// Order: session update, then queued actions in arrival order, then
/// feedback forwarding and the render snapshot. Actions are resolved at
/// their arrival stamp, not at the tick time.
pub fn tick(state: &mut GlobalState, bus: &SystemBus, clock: &dyn Clock) -> bool {
    state.update(clock.now_ms());

    while let Ok(stamped) = bus.action_rx.try_recv() {
        state.handle_action(stamped.action, stamped.at_ms);
        if state.should_quit() {
            return false;
        }
    }

    // Fire-and-forget: a dead feedback thread must not stall the game.
    for event in state.drain_feedback() {
        let _ = bus.feedback_tx.send(event);
    }

    let _ = bus.render_tx.try_send(state.create_snapshot(clock.now_ms()));
    true
}

/// Spawns the main logic thread that handles game state updates.
///
/// This thread runs a fixed-timestep game loop that:
/// 1. Updates the game session
/// 2. Resolves input actions from the input thread
/// 3. Forwards feedback events to the feedback thread
/// 4. Sends render snapshots to the main thread
///
/// `clock` must be the same clock the input thread stamps actions with.
pub fn start_thread(bus: SystemBus, settings_path: PathBuf, clock: SystemClock) {
    // Start the dedicated feedback thread
    feedback_thread::start_feedback_thread(bus.clone());

    thread::Builder::new()
        .name("Logic Thread".to_string())
        .spawn(move || {
            log::info!("LOGIC: Thread started");

            let mut state = GlobalState::new(settings_path, bus.input_cmd_tx.clone(), clock.now_ms());

            let mut accumulator = Duration::new(0, 0);
            let mut last_time = Instant::now();
            let target_dt = Duration::from_secs_f64(1.0 / TPS as f64);

            'run: loop {
                let current_time = Instant::now();
                let delta = current_time - last_time;
                last_time = current_time;
                accumulator += delta;

                let mut loops = 0;
                while accumulator >= target_dt && loops < 10 {
                    if !tick(&mut state, &bus, &clock) {
                        break 'run;
                    }
                    accumulator -= target_dt;
                    loops += 1;
                }
                if loops == 10 {
                    // Too far behind; drop the backlog instead of spiralling.
                    accumulator = Duration::ZERO;
                }

                if loops == 0 {
                    thread::sleep(Duration::from_millis(1));
                }
            }

            log::info!(
                "LOGIC: Quit received (best score {})",
                state.best_score()
            );
            let _ = bus.sys_tx.send(SystemEvent::Quit);
            log::info!("LOGIC: Thread stopped");
        })
        .expect("Failed to spawn Logic thread");
}

#[cfg(test)]
mod tests {
    use super::clock::ManualClock;
    use super::*;
    use crate::input::events::{GameAction, PitchEvent, StampedAction};
    use crate::models::pitch::Letter;
    use crate::models::settings::SettingsState;
    use crate::shared::feedback::FeedbackEvent;
    use crate::shared::snapshot::RenderState;

    #[test]
    fn tick_publishes_snapshot_and_feedback() {
        let bus = SystemBus::new();
        let clock = ManualClock::new(0.0);
        let mut state = GlobalState::with_settings(SettingsState::default(), 0.0);

        assert!(tick(&mut state, &bus, &clock));
        let RenderState::InGame(snap) = bus.render_rx.try_recv().unwrap() else {
            panic!("expected a gameplay snapshot");
        };
        assert_eq!(snap.notes.len(), 1);

        // Any letter but the one on screen is wrong.
        let on_screen = snap.notes[0].pitch.letter;
        let wrong = Letter::ALL
            .into_iter()
            .find(|l| *l != on_screen)
            .unwrap();
        clock.advance(16.0);
        bus.action_tx
            .send(StampedAction {
                action: GameAction::Pitch(PitchEvent::letter(wrong)),
                at_ms: clock.now_ms(),
            })
            .unwrap();
        assert!(tick(&mut state, &bus, &clock));

        let events: Vec<FeedbackEvent> = bus.feedback_rx.try_iter().collect();
        assert!(matches!(
            events.as_slice(),
            [FeedbackEvent::WrongNote { counted: true, .. }]
        ));
        assert_eq!(state.session().stats.lives, 2);
    }

    #[test]
    fn quit_action_stops_the_loop() {
        let bus = SystemBus::new();
        let clock = ManualClock::new(0.0);
        let mut state = GlobalState::with_settings(SettingsState::default(), 0.0);
        bus.action_tx
            .send(StampedAction {
                action: GameAction::Quit,
                at_ms: 0.0,
            })
            .unwrap();
        assert!(!tick(&mut state, &bus, &clock));
    }

    #[test]
    fn queued_errors_use_arrival_time_for_forgiveness() {
        let bus = SystemBus::new();
        let clock = ManualClock::new(0.0);
        let settings = SettingsState {
            strict_octave: true,
            ..SettingsState::default()
        };
        let mut state = GlobalState::with_settings(settings, 0.0);
        assert!(tick(&mut state, &bus, &clock));

        // No note lives in octave 9, so both presses are wrong. They arrived
        // 200 ms apart but are drained together by one late tick.
        for at_ms in [1000.0, 1200.0] {
            bus.action_tx
                .send(StampedAction {
                    action: GameAction::Pitch(PitchEvent::with_octave(Letter::C, 9)),
                    at_ms,
                })
                .unwrap();
        }
        clock.advance(1216.0);
        assert!(tick(&mut state, &bus, &clock));

        let counted: Vec<bool> = bus
            .feedback_rx
            .try_iter()
            .filter_map(|e| match e {
                FeedbackEvent::WrongNote { counted, .. } => Some(counted),
                _ => None,
            })
            .collect();
        assert_eq!(counted, vec![true, true]);
        assert_eq!(state.session().stats.lives, 1);
    }
}

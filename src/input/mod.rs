//! Input thread bootstrapping and high-level event routing.

pub mod events;
pub mod manager;
pub mod midi;

use crate::input::events::{InputCommand, RawInputEvent, StampedAction};
use crate::input::manager::{InputManager, parse_console_line};
use crate::logic::clock::{Clock, SystemClock};
use crate::system::bus::SystemBus;
use crossbeam_channel::select;
use std::io::BufRead;
use std::thread;

/// Actions are stamped on arrival with `clock`, which must be the logic
/// thread's clock.
pub fn start_thread(bus: SystemBus, mut manager: InputManager, clock: SystemClock) {
    thread::Builder::new()
        .name("Input Thread".to_string())
        .spawn(move || {
            log::info!("INPUT: Thread started");

            // Blocking loop: wait for an event, handle it, repeat.
            loop {
                select! {
                    recv(bus.raw_input_rx) -> raw => {
                        match raw {
                            Ok(raw_event) => {
                                let at_ms = clock.now_ms();
                                if let Some(action) = manager.process(raw_event) {
                                    if let Err(e) = bus.action_tx.send(StampedAction { action, at_ms }) {
                                        log::error!("INPUT: Failed to send action (Logic thread died?): {}", e);
                                        break;
                                    }
                                }
                            }
                            Err(_) => break,
                        }
                    }
                    recv(bus.input_cmd_rx) -> cmd => {
                        match cmd {
                            Ok(InputCommand::ReloadKeybinds(map)) => manager.reload_keybinds(&map),
                            Err(_) => break,
                        }
                    }
                }
            }

            log::info!("INPUT: Thread stopped");
        })
        .expect("Failed to spawn Input thread");
}

/// Reads console lines from stdin and feeds them to the input thread.
/// End of input counts as quit.
pub fn start_console_reader(bus: SystemBus) {
    thread::Builder::new()
        .name("Console Thread".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        log::error!("INPUT: Failed to read stdin: {}", e);
                        break;
                    }
                };
                match parse_console_line(&line) {
                    Some(event) => {
                        if bus.raw_input_tx.send(event).is_err() {
                            return;
                        }
                    }
                    None if !line.trim().is_empty() => {
                        log::warn!("INPUT: Unrecognised input '{}'", line.trim())
                    }
                    None => {}
                }
            }
            let _ = bus.raw_input_tx.send(RawInputEvent::Quit);
        })
        .expect("Failed to spawn Console thread");
}

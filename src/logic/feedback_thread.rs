//! Dedicated feedback thread standing in for sound and visual effects.
//!
//! Keeps effect handling off the logic thread; the session never waits on it.

use crate::shared::feedback::FeedbackEvent;
use crate::system::bus::SystemBus;
use std::thread;

#[derive(Debug, Default)]
struct FeedbackWorker {
    handled: u64,
}

impl FeedbackWorker {
    fn handle_event(&mut self, event: &FeedbackEvent) {
        self.handled += 1;
        match event {
            FeedbackEvent::GameOver { .. }
            | FeedbackEvent::LevelUp { .. }
            | FeedbackEvent::WrongNote { counted: true, .. }
            | FeedbackEvent::Miss { .. } => log::info!("FEEDBACK: {}", event),
            _ => log::debug!("FEEDBACK: {}", event),
        }
    }
}

pub fn start_feedback_thread(bus: SystemBus) {
    thread::Builder::new()
        .name("Feedback Thread".to_string())
        .spawn(move || {
            log::info!("FEEDBACK: Thread started");

            let mut worker = FeedbackWorker::default();
            while let Ok(event) = bus.feedback_rx.recv() {
                worker.handle_event(&event);
            }

            log::info!("FEEDBACK: Thread stopped after {} events", worker.handled);
        })
        .expect("Failed to spawn Feedback thread");
}

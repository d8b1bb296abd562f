//! Shared channel infrastructure between system threads.
//!
//! The `SystemBus` connects the console reader, input, logic, feedback and
//! main (render) threads. Only the logic thread touches the game session;
//! everything else talks to it through these channels.

use crate::input::events::{InputCommand, RawInputEvent, StampedAction};
use crate::shared::feedback::FeedbackEvent;
use crate::shared::snapshot::RenderState;
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};

/// Lifecycle events sent from the logic thread to the main thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemEvent {
    /// Application shutdown requested.
    Quit,
}

/// Aggregates the cross-thread communication channels.
#[derive(Clone)]
pub struct SystemBus {
    /// Frontend → Input: raw key, button and MIDI events.
    pub raw_input_tx: Sender<RawInputEvent>,
    pub raw_input_rx: Receiver<RawInputEvent>,

    /// Commands sent to the input thread.
    pub input_cmd_tx: Sender<InputCommand>,
    pub input_cmd_rx: Receiver<InputCommand>,

    /// Input → Logic: resolved game actions, in arrival order.
    pub action_tx: Sender<StampedAction>,
    pub action_rx: Receiver<StampedAction>,

    /// Logic → Main: game state snapshots.
    pub render_tx: Sender<RenderState>,
    pub render_rx: Receiver<RenderState>,

    /// Logic → Main: lifecycle events.
    pub sys_tx: Sender<SystemEvent>,
    pub sys_rx: Receiver<SystemEvent>,

    /// Logic → Feedback: fire-and-forget effect notifications.
    pub feedback_tx: Sender<FeedbackEvent>,
    pub feedback_rx: Receiver<FeedbackEvent>,
}

impl SystemBus {
    /// Creates a new system bus with all channels initialized.
    pub fn new() -> Self {
        let (raw_input_tx, raw_input_rx) = unbounded();
        let (input_cmd_tx, input_cmd_rx) = unbounded();
        let (action_tx, action_rx) = unbounded();

        // Bounded render channel: max 2 frames queued to limit latency
        let (render_tx, render_rx) = bounded(2);

        let (sys_tx, sys_rx) = unbounded();
        let (feedback_tx, feedback_rx) = unbounded();

        Self {
            raw_input_tx,
            raw_input_rx,
            input_cmd_tx,
            input_cmd_rx,
            action_tx,
            action_rx,
            render_tx,
            render_rx,
            sys_tx,
            sys_rx,
            feedback_tx,
            feedback_rx,
        }
    }
}

impl Default for SystemBus {
    fn default() -> Self {
        Self::new()
    }
}

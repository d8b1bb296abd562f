//! Render side: consumes snapshots on the main thread.
//!
//! Drawing is behind `RenderSink`; the bundled sink is headless and only
//! logs what a staff renderer would draw.

use crate::models::clef::StaffGeometry;
use crate::shared::snapshot::{GameplaySnapshot, RenderState};
use crate::system::bus::{SystemBus, SystemEvent};
use crossbeam_channel::select;

pub trait RenderSink {
    fn present(&mut self, state: &RenderState);
}

/// Logs a compact summary whenever the visible state changes.
pub struct LogRenderSink {
    geometry: StaffGeometry,
    last_summary: Option<(u32, u32, u32, usize, bool)>,
    frames: u64,
}

impl LogRenderSink {
    pub fn new(geometry: StaffGeometry) -> Self {
        Self {
            geometry,
            last_summary: None,
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn describe_notes(&self, snap: &GameplaySnapshot) -> String {
        snap.notes
            .iter()
            .map(|n| {
                format!(
                    "{}@({:.0},{:.0})",
                    n.pitch,
                    n.x,
                    self.geometry.y_for_index(n.staff_index)
                )
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for LogRenderSink {
    fn default() -> Self {
        Self::new(StaffGeometry::default())
    }
}

impl RenderSink for LogRenderSink {
    fn present(&mut self, state: &RenderState) {
        self.frames += 1;
        let RenderState::InGame(snap) = state else {
            return;
        };

        let summary = (
            snap.score,
            snap.lives,
            snap.level,
            snap.notes.len(),
            snap.game_over,
        );
        if self.last_summary == Some(summary) {
            return;
        }
        let was_over = self.last_summary.is_some_and(|s| s.4);
        self.last_summary = Some(summary);

        if snap.game_over && !was_over {
            log::info!(
                "RENDER: GAME OVER - score {} (best {}), level {}",
                snap.score,
                snap.best_score,
                snap.level
            );
            return;
        }

        log::debug!(
            "RENDER: {:?} score {} lives {} level {} | {}",
            snap.clef_mode,
            snap.score,
            snap.lives,
            snap.level,
            self.describe_notes(snap)
        );
    }
}

/// Main-thread loop: presents snapshots until the logic thread asks to quit.
pub fn run(bus: SystemBus, sink: &mut dyn RenderSink) {
    log::info!("RENDER: Loop started");
    loop {
        select! {
            recv(bus.render_rx) -> state => {
                match state {
                    Ok(state) => sink.present(&state),
                    Err(_) => break,
                }
            }
            recv(bus.sys_rx) -> evt => {
                match evt {
                    Ok(SystemEvent::Quit) | Err(_) => break,
                }
            }
        }
    }
    log::info!("RENDER: Loop stopped");
}

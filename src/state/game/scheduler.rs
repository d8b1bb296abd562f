//! Delayed tasks tied to a session epoch.
//!
//! Restarting a game advances the epoch; tasks queued under an older epoch
//! are dropped instead of firing into the new game.

use crate::models::clef::Clef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledKind {
    /// Refill the slot for this clef.
    Respawn(Clef),
}

/// Handle returned by [`Scheduler::schedule`], usable to cancel the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskHandle {
    id: u64,
    epoch: u64,
}

#[derive(Debug, Clone)]
struct ScheduledTask {
    handle: TaskHandle,
    due_ms: f64,
    kind: ScheduledKind,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    epoch: u64,
    next_id: u64,
    tasks: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, kind: ScheduledKind, due_ms: f64) -> TaskHandle {
        self.next_id += 1;
        let handle = TaskHandle {
            id: self.next_id,
            epoch: self.epoch,
        };
        self.tasks.push(ScheduledTask {
            handle,
            due_ms,
            kind,
        });
        handle
    }

    /// Returns `true` if the task was still pending.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.handle != handle);
        self.tasks.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    /// Invalidates every task queued so far. Returns the new epoch.
    pub fn advance_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }

    /// Removes and returns live tasks due at `now_ms`, earliest first.
    /// Stale tasks from earlier epochs are discarded.
    pub fn take_due(&mut self, now_ms: f64) -> Vec<(TaskHandle, ScheduledKind)> {
        let epoch = self.epoch;
        let stale = self.tasks.iter().filter(|t| t.handle.epoch != epoch).count();
        if stale > 0 {
            log::debug!("SCHEDULER: dropping {} task(s) from a previous session", stale);
        }

        let mut due = Vec::new();
        self.tasks.retain(|t| {
            if t.handle.epoch != epoch {
                return false;
            }
            if t.due_ms <= now_ms {
                due.push(t.clone());
                return false;
            }
            true
        });

        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));
        due.into_iter().map(|t| (t.handle, t.kind)).collect()
    }

    /// Live tasks still waiting.
    pub fn pending(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.handle.epoch == self.epoch)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_when_due() {
        let mut s = Scheduler::new();
        s.schedule(ScheduledKind::Respawn(Clef::Treble), 150.0);
        assert!(s.take_due(149.0).is_empty());
        let due = s.take_due(150.0);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].1, ScheduledKind::Respawn(Clef::Treble));
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn cancelled_task_never_fires() {
        let mut s = Scheduler::new();
        let h = s.schedule(ScheduledKind::Respawn(Clef::Bass), 10.0);
        assert!(s.cancel(h));
        assert!(!s.cancel(h));
        assert!(s.take_due(100.0).is_empty());
    }

    #[test]
    fn previous_epoch_is_discarded() {
        let mut s = Scheduler::new();
        s.schedule(ScheduledKind::Respawn(Clef::Treble), 10.0);
        s.advance_epoch();
        let fresh = s.schedule(ScheduledKind::Respawn(Clef::Bass), 20.0);

        assert_eq!(s.pending(), 1);
        let due = s.take_due(100.0);
        assert_eq!(due, vec![(fresh, ScheduledKind::Respawn(Clef::Bass))]);
    }

    #[test]
    fn due_tasks_come_out_in_order() {
        let mut s = Scheduler::new();
        s.schedule(ScheduledKind::Respawn(Clef::Bass), 30.0);
        s.schedule(ScheduledKind::Respawn(Clef::Treble), 10.0);
        let kinds: Vec<_> = s.take_due(50.0).into_iter().map(|(_, k)| k).collect();
        assert_eq!(
            kinds,
            vec![
                ScheduledKind::Respawn(Clef::Treble),
                ScheduledKind::Respawn(Clef::Bass)
            ]
        );
    }
}

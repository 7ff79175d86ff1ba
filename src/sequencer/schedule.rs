use crate::foundation::core::TimeMs;

/// What a timer does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// First trigger after mount.
    AutoStart,
    /// Trigger following a replay reset.
    ReplayTrigger,
    /// Move an active cycle to settled.
    Settle,
}

/// Opaque handle returned by [`Schedule::arm`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// A pending timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timer {
    /// Handle identifying this timer.
    pub handle: TimerHandle,
    /// Action to run.
    pub kind: TimerKind,
    /// Cycle the timer was armed for.
    pub cycle: u64,
    /// Due time.
    pub due: TimeMs,
}

/// Pending timers of one sequencer.
///
/// Timers fire in `(due, arm order)` order. Cancelling a timer that already fired (or was never
/// armed here) is a harmless no-op that reports `false`.
#[derive(Clone, Debug, Default)]
pub struct Schedule {
    next_id: u64,
    pending: Vec<Timer>,
}

impl Schedule {
    /// Create an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a timer due at `due`.
    pub fn arm(&mut self, kind: TimerKind, cycle: u64, due: TimeMs) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        let timer = Timer {
            handle,
            kind,
            cycle,
            due,
        };
        // Keep sorted; equal due times stay in arm order.
        let at = self.pending.partition_point(|t| t.due <= due);
        self.pending.insert(at, timer);
        tracing::trace!(?kind, cycle, due = due.0, "timer armed");
        handle
    }

    /// Cancel a timer. Returns `false` when it is no longer pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let Some(pos) = self.pending.iter().position(|t| t.handle == handle) else {
            return false;
        };
        let timer = self.pending.remove(pos);
        tracing::trace!(kind = ?timer.kind, cycle = timer.cycle, "timer cancelled");
        true
    }

    /// Cancel everything.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Remove and return the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: TimeMs) -> Option<Timer> {
        match self.pending.first() {
            Some(t) if t.due <= now => Some(self.pending.remove(0)),
            _ => None,
        }
    }

    /// Due time of the earliest pending timer.
    pub fn next_due(&self) -> Option<TimeMs> {
        self.pending.first().map(|t| t.due)
    }

    /// Number of pending timers of `kind`.
    pub fn pending(&self, kind: TimerKind) -> usize {
        self.pending.iter().filter(|t| t.kind == kind).count()
    }

    /// Return `true` when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequencer/schedule.rs"]
mod tests;

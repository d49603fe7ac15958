//! Task id generation.

use shared::domain::TaskId;

use crate::clock::{Clock, SystemClock};

pub trait IdSource {
    /// `None` once the id space is used up.
    fn next_id(&mut self) -> Option<TaskId>;

    /// Records an id issued elsewhere (e.g. loaded from storage) so it is never issued again.
    fn observe(&mut self, id: TaskId);
}

/// Millisecond timestamps, bumped past the last issued id whenever the clock has not
/// moved on (rapid successive adds, coarse clocks, clock going backwards).
#[derive(Debug, Clone)]
pub struct MonotonicIds<C = SystemClock> {
    clock: C,
    last: i64,
}

impl MonotonicIds<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for MonotonicIds<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MonotonicIds<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock, last: 0 }
    }
}

impl<C: Clock> IdSource for MonotonicIds<C> {
    fn next_id(&mut self) -> Option<TaskId> {
        let millis = self.clock.now().timestamp_millis();
        self.last = if millis > self.last {
            millis
        } else {
            self.last.checked_add(1)?
        };
        Some(TaskId(self.last))
    }

    fn observe(&mut self, id: TaskId) {
        self.last = self.last.max(id.0);
    }
}

/// Plain counter starting at 1.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    last: i64,
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> Option<TaskId> {
        self.last = self.last.checked_add(1)?;
        Some(TaskId(self.last))
    }

    fn observe(&mut self, id: TaskId) {
        self.last = self.last.max(id.0);
    }
}

#[cfg(test)]
#[path = "tests/ids_tests.rs"]
mod tests;

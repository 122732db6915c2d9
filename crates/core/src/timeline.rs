//! Timeline - deferred tasks on the host's clock
//!
//! `after(delay, task)` schedules a task; the host advances time with
//! [`Timeline::advance`] and drains due tasks with [`Timeline::pop_due`]. While a
//! task is being handled the clock reads that task's due time, so a follow-up
//! scheduled from it is relative to its cause rather than to the end of the tick.
//!
//! Nothing here sleeps: time only moves when the host says so.

/// Handle for cancelling a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer<T> {
    id: TimerId,
    due_ms: u64,
    task: T,
}

#[derive(Debug, Clone)]
pub struct Timeline<T> {
    now_ms: u64,
    horizon_ms: u64,
    next_id: u64,
    pending: Vec<Timer<T>>,
}

impl<T> Timeline<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            horizon_ms: 0,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Current clock reading in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `task` to become due `delay_ms` from now.
    pub fn after(&mut self, delay_ms: u32, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending.push(Timer {
            id,
            due_ms: self.now_ms + u64::from(delay_ms),
            task,
        });
        id
    }

    /// Cancel a pending task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Move the horizon forward; tasks due up to it become poppable.
    pub fn advance(&mut self, elapsed_ms: u32) {
        self.horizon_ms = self.horizon_ms.max(self.now_ms) + u64::from(elapsed_ms);
    }

    /// Pop the earliest task due at or before the horizon.
    ///
    /// Ties fire in scheduling order. When nothing is due the clock catches up
    /// with the horizon and `None` is returned.
    pub fn pop_due(&mut self) -> Option<T> {
        let next = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= self.horizon_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.id.0))
            .map(|(i, _)| i);

        match next {
            Some(i) => {
                let timer = self.pending.remove(i);
                self.now_ms = timer.due_ms;
                Some(timer.task)
            }
            None => {
                self.now_ms = self.horizon_ms;
                None
            }
        }
    }
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

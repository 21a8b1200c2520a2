//! One-shot timers on the shared animation clock
//!
//! Timers scheduled here live outside any timeline: once queued they fire
//! exactly once when the clock passes their due time, regardless of what the
//! timeline is doing.

/// Queue of pending one-shot events ordered by due time
#[derive(Debug)]
pub struct TimerQueue<E> {
    pending: Vec<(f32, E)>,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Schedules `event` to fire once the clock reaches `due`
    pub fn schedule(&mut self, due: f32, event: E) {
        // Keep insertion order among equal due times
        let index = self.pending.partition_point(|(t, _)| *t <= due);
        self.pending.insert(index, (due, event));
    }

    /// Removes and returns every event due at or before `now`, earliest first
    pub fn drain_due(&mut self, now: f32) -> Vec<(f32, E)> {
        let split = self.pending.partition_point(|(t, _)| *t <= now);
        self.pending.drain(..split).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Due times of everything still waiting, earliest first
    pub fn due_times(&self) -> impl Iterator<Item = f32> + '_ {
        self.pending.iter().map(|(t, _)| *t)
    }
}

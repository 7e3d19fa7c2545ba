use std::collections::VecDeque;

use crate::core::state::{MAX_PRIORITY, Pid, Priority};

/// Ready processes bucketed by priority. Lower numbers are served first,
/// FIFO within a bucket.
#[derive(Debug)]
pub struct ReadyQueue {
    buckets: Vec<VecDeque<Pid>>,
}

impl Default for ReadyQueue {
    fn default() -> Self {
        Self::new(MAX_PRIORITY)
    }
}

impl ReadyQueue {
    pub fn new(max_priority: Priority) -> Self {
        Self {
            buckets: vec![VecDeque::new(); max_priority as usize + 1],
        }
    }

    pub fn max_priority(&self) -> Priority {
        (self.buckets.len() - 1) as Priority
    }

    fn top_bucket(&self) -> Option<usize> {
        self.buckets.iter().position(|b| !b.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.top_bucket().is_none()
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(VecDeque::len).sum()
    }

    pub fn push(&mut self, pid: Pid, priority: Priority) {
        let max = self.max_priority();
        self.buckets
            .get_mut(priority as usize)
            .unwrap_or_else(|| panic!("Priority {priority} of process {pid} exceeds {max}"))
            .push_back(pid);
    }

    pub fn front(&self) -> Pid {
        let bucket = self.top_bucket().expect("front() on an empty ready queue");
        self.buckets[bucket][0]
    }

    pub fn pop(&mut self) -> Pid {
        let bucket = self.top_bucket().expect("pop() on an empty ready queue");
        self.buckets[bucket]
            .pop_front()
            .expect("Top bucket must be non-empty")
    }

    /// Visits pids in the order `pop()` would return them.
    pub fn iter(&self) -> impl Iterator<Item = Pid> + '_ {
        self.buckets.iter().flatten().copied()
    }

}

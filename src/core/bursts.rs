use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

use super::state::Ticks;

/// Alternating CPU / I/O run lengths for one process.
///
/// Only the kind of the head burst is stored; the kind of every later burst
/// follows from alternation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BurstSequence {
    bursts: VecDeque<Ticks>,
    processing: bool,
}

impl BurstSequence {
    pub fn new(bursts: impl IntoIterator<Item = Ticks>, processing: bool) -> Self {
        let bursts: VecDeque<Ticks> = bursts.into_iter().collect();
        assert!(
            bursts.iter().all(|&b| b > 0),
            "Burst durations must be positive"
        );
        Self { bursts, processing }
    }

    /// Is the head burst a CPU burst.
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn is_empty(&self) -> bool {
        self.bursts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bursts.len()
    }

    pub fn front(&self) -> Option<Ticks> {
        self.bursts.front().copied()
    }

    /// Bursts paired with whether each one is a CPU burst.
    pub fn iter(&self) -> impl Iterator<Item = (bool, Ticks)> + '_ {
        self.bursts
            .iter()
            .enumerate()
            .map(|(i, &b)| (self.processing == (i % 2 == 0), b))
    }

    /// Total CPU ticks still owed, across every remaining CPU burst.
    pub fn steps_remaining(&self) -> Ticks {
        self.iter().filter(|(cpu, _)| *cpu).map(|(_, b)| b).sum()
    }

    pub fn total(&self) -> Ticks {
        self.bursts.iter().sum()
    }

    pub fn longest_cpu_burst(&self) -> Ticks {
        self.iter()
            .filter(|(cpu, _)| *cpu)
            .map(|(_, b)| b)
            .max()
            .unwrap_or(0)
    }

    fn pop(&mut self) {
        self.bursts.pop_front();
        self.processing = !self.processing;
    }

    /// Consume one tick of the head burst. Returns true when that tick
    /// finished the burst and it was popped.
    pub fn step(&mut self) -> bool {
        let Some(head) = self.bursts.front_mut() else {
            return false;
        };
        *head -= 1;
        if *head == 0 {
            self.pop();
            return true;
        }
        false
    }
}

impl fmt::Display for BurstSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (cpu, burst) in self.iter() {
            write!(f, " {}{}", if cpu { '+' } else { '-' }, burst)?;
        }
        f.write_str(" ]")
    }
}

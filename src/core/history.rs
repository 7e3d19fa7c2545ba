use serde::Serialize;
use std::hash::Hash;

use super::state::Ticks;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period<S> {
    pub state: S,
    pub duration: Ticks,
}

/// Ordered record of how long something spent in each state. Consecutive
/// periods never share a state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct History<S> {
    trace: Vec<Period<S>>,
}

impl<S> Default for History<S> {
    fn default() -> Self {
        Self { trace: Vec::new() }
    }
}

impl<S: Copy + Eq + Hash> History<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, state: S, duration: Ticks) {
        match self.trace.last_mut() {
            Some(last) if last.state == state => last.duration += duration,
            _ => self.trace.push(Period { state, duration }),
        }
    }

    pub fn inc(&mut self, state: S) {
        self.push(state, 1);
    }

    pub fn periods(&self) -> &[Period<S>] {
        &self.trace
    }

    pub fn is_empty(&self) -> bool {
        self.trace.is_empty()
    }

    pub fn duration(&self) -> Ticks {
        self.trace.iter().map(|p| p.duration).sum()
    }

    pub fn duration_of(&self, state: S) -> Ticks {
        self.trace
            .iter()
            .filter(|p| p.state == state)
            .map(|p| p.duration)
            .sum()
    }

    /// Per-state totals across `histories`, one period per state in `order`.
    /// States that never occur are left out.
    pub fn collapse<'a>(histories: impl IntoIterator<Item = &'a History<S>>, order: &[S]) -> Self
    where
        S: 'a,
    {
        let mut totals = vec![0; order.len()];
        for history in histories {
            for period in &history.trace {
                if let Some(i) = order.iter().position(|s| *s == period.state) {
                    totals[i] += period.duration;
                }
            }
        }

        let mut out = Self::new();
        for (state, total) in order.iter().zip(totals) {
            if total > 0 {
                out.push(*state, total);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::CpuState;

    #[test]
    fn merges_consecutive_states() {
        let mut h = History::new();
        h.inc(CpuState::Idle);
        h.inc(CpuState::Idle);
        h.inc(CpuState::Processing);
        h.push(CpuState::Processing, 4);
        h.inc(CpuState::Idle);

        let periods: Vec<_> = h.periods().iter().map(|p| (p.state, p.duration)).collect();
        assert_eq!(
            periods,
            vec![
                (CpuState::Idle, 2),
                (CpuState::Processing, 5),
                (CpuState::Idle, 1)
            ]
        );
        assert_eq!(h.duration(), 8);
        assert_eq!(h.duration_of(CpuState::Idle), 3);
        assert_eq!(h.duration_of(CpuState::SwitchingIn), 0);
    }

    #[test]
    fn collapse_sums_per_state_in_order() {
        let mut a = History::new();
        a.push(CpuState::Processing, 3);
        a.push(CpuState::Idle, 2);
        let mut b = History::new();
        b.push(CpuState::Idle, 1);
        b.push(CpuState::Processing, 4);

        let sum = History::collapse([&a, &b], &CpuState::ALL);
        let periods: Vec<_> = sum
            .periods()
            .iter()
            .map(|p| (p.state, p.duration))
            .collect();
        assert_eq!(
            periods,
            vec![(CpuState::Idle, 3), (CpuState::Processing, 7)]
        );
    }
}

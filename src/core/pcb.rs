use serde::Serialize;

use super::{
    bursts::BurstSequence,
    history::History,
    state::{Pid, Priority, ProcessState, Ticks},
};

/// A process as handed to the simulator: who it is and what it will do.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessPlan {
    pub pid: Pid,
    pub priority: Priority,
    pub arrival: Ticks,
    pub bursts: BurstSequence,
}

impl ProcessPlan {
    pub fn new(pid: Pid, priority: Priority, arrival: Ticks, bursts: BurstSequence) -> Self {
        Self {
            pid,
            priority,
            arrival,
            bursts,
        }
    }
}

/// Process control block for a live process.
///
/// The CPU bound to the process drives `state` and the burst sequence while it
/// holds the process; the system drives them otherwise.
#[derive(Debug)]
pub struct Pcb {
    pub pid: Pid,
    pub priority: Priority,
    pub state: ProcessState,
    pub bursts: BurstSequence,
    pub arrival: Ticks,
    plan: BurstSequence,
    history: History<ProcessState>,
}

impl Pcb {
    pub fn new(plan: &ProcessPlan) -> Self {
        Self {
            pid: plan.pid,
            priority: plan.priority,
            state: ProcessState::Ready,
            bursts: plan.bursts.clone(),
            arrival: plan.arrival,
            plan: plan.bursts.clone(),
            history: History::new(),
        }
    }

    /// Record one tick in the current state. Running and blocked ticks also
    /// consume the head burst; returns true when that finished the burst.
    pub fn step(&mut self) -> bool {
        self.history.inc(self.state);
        if self.state.consumes_burst() {
            return self.bursts.step();
        }
        false
    }

    pub fn history(&self) -> &History<ProcessState> {
        &self.history
    }

    pub fn into_record(self, retired_at: Ticks) -> ProcessRecord {
        debug_assert!(
            self.bursts.is_empty(),
            "Process {} retired with bursts left",
            self.pid
        );
        ProcessRecord {
            pid: self.pid,
            priority: self.priority,
            arrival: self.arrival,
            retired_at,
            plan: self.plan,
            history: self.history,
        }
    }
}

/// Final, read-only trace of a retired process.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessRecord {
    pub pid: Pid,
    pub priority: Priority,
    pub arrival: Ticks,
    pub retired_at: Ticks,
    pub plan: BurstSequence,
    pub history: History<ProcessState>,
}

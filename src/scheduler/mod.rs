pub mod ready;

use serde::Serialize;
use std::fmt;

use crate::core::state::Ticks;
pub use ready::ReadyQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Policy {
    /// Run each burst to completion. The CPU stays bound to its process
    /// through the process's own I/O bursts until no bursts remain.
    Fcfs,
    /// Preempt after `quantum` processing ticks, or earlier if the CPU burst
    /// ends. The process always goes back to the system afterwards.
    RoundRobin { quantum: Ticks },
}

impl Policy {
    /// A zero quantum selects FCFS.
    pub fn from_quantum(quantum: Ticks) -> Self {
        if quantum == 0 {
            Self::Fcfs
        } else {
            Self::RoundRobin { quantum }
        }
    }

    pub fn is_preemptive(self) -> bool {
        matches!(self, Self::RoundRobin { .. })
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fcfs => f.write_str("FCFS"),
            Self::RoundRobin { quantum } => write!(f, "RR(q={quantum})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_quantum_is_fcfs() {
        assert_eq!(Policy::from_quantum(0), Policy::Fcfs);
        assert_eq!(Policy::from_quantum(4), Policy::RoundRobin { quantum: 4 });
        assert!(!Policy::Fcfs.is_preemptive());
        assert_eq!(Policy::from_quantum(4).to_string(), "RR(q=4)");
    }
}

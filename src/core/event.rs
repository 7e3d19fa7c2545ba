use serde::Serialize;

use crate::core::{CpuId, Pid};

/// Where the system put a process it took back from a CPU or the blocked list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Ready,
    Blocked,
    Retired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SchedEvent {
    Arrived {
        pid: Pid,
        to: Destination,
    },
    Assigned {
        cpu: CpuId,
        pid: Pid,
    },
    // CPU finished switching the process out
    Released {
        cpu: CpuId,
        pid: Pid,
        to: Destination,
    },
    // I/O burst finished outside any CPU
    Unblocked {
        pid: Pid,
        to: Destination,
    },
    // Follows the event that moved the process to `Destination::Retired`
    Retired {
        pid: Pid,
    },
}

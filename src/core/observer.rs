use rustc_hash::FxHashMap;

use super::{
    cpu::{Cpu, ProcessTable},
    state::{Pid, ProcessState},
};
use crate::scheduler::ReadyQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Location {
    Cpu(usize),
    Ready,
    Blocked,
}

/// Checks the system's bookkeeping between ticks. Only active in debug builds.
#[derive(Debug, Default)]
pub struct Observer;

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(
        &self,
        cpus: &[Cpu],
        procs: &ProcessTable,
        ready: &ReadyQueue,
        blocked: &[Pid],
    ) {
        if !cfg!(debug_assertions) {
            return;
        }

        let mut seen: FxHashMap<Pid, Location> = FxHashMap::default();
        let mut place = |pid: Pid, at: Location| {
            if let Some(prev) = seen.insert(pid, at) {
                debug_assert!(false, "Process {pid} found in {prev:?} and {at:?}");
            }
        };

        for cpu in cpus {
            match cpu.current() {
                Some(pid) => {
                    debug_assert!(
                        procs.contains_key(&pid),
                        "CPU {} bound to unknown process {pid}",
                        cpu.id
                    );
                    debug_assert!(!cpu.is_idle(), "Idle CPU {} bound to {pid}", cpu.id);
                    place(pid, Location::Cpu(cpu.id));
                }
                None => debug_assert!(cpu.is_idle(), "Busy CPU {} has no process", cpu.id),
            }
        }

        for pid in ready.iter() {
            debug_assert_eq!(
                procs.get(&pid).map(|p| p.state),
                Some(ProcessState::Ready),
                "Process {pid} in ready queue must be Ready"
            );
            place(pid, Location::Ready);
        }

        for &pid in blocked {
            debug_assert_eq!(
                procs.get(&pid).map(|p| p.state),
                Some(ProcessState::Blocked),
                "Process {pid} in blocked list must be Blocked"
            );
            place(pid, Location::Blocked);
        }

        for pid in procs.keys() {
            debug_assert!(
                seen.contains_key(pid),
                "Live process {pid} is not on a CPU, ready or blocked"
            );
        }
    }
}

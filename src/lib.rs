//! sched_model - discrete-tick model of CPU scheduling.
//!
//! Processes alternate CPU and I/O bursts and are spread over a fixed number
//! of CPUs under either round-robin (preemptive, fixed quantum) or FCFS
//! (run to completion). Context switches in and out cost a fixed number of
//! ticks. Every run is single-threaded and fully deterministic.
//!
//! - **core**: the tick engine (`System`), CPUs, PCBs, bursts and traces
//! - **scheduler**: policy selection and the priority ready queue
//! - **sim**: random workloads, CPU-count sweeps and derived statistics
//!
//! ```rust
//! use sched_model::{BurstSequence, Config, ProcessPlan, simulate};
//!
//! let config = Config {
//!     cpu_count: 1,
//!     quantum: 0,
//!     switch_in_delay: 0,
//!     switch_out_delay: 0,
//!     ..Config::default()
//! };
//! let plan = ProcessPlan::new(0, 0, 0, BurstSequence::new([5, 3, 2], true));
//! let report = simulate(config, vec![plan]);
//! assert_eq!(report.processes[0].retired_at, 10);
//! ```

pub mod core;
pub mod scheduler;
pub mod sim;

pub use crate::core::{
    BurstSequence, Config, ProcessPlan, RunOutcome, SchedEvent, SimulationReport, System,
};
pub use scheduler::Policy;
pub use sim::{simulate, simulate_with, sweep};

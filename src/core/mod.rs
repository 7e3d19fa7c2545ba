pub mod bursts;
pub mod config;
pub mod cpu;
pub mod driver;
pub mod event;
pub mod history;
pub mod observer;
pub mod pcb;
pub mod state;
pub mod timer;

pub use bursts::BurstSequence;
pub use config::Config;
pub use cpu::{Cpu, CpuRecord, ProcessTable};
pub use driver::{RunOutcome, SimulationReport, System};
pub use event::{Destination, SchedEvent};
pub use history::{History, Period};
pub use pcb::{Pcb, ProcessPlan, ProcessRecord};
pub use state::{CpuId, CpuState, MAX_PRIORITY, Pid, Priority, ProcessState, Ticks};
pub use timer::Timer;

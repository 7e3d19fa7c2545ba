use serde::Serialize;
use std::fmt;

use super::state::Ticks;
use crate::scheduler::Policy;

/// Settings for one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Config {
    pub cpu_count: usize,
    pub process_count: u16,
    /// Round-robin quantum; 0 selects FCFS.
    pub quantum: Ticks,
    pub switch_in_delay: Ticks,
    pub switch_out_delay: Ticks,
    /// The run halts after this many ticks even if processes remain.
    pub max_ticks: Ticks,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cpu_count: 4,
            process_count: 10,
            quantum: 100,
            switch_in_delay: 7,
            switch_out_delay: 3,
            max_ticks: u32::MAX as Ticks,
        }
    }
}

impl Config {
    pub fn fcfs() -> Self {
        Self {
            quantum: 0,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> Policy {
        Policy::from_quantum(self.quantum)
    }

    /// `CPUS_PROCESSES_QUANTUM_IN_OUT`, used to tell runs of a sweep apart.
    pub fn label(&self) -> String {
        format!(
            "{}_{}_{}_{}_{}",
            self.cpu_count,
            self.process_count,
            self.quantum,
            self.switch_in_delay,
            self.switch_out_delay
        )
    }

    /// Copies of `self` with CPU counts spaced logarithmically over
    /// `[min, max]`, five steps per decade. Counts that truncate to the same
    /// integer are kept once.
    pub fn cpu_range(&self, max: usize, min: usize) -> Vec<Config> {
        assert!(min >= 1 && min <= max, "Invalid CPU range {min}..={max}");
        let lo = (min as f64).log10();
        let hi = (max as f64).log10();

        let mut out: Vec<Config> = Vec::new();
        let mut k = 0u32;
        loop {
            let exp = lo + 0.2 * k as f64;
            if exp > hi + 1e-9 {
                break;
            }
            let cpu_count = (10f64.powf(exp) as usize).clamp(min, max);
            if out.last().is_none_or(|c| c.cpu_count != cpu_count) {
                out.push(Config { cpu_count, ..*self });
            }
            k += 1;
        }
        out
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "System Settings:")?;
        writeln!(f, "    CPUs:          {}", self.cpu_count)?;
        writeln!(f, "    Processes:     {}", self.process_count)?;
        writeln!(f, "    Policy:        {}", self.policy())?;
        writeln!(f, "    Switching In:  {}", self.switch_in_delay)?;
        write!(f, "    Switching Out: {}", self.switch_out_delay)
    }
}

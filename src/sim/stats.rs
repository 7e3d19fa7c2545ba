//! Derived metrics over finished runs.
//!
//! Nothing here feeds back into scheduling; it only reads the records a
//! `SimulationReport` carries.

use average::{Estimate, Mean};
use std::fmt;

use crate::core::{
    CpuRecord, CpuState, History, ProcessRecord, ProcessState, SimulationReport, Ticks,
};

impl ProcessRecord {
    /// Every tick the process was alive.
    pub fn turnaround(&self) -> Ticks {
        self.history.duration()
    }

    /// Ticks spent not consuming a burst.
    pub fn wait(&self) -> Ticks {
        self.history.duration_of(ProcessState::Ready)
            + self.history.duration_of(ProcessState::Switching)
            + self.history.duration_of(ProcessState::Exit)
    }

    /// Longest stretch between two blocked periods.
    pub fn response(&self) -> Ticks {
        let mut longest = 0;
        let mut current = 0;
        for period in self.history.periods() {
            if period.state == ProcessState::Blocked {
                longest = longest.max(current);
                current = 0;
            } else {
                current += period.duration;
            }
        }
        longest
    }

    /// `response()` relative to the longest CPU burst the process asked for.
    pub fn response_adjusted(&self) -> f64 {
        let response = self.response();
        let longest_burst = self.plan.longest_cpu_burst();
        if response == 0 || longest_burst == 0 {
            return 0.0;
        }
        response as f64 / longest_burst as f64
    }
}

impl CpuRecord {
    pub fn state_fraction(&self, state: CpuState) -> f64 {
        let total = self.history.duration();
        if total == 0 {
            return 0.0;
        }
        self.history.duration_of(state) as f64 / total as f64
    }
}

fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    iter.collect::<Mean>().estimate()
}

impl SimulationReport {
    /// Planned work of the retired processes over the configured process
    /// count.
    pub fn avg_process_length(&self) -> f64 {
        if self.config.process_count == 0 {
            return 0.0;
        }
        let total: Ticks = self.processes.iter().map(|p| p.plan.total()).sum();
        total as f64 / f64::from(self.config.process_count)
    }

    pub fn avg_turnaround(&self) -> f64 {
        avg(self.processes.iter().map(|p| p.turnaround() as f64))
    }

    pub fn avg_wait(&self) -> f64 {
        avg(self.processes.iter().map(|p| p.wait() as f64))
    }

    pub fn avg_response(&self) -> f64 {
        avg(self.processes.iter().map(|p| p.response() as f64))
    }

    pub fn avg_response_adjusted(&self) -> f64 {
        avg(self.processes.iter().map(ProcessRecord::response_adjusted))
    }

    /// Retired processes per tick.
    pub fn throughput(&self) -> f64 {
        let Some(total) = self.cpus.first().map(|c| c.history.duration()) else {
            return 0.0;
        };
        if total == 0 {
            return 0.0;
        }
        self.processes.len() as f64 / total as f64
    }

    pub fn throughput_per_cpu(&self) -> f64 {
        if self.cpus.is_empty() {
            return 0.0;
        }
        self.throughput() / self.cpus.len() as f64
    }

    pub fn cpu_history(&self) -> History<CpuState> {
        History::collapse(self.cpus.iter().map(|c| &c.history), &CpuState::ALL)
    }

    pub fn process_history(&self) -> History<ProcessState> {
        History::collapse(
            self.processes.iter().map(|p| &p.history),
            &ProcessState::ALL,
        )
    }

    /// Percentage of all CPU time spent processing.
    pub fn cpu_utilization(&self) -> f64 {
        let history = self.cpu_history();
        let total = history.duration();
        if total == 0 {
            return 0.0;
        }
        100.0 * history.duration_of(CpuState::Processing) as f64 / total as f64
    }

    pub fn summary(&self) -> Summary<'_> {
        Summary(self)
    }

    pub fn csv_header() -> &'static str {
        "settings,process_length,turnaround,wait,response,response_adjusted,throughput,throughput_inv,throughput_inv_cpu,cpu_processing_pct"
    }

    pub fn csv_row(&self) -> String {
        let throughput = self.throughput();
        let inv = if throughput > 0.0 {
            1.0 / throughput
        } else {
            0.0
        };
        format!(
            "{},{:.5},{:.5},{:.5},{:.5},{:.5},{:.5},{:.5},{:.5},{:.5}",
            self.config.label(),
            self.avg_process_length(),
            self.avg_turnaround(),
            self.avg_wait(),
            self.avg_response(),
            self.avg_response_adjusted(),
            throughput,
            inv,
            inv / self.cpus.len().max(1) as f64,
            self.cpu_utilization()
        )
    }
}

fn write_percentages<S>(
    f: &mut fmt::Formatter<'_>,
    history: &History<S>,
    name: impl Fn(S) -> &'static str,
) -> fmt::Result
where
    S: Copy + Eq + std::hash::Hash,
{
    let total = history.duration().max(1) as f64;
    let width = history
        .periods()
        .iter()
        .map(|p| name(p.state).len())
        .max()
        .unwrap_or(0);
    for period in history.periods() {
        let label = name(period.state);
        writeln!(
            f,
            "    {label}: {:pad$}{:.3}%",
            "",
            100.0 * period.duration as f64 / total,
            pad = width - label.len()
        )?;
    }
    Ok(())
}

/// Human-readable overview of one run.
pub struct Summary<'a>(&'a SimulationReport);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let (outcome, ticks) = (report.outcome, report.ticks);
        let retired = report.processes.len();
        let length = report.avg_process_length();
        let turnaround = report.avg_turnaround();
        let wait = report.avg_wait();
        let response = report.avg_response();
        let adjusted = report.avg_response_adjusted();
        let throughput = report.throughput();
        let per_cpu = report.throughput_per_cpu();

        writeln!(f, "{}", report.config)?;
        writeln!(f)?;
        writeln!(f, "Overall Stats ({outcome:?} after {ticks} ticks):")?;
        writeln!(f, "    Retired:            {retired}")?;
        writeln!(f, "    Avg Process Length: {length:.3} ticks")?;
        writeln!(f, "    Avg Turnaround:     {turnaround:.3} ticks")?;
        writeln!(f, "    Avg Wait:           {wait:.3} ticks")?;
        writeln!(f, "    Avg Response:       {response:.3} ticks")?;
        writeln!(f, "        Adjusted:       {adjusted:.3}x longer")?;
        writeln!(f, "    Throughput:         {throughput:.5} proc/tick")?;
        writeln!(f, "        Per CPU:        {per_cpu:.5} proc/tick/cpu")?;
        writeln!(f)?;
        writeln!(f, "CPU Stats:")?;
        write_percentages(f, &report.cpu_history(), CpuState::as_str)?;
        writeln!(f)?;
        writeln!(f, "Process Stats:")?;
        write_percentages(f, &report.process_history(), ProcessState::as_str)
    }
}

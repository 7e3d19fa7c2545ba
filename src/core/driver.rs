use serde::Serialize;
use tracing::{debug, trace, warn};

use super::{
    config::Config,
    cpu::{Cpu, CpuRecord, ProcessTable},
    event::{Destination, SchedEvent},
    observer::Observer,
    pcb::{Pcb, ProcessPlan, ProcessRecord},
    state::{Pid, ProcessState, Ticks},
    timer::Timer,
};
use crate::scheduler::ReadyQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every process retired.
    Completed,
    /// Stopped by `Config::max_ticks` with work outstanding.
    TickLimitReached { live: usize, pending: usize },
}

/// Everything a finished (or halted) run leaves behind.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub config: Config,
    pub outcome: RunOutcome,
    pub ticks: Ticks,
    /// In retirement order.
    pub processes: Vec<ProcessRecord>,
    pub cpus: Vec<CpuRecord>,
}

/// The whole simulated machine: CPUs, the process table, the ready queue, the
/// blocked list and processes yet to arrive.
///
/// Every live process is on exactly one CPU, in the ready queue, or in the
/// blocked list between ticks. Retired processes leave the table for good.
pub struct System {
    config: Config,
    now: Ticks,
    cpus: Vec<Cpu>,
    procs: ProcessTable,
    ready: ReadyQueue,
    // Stepped in insertion order
    blocked: Vec<Pid>,
    arrivals: Vec<Timer<ProcessPlan>>,
    retired: Vec<ProcessRecord>,
    observer: Observer,
}

impl System {
    pub fn new(config: Config) -> Self {
        let cpus = (0..config.cpu_count)
            .map(|id| Cpu::new(id, &config))
            .collect();
        Self {
            config,
            now: 0,
            cpus,
            procs: ProcessTable::default(),
            ready: ReadyQueue::default(),
            blocked: Vec::new(),
            arrivals: Vec::new(),
            retired: Vec::new(),
            observer: Observer::new(),
        }
    }

    /// Queue processes for arrival. Plans due at or before the current tick
    /// are admitted immediately, in the order given.
    pub fn load(&mut self, plans: impl IntoIterator<Item = ProcessPlan>) -> Vec<SchedEvent> {
        let mut events = Vec::new();
        for plan in plans {
            let wait = plan.arrival.saturating_sub(self.now);
            if wait == 0 {
                let pid = plan.pid;
                let to = self.admit(plan);
                push_moved(&mut events, SchedEvent::Arrived { pid, to }, pid, to);
            } else {
                self.arrivals.push(Timer::new(wait, plan));
            }
        }
        events
    }

    pub fn now(&self) -> Ticks {
        self.now
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cpus(&self) -> &[Cpu] {
        &self.cpus
    }

    pub fn ready(&self) -> &ReadyQueue {
        &self.ready
    }

    pub fn blocked(&self) -> &[Pid] {
        &self.blocked
    }

    pub fn process(&self, pid: Pid) -> Option<&Pcb> {
        self.procs.get(&pid)
    }

    pub fn retired(&self) -> &[ProcessRecord] {
        &self.retired
    }

    /// No live processes and none still to arrive.
    pub fn is_finished(&self) -> bool {
        self.procs.is_empty() && self.arrivals.is_empty()
    }

    pub fn outcome(&self) -> RunOutcome {
        if self.is_finished() {
            RunOutcome::Completed
        } else {
            RunOutcome::TickLimitReached {
                live: self.procs.len(),
                pending: self.arrivals.len(),
            }
        }
    }

    /// Tick until every process has retired or the tick limit is hit.
    pub fn run(&mut self) -> RunOutcome {
        self.run_with(|_, _| {})
    }

    /// Like `run`, handing every event to `on_event` with the tick it
    /// happened in.
    pub fn run_with(&mut self, mut on_event: impl FnMut(Ticks, &SchedEvent)) -> RunOutcome {
        while !self.is_finished() {
            if self.now >= self.config.max_ticks {
                warn!(
                    now = self.now,
                    live = self.procs.len(),
                    pending = self.arrivals.len(),
                    "tick limit reached"
                );
                break;
            }
            let now = self.now;
            for event in self.tick() {
                on_event(now, &event);
            }
        }
        self.outcome()
    }

    /// Advance the whole system by one tick. The phases run in a fixed order:
    /// CPUs by index, then blocked processes, then ready processes, then
    /// arrivals.
    pub fn tick(&mut self) -> Vec<SchedEvent> {
        trace!(
            now = self.now,
            ready = self.ready.len(),
            blocked = self.blocked.len(),
            "tick"
        );
        let mut events = Vec::new();
        self.tick_cpus(&mut events);
        self.tick_blocked(&mut events);
        self.tick_ready();
        self.tick_arrivals(&mut events);

        self.observer
            .observe(&self.cpus, &self.procs, &self.ready, &self.blocked);
        self.now += 1;
        events
    }

    fn tick_cpus(&mut self, events: &mut Vec<SchedEvent>) {
        for cpu in 0..self.cpus.len() {
            let was_idle = self.cpus[cpu].is_idle();
            // Idle CPUs always report themselves available
            if !self.cpus[cpu].step(&mut self.procs) {
                continue;
            }

            if !was_idle {
                let pid = self.cpus[cpu]
                    .last_pid()
                    .expect("CPU finished switching out without a process");
                let to = self.relocate(pid);
                debug!(now = self.now, cpu, pid, ?to, "released");
                push_moved(events, SchedEvent::Released { cpu, pid, to }, pid, to);
            }

            if !self.ready.is_empty() {
                let pid = self.ready.pop();
                let pcb = self
                    .procs
                    .get_mut(&pid)
                    .expect("Ready process missing from process table");
                self.cpus[cpu].assign(pcb);
                debug!(now = self.now, cpu, pid, "assigned");
                events.push(SchedEvent::Assigned { cpu, pid });
            }
        }
    }

    fn tick_blocked(&mut self, events: &mut Vec<SchedEvent>) {
        let blocked = std::mem::take(&mut self.blocked);
        for pid in blocked {
            let pcb = self
                .procs
                .get_mut(&pid)
                .expect("Blocked process missing from process table");
            if !pcb.step() {
                self.blocked.push(pid);
                continue;
            }

            let to = if pcb.bursts.is_empty() {
                self.retire(pid);
                Destination::Retired
            } else {
                pcb.state = ProcessState::Ready;
                self.ready.push(pid, pcb.priority);
                Destination::Ready
            };
            debug!(now = self.now, pid, ?to, "unblocked");
            push_moved(events, SchedEvent::Unblocked { pid, to }, pid, to);
        }
    }

    // Bookkeeping only: ready ticks never consume bursts
    fn tick_ready(&mut self) {
        for pid in self.ready.iter() {
            self.procs
                .get_mut(&pid)
                .expect("Ready process missing from process table")
                .step();
        }
    }

    fn tick_arrivals(&mut self, events: &mut Vec<SchedEvent>) {
        let pending = std::mem::take(&mut self.arrivals);
        for mut timer in pending {
            if !timer.step() {
                self.arrivals.push(timer);
                continue;
            }
            let plan = timer.into_data();
            let pid = plan.pid;
            let to = self.admit(plan);
            push_moved(events, SchedEvent::Arrived { pid, to }, pid, to);
        }
    }

    fn admit(&mut self, plan: ProcessPlan) -> Destination {
        let pid = plan.pid;
        debug_assert!(
            !self.procs.contains_key(&pid),
            "Process {pid} admitted twice"
        );
        let mut pcb = Pcb::new(&plan);

        let to = if pcb.bursts.is_empty() {
            self.retired.push(pcb.into_record(self.now));
            Destination::Retired
        } else if pcb.bursts.is_processing() {
            self.ready.push(pid, pcb.priority);
            self.procs.insert(pid, pcb);
            Destination::Ready
        } else {
            pcb.state = ProcessState::Blocked;
            self.blocked.push(pid);
            self.procs.insert(pid, pcb);
            Destination::Blocked
        };
        debug!(now = self.now, pid, priority = plan.priority, ?to, "arrived");
        to
    }

    /// Put a process a CPU just let go of wherever its state says it belongs.
    fn relocate(&mut self, pid: Pid) -> Destination {
        let pcb = self
            .procs
            .get_mut(&pid)
            .expect("Released process missing from process table");

        if pcb.state == ProcessState::Exit {
            self.retire(pid);
            Destination::Retired
        } else if pcb.bursts.is_processing() {
            pcb.state = ProcessState::Ready;
            self.ready.push(pid, pcb.priority);
            Destination::Ready
        } else {
            pcb.state = ProcessState::Blocked;
            self.blocked.push(pid);
            Destination::Blocked
        }
    }

    fn retire(&mut self, pid: Pid) {
        let pcb = self
            .procs
            .remove(&pid)
            .expect("Retiring process missing from process table");
        debug!(
            now = self.now,
            pid,
            turnaround = pcb.history().duration(),
            "retired"
        );
        self.retired.push(pcb.into_record(self.now));
    }

    pub fn into_report(self) -> SimulationReport {
        SimulationReport {
            outcome: self.outcome(),
            config: self.config,
            ticks: self.now,
            cpus: self.cpus.iter().map(Cpu::record).collect(),
            processes: self.retired,
        }
    }
}

fn push_moved(events: &mut Vec<SchedEvent>, event: SchedEvent, pid: Pid, to: Destination) {
    events.push(event);
    if to == Destination::Retired {
        events.push(SchedEvent::Retired { pid });
    }
}

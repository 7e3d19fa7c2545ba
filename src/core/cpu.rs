use serde::Serialize;

use super::{
    config::Config,
    history::History,
    pcb::Pcb,
    state::{CpuId, CpuState, Pid, ProcessState, Ticks},
    timer::Timer,
};
use crate::scheduler::Policy;

pub type ProcessTable = rustc_hash::FxHashMap<Pid, Pcb>;

/// A processing unit and the process bound to it, if any.
///
/// The unit holds only the pid of its process; the pcb itself stays in the
/// system's process table and is looked up on each tick.
#[derive(Debug)]
pub struct Cpu {
    pub id: CpuId,
    policy: Policy,
    switch_in_delay: Ticks,
    switch_out_delay: Ticks,
    // State and time left in it; FCFS serving timers are zero-length and never stepped
    timer: Timer<CpuState>,
    current: Option<Pid>,
    last_pid: Option<Pid>,
    history: History<CpuState>,
}

impl Cpu {
    pub fn new(id: CpuId, config: &Config) -> Self {
        Self {
            id,
            policy: config.policy(),
            switch_in_delay: config.switch_in_delay,
            switch_out_delay: config.switch_out_delay,
            timer: Timer::new(0, CpuState::Idle),
            current: None,
            last_pid: None,
            history: History::new(),
        }
    }

    pub fn state(&self) -> CpuState {
        *self.timer.data()
    }

    pub fn is_idle(&self) -> bool {
        self.state() == CpuState::Idle
    }

    /// Process currently bound to this CPU.
    pub fn current(&self) -> Option<Pid> {
        self.current
    }

    /// Most recently bound process; kept after it is released.
    pub fn last_pid(&self) -> Option<Pid> {
        self.last_pid
    }

    pub fn history(&self) -> &History<CpuState> {
        &self.history
    }

    /// Bind `pcb` and start switching it in.
    pub fn assign(&mut self, pcb: &mut Pcb) {
        assert!(
            self.is_idle(),
            "CPU {} assigned process {} while {}",
            self.id,
            pcb.pid,
            self.state()
        );
        self.current = Some(pcb.pid);
        self.last_pid = Some(pcb.pid);
        pcb.state = ProcessState::Switching;
        if self.switch_in_delay == 0 {
            self.begin_service(pcb);
        } else {
            self.timer = Timer::new(self.switch_in_delay, CpuState::SwitchingIn);
        }
    }

    // Switch-in finished: start running the process under the policy
    fn begin_service(&mut self, pcb: &mut Pcb) {
        match self.policy {
            Policy::Fcfs => self.serve_head_burst(pcb),
            Policy::RoundRobin { quantum } => {
                pcb.state = ProcessState::Running;
                self.timer = Timer::new(quantum, CpuState::Processing);
            }
        }
    }

    // FCFS: serve whatever kind of burst is at the head without releasing the CPU
    fn serve_head_burst(&mut self, pcb: &mut Pcb) {
        if pcb.bursts.is_processing() {
            pcb.state = ProcessState::Running;
            self.timer = Timer::new(0, CpuState::Processing);
        } else {
            pcb.state = ProcessState::Blocked;
            self.timer = Timer::new(0, CpuState::AssignedIdle);
        }
    }

    /// Start switching the bound process out. Returns true if there is no
    /// switch-out delay and the CPU is already free.
    fn deassign(&mut self, pcb: &mut Pcb) -> bool {
        assert!(!self.is_idle(), "CPU {} deassigned while idle", self.id);
        pcb.state = if pcb.bursts.is_empty() {
            ProcessState::Exit
        } else {
            ProcessState::Switching
        };
        if self.switch_out_delay == 0 {
            self.release();
            return true;
        }
        self.timer = Timer::new(self.switch_out_delay, CpuState::SwitchingOut);
        false
    }

    fn release(&mut self) {
        self.timer = Timer::new(0, CpuState::Idle);
        self.current = None;
    }

    /// Advance one tick.
    ///
    /// Returns true when the CPU is available: either it was already idle, or
    /// it has just finished switching out and the system must relocate
    /// `last_pid()`.
    pub fn step(&mut self, procs: &mut ProcessTable) -> bool {
        let state = self.state();
        self.history.inc(state);

        let Some(pid) = self.current else {
            debug_assert_eq!(state, CpuState::Idle, "CPU {} lost its process", self.id);
            return true;
        };
        let pcb = procs
            .get_mut(&pid)
            .unwrap_or_else(|| panic!("Process {pid} on CPU {} missing from table", self.id));

        let burst_done = pcb.step();
        let serving = matches!(state, CpuState::Processing | CpuState::AssignedIdle);
        let timer_done = if self.policy.is_preemptive() || !serving {
            self.timer.step()
        } else {
            false
        };

        match state {
            CpuState::Processing | CpuState::AssignedIdle => {
                if burst_done || timer_done {
                    match self.policy {
                        Policy::Fcfs if !pcb.bursts.is_empty() => self.serve_head_burst(pcb),
                        _ => return self.deassign(pcb),
                    }
                }
            }
            CpuState::SwitchingIn => {
                if timer_done {
                    self.begin_service(pcb);
                }
            }
            CpuState::SwitchingOut => {
                if timer_done {
                    self.release();
                    return true;
                }
            }
            CpuState::Idle => unreachable!("Idle CPU {} holds process {pid}", self.id),
        }
        false
    }

    pub fn record(&self) -> CpuRecord {
        CpuRecord {
            id: self.id,
            history: self.history.clone(),
        }
    }
}

/// Final, read-only trace of a processing unit.
#[derive(Debug, Clone, Serialize)]
pub struct CpuRecord {
    pub id: CpuId,
    pub history: History<CpuState>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{bursts::BurstSequence, pcb::ProcessPlan};

    fn table(bursts: &[Ticks], processing: bool) -> ProcessTable {
        let plan = ProcessPlan::new(
            1,
            0,
            0,
            BurstSequence::new(bursts.iter().copied(), processing),
        );
        let mut procs = ProcessTable::default();
        procs.insert(1, Pcb::new(&plan));
        procs
    }

    fn config(quantum: Ticks, switch_in: Ticks, switch_out: Ticks) -> Config {
        Config {
            cpu_count: 1,
            process_count: 1,
            quantum,
            switch_in_delay: switch_in,
            switch_out_delay: switch_out,
            ..Config::default()
        }
    }

    fn periods(cpu: &Cpu) -> Vec<(CpuState, Ticks)> {
        cpu.history()
            .periods()
            .iter()
            .map(|p| (p.state, p.duration))
            .collect()
    }

    // Step until the CPU signals, returning how many ticks that took
    fn run_until_signal(cpu: &mut Cpu, procs: &mut ProcessTable) -> Ticks {
        let mut ticks = 0;
        loop {
            ticks += 1;
            if cpu.step(procs) {
                return ticks;
            }
            assert!(ticks < 1_000, "CPU never signalled");
        }
    }

    #[test]
    fn idle_cpu_signals_every_tick() {
        let mut cpu = Cpu::new(0, &config(2, 0, 0));
        let mut procs = ProcessTable::default();
        for _ in 0..5 {
            assert!(cpu.step(&mut procs));
        }
        assert_eq!(periods(&cpu), vec![(CpuState::Idle, 5)]);
        assert_eq!(cpu.last_pid(), None);
    }

    #[test]
    fn round_robin_preempts_after_quantum() {
        let mut cpu = Cpu::new(0, &config(3, 2, 1));
        let mut procs = table(&[10], true);
        cpu.assign(procs.get_mut(&1).unwrap());
        assert_eq!(cpu.state(), CpuState::SwitchingIn);

        assert_eq!(run_until_signal(&mut cpu, &mut procs), 2 + 3 + 1);
        assert!(cpu.is_idle());
        assert_eq!(cpu.current(), None);
        assert_eq!(cpu.last_pid(), Some(1));
        assert_eq!(
            periods(&cpu),
            vec![
                (CpuState::SwitchingIn, 2),
                (CpuState::Processing, 3),
                (CpuState::SwitchingOut, 1)
            ]
        );

        let pcb = &procs[&1];
        assert_eq!(pcb.state, ProcessState::Switching);
        assert_eq!(pcb.bursts.front(), Some(7));
    }

    #[test]
    fn round_robin_releases_when_burst_ends_early() {
        let mut cpu = Cpu::new(0, &config(5, 0, 0));
        let mut procs = table(&[2, 4], true);
        cpu.assign(procs.get_mut(&1).unwrap());
        assert_eq!(cpu.state(), CpuState::Processing);

        assert_eq!(run_until_signal(&mut cpu, &mut procs), 2);
        let pcb = &procs[&1];
        assert_eq!(pcb.state, ProcessState::Switching);
        assert!(!pcb.bursts.is_processing());
    }

    #[test]
    fn fcfs_stays_bound_through_io() {
        let mut cpu = Cpu::new(0, &config(0, 1, 2));
        let mut procs = table(&[2, 3, 1], true);
        cpu.assign(procs.get_mut(&1).unwrap());

        assert_eq!(run_until_signal(&mut cpu, &mut procs), 1 + 2 + 3 + 1 + 2);
        assert_eq!(
            periods(&cpu),
            vec![
                (CpuState::SwitchingIn, 1),
                (CpuState::Processing, 2),
                (CpuState::AssignedIdle, 3),
                (CpuState::Processing, 1),
                (CpuState::SwitchingOut, 2)
            ]
        );
        let pcb = &procs[&1];
        assert_eq!(pcb.state, ProcessState::Exit);
        assert_eq!(pcb.history().duration_of(ProcessState::Exit), 2);
    }

    #[test]
    fn fcfs_resumes_io_head_as_assigned_idle() {
        let mut cpu = Cpu::new(0, &config(0, 0, 0));
        let mut procs = table(&[2, 1], false);
        cpu.assign(procs.get_mut(&1).unwrap());
        assert_eq!(cpu.state(), CpuState::AssignedIdle);
        assert_eq!(procs[&1].state, ProcessState::Blocked);
    }

    #[test]
    #[should_panic(expected = "assigned process")]
    fn assigning_busy_cpu_panics() {
        let mut cpu = Cpu::new(0, &config(2, 1, 1));
        let mut procs = table(&[4], true);
        cpu.assign(procs.get_mut(&1).unwrap());
        cpu.assign(procs.get_mut(&1).unwrap());
    }

    #[test]
    #[should_panic(expected = "deassigned while idle")]
    fn deassigning_idle_cpu_panics() {
        let mut cpu = Cpu::new(0, &config(2, 1, 1));
        let mut procs = table(&[4], true);
        cpu.deassign(procs.get_mut(&1).unwrap());
    }

    #[test]
    #[should_panic(expected = "missing from table")]
    fn bound_process_must_exist() {
        let mut cpu = Cpu::new(0, &config(2, 1, 1));
        let mut procs = table(&[4], true);
        cpu.assign(procs.get_mut(&1).unwrap());
        procs.clear();
        cpu.step(&mut procs);
    }
}

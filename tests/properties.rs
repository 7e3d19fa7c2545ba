//! Invariants that must hold for any workload.

use sched_model::{
    Config,
    RunOutcome,
    SimulationReport,
    core::{CpuState, ProcessState, Ticks},
    sim::seeded_plans,
    simulate,
};

mod common;

fn run(
    cpus: usize,
    quantum: Ticks,
    switch_in: Ticks,
    switch_out: Ticks,
    seed: u64,
) -> SimulationReport {
    let config = Config {
        cpu_count: cpus,
        process_count: 12,
        quantum,
        switch_in_delay: switch_in,
        switch_out_delay: switch_out,
        ..Config::default()
    };
    simulate(config, seeded_plans(config.process_count, seed))
}

fn reports() -> Vec<SimulationReport> {
    let mut out = Vec::new();
    for seed in [1, 2, 3] {
        for cpus in [1, 3] {
            for quantum in [0, 2, 50] {
                for (switch_in, switch_out) in [(0, 0), (7, 3)] {
                    out.push(run(cpus, quantum, switch_in, switch_out, seed));
                }
            }
        }
    }
    out
}

#[test]
fn every_process_retires_once() {
    common::setup_test();
    for report in reports() {
        assert_eq!(report.outcome, RunOutcome::Completed);
        let mut pids: Vec<_> = report.processes.iter().map(|p| p.pid).collect();
        pids.sort_unstable();
        let label = report.config.label();
        assert_eq!(pids, (0..12).collect::<Vec<_>>(), "{label}");
    }
}

#[test]
fn burst_time_is_conserved() {
    common::setup_test();
    for report in reports() {
        for p in &report.processes {
            let cpu_total: Ticks = p.plan.iter().filter(|(cpu, _)| *cpu).map(|(_, b)| b).sum();
            let io_total = p.plan.total() - cpu_total;
            assert_eq!(p.history.duration_of(ProcessState::Running), cpu_total);
            assert_eq!(p.history.duration_of(ProcessState::Blocked), io_total);
            assert_eq!(p.turnaround(), p.plan.total() + p.wait());
            assert!(p.retired_at >= p.arrival);
        }
    }
}

#[test]
fn cpus_account_for_every_tick() {
    common::setup_test();
    for report in reports() {
        for cpu in &report.cpus {
            assert_eq!(cpu.history.duration(), report.ticks);
        }
    }
}

#[test]
fn round_robin_never_exceeds_quantum() {
    common::setup_test();
    for seed in [4, 5] {
        for quantum in [1, 3, 40] {
            let report = run(2, quantum, 2, 1, seed);
            for cpu in &report.cpus {
                for period in cpu.history.periods() {
                    if period.state == CpuState::Processing {
                        assert!(period.duration <= quantum);
                    }
                }
            }
            for p in &report.processes {
                for period in p.history.periods() {
                    if period.state == ProcessState::Running {
                        assert!(period.duration <= quantum);
                    }
                }
            }
        }
    }
}

#[test]
fn fcfs_only_switches_at_burst_boundaries() {
    common::setup_test();
    for seed in [6, 7] {
        for (switch_in, switch_out) in [(0, 0), (7, 3)] {
            let report = run(2, 0, switch_in, switch_out, seed);
            for p in &report.processes {
                let served: Vec<Ticks> = p
                    .history
                    .periods()
                    .iter()
                    .filter(|period| period.state.consumes_burst())
                    .map(|period| period.duration)
                    .collect();
                let planned: Vec<Ticks> = p.plan.iter().map(|(_, b)| b).collect();
                assert_eq!(served, planned, "process {}", p.pid);
            }
        }
    }
}

#[test]
fn identical_inputs_give_identical_reports() {
    common::setup_test();
    let a = serde_json::to_string(&run(3, 20, 7, 3, 11)).unwrap();
    let b = serde_json::to_string(&run(3, 20, 7, 3, 11)).unwrap();
    assert_eq!(a, b);
}

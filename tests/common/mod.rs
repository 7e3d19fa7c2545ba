#![allow(dead_code)]

use sched_model::{
    BurstSequence,
    Config,
    ProcessPlan,
    core::{History, Pid, Ticks},
};

/// Initialize tracing from `RUST_LOG`. Safe to call from every test; only the
/// first call installs a subscriber.
pub fn setup_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn config(cpus: usize, quantum: Ticks, switch_in: Ticks, switch_out: Ticks) -> Config {
    Config {
        cpu_count: cpus,
        process_count: 1,
        quantum,
        switch_in_delay: switch_in,
        switch_out_delay: switch_out,
        ..Config::default()
    }
}

pub fn plan(
    pid: Pid,
    priority: u8,
    arrival: Ticks,
    bursts: &[Ticks],
    cpu_first: bool,
) -> ProcessPlan {
    ProcessPlan::new(
        pid,
        priority,
        arrival,
        BurstSequence::new(bursts.iter().copied(), cpu_first),
    )
}

pub fn periods<S: Copy + Eq + std::hash::Hash>(history: &History<S>) -> Vec<(S, Ticks)> {
    history
        .periods()
        .iter()
        .map(|p| (p.state, p.duration))
        .collect()
}

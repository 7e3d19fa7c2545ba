use rand::prelude::*;

use crate::core::{BurstSequence, MAX_PRIORITY, Pid, ProcessPlan, Ticks};

pub const MAX_BURSTS: usize = 20;
pub const MAX_CPU_BURST: Ticks = 200;
pub const MAX_IO_BURST: Ticks = 500;
pub const ARRIVAL_MAX_PER_PROCESS: Ticks = 50;

/// Random workload of `count` processes with pids `0..count`.
///
/// Every process gets 1 to `MAX_BURSTS` alternating bursts starting with a
/// random kind, and arrives somewhere in `[1, count * ARRIVAL_MAX_PER_PROCESS]`.
pub fn random_plans(count: Pid, rng: &mut impl Rng) -> Vec<ProcessPlan> {
    let arrival_max = count as Ticks * ARRIVAL_MAX_PER_PROCESS;
    (0..count)
        .map(|pid| {
            let burst_count = rng.random_range(1..=MAX_BURSTS);
            let cpu_first = rng.random_bool(0.5);
            let bursts: Vec<Ticks> = (0..burst_count)
                .map(|i| {
                    let max = if cpu_first == (i % 2 == 0) {
                        MAX_CPU_BURST
                    } else {
                        MAX_IO_BURST
                    };
                    rng.random_range(1..=max)
                })
                .collect();
            let priority = rng.random_range(0..MAX_PRIORITY);
            let arrival = rng.random_range(1..=arrival_max);
            ProcessPlan::new(
                pid,
                priority,
                arrival,
                BurstSequence::new(bursts, cpu_first),
            )
        })
        .collect()
}

pub fn seeded_plans(count: Pid, seed: u64) -> Vec<ProcessPlan> {
    let mut rng = StdRng::seed_from_u64(seed);
    random_plans(count, &mut rng)
}

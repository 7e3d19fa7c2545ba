use rand::prelude::*;
use std::collections::BTreeMap;
use tracing::info;

use super::workload::random_plans;
use crate::core::{Config, Pid, ProcessPlan, SchedEvent, SimulationReport, System, Ticks};

/// Run `plans` under `config` to completion (or the tick limit).
pub fn simulate(config: Config, plans: Vec<ProcessPlan>) -> SimulationReport {
    simulate_with(config, plans, |_, _| {})
}

/// Like `simulate`, handing every scheduling event to `on_event`.
pub fn simulate_with(
    config: Config,
    plans: Vec<ProcessPlan>,
    mut on_event: impl FnMut(Ticks, &SchedEvent),
) -> SimulationReport {
    let mut system = System::new(config);
    for event in system.load(plans) {
        on_event(system.now(), &event);
    }
    let outcome = system.run_with(&mut on_event);
    info!(label = %config.label(), ?outcome, ticks = system.now(), "simulation finished");
    system.into_report()
}

/// Run every config, giving all configs with the same process count the same
/// random workload.
pub fn sweep(configs: &[Config], seed: u64) -> Vec<SimulationReport> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut workloads: BTreeMap<Pid, Vec<ProcessPlan>> = BTreeMap::new();

    configs
        .iter()
        .map(|config| {
            let plans = workloads
                .entry(config.process_count)
                .or_insert_with(|| random_plans(config.process_count, &mut rng))
                .clone();
            simulate(*config, plans)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_reuses_workload_per_process_count() {
        let base = Config {
            process_count: 6,
            ..Config::default()
        };
        let configs = base.cpu_range(4, 1);
        let reports = sweep(&configs, 3);
        assert_eq!(reports.len(), configs.len());

        let plans = |r: &SimulationReport| {
            let mut v: Vec<_> = r
                .processes
                .iter()
                .map(|p| (p.pid, p.arrival, p.plan.clone()))
                .collect();
            v.sort_by_key(|(pid, _, _)| *pid);
            v
        };
        for report in &reports[1..] {
            assert_eq!(plans(report), plans(&reports[0]));
        }
    }
}

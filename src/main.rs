use anyhow::{Context, Result, ensure};
use clap::Parser;
use sched_model::{
    Config,
    SimulationReport,
    sim::{seeded_plans, sweep},
    simulate_with,
};

/// Simulate round-robin or FCFS scheduling of a random workload.
#[derive(Parser)]
#[command(name = "sched_model")]
struct Cli {
    /// Number of simulated CPUs.
    #[arg(short, long, default_value_t = 4)]
    cpus: usize,

    /// Number of processes in the generated workload.
    #[arg(short, long, default_value_t = 10)]
    processes: u16,

    /// Round-robin quantum in ticks. 0 selects FCFS.
    #[arg(short, long, default_value_t = 100)]
    quantum: u64,

    /// Use FCFS regardless of --quantum.
    #[arg(long)]
    fcfs: bool,

    /// Ticks to switch a process onto a CPU.
    #[arg(long, default_value_t = 7)]
    switch_in: u64,

    /// Ticks to switch a process off a CPU.
    #[arg(long, default_value_t = 3)]
    switch_out: u64,

    /// Give up after this many ticks.
    #[arg(long, default_value_t = u32::MAX as u64)]
    max_ticks: u64,

    /// Workload seed.
    #[arg(long, env = "SCHED_MODEL_SEED", default_value_t = 0)]
    seed: u64,

    /// Run every CPU count from 1 to MAX_CPUS (log-spaced) on one workload
    /// and print a CSV summary per run.
    #[arg(long, value_name = "MAX_CPUS")]
    sweep: Option<usize>,

    /// Print every scheduling event as it happens.
    #[arg(long, conflicts_with = "sweep")]
    events: bool,

    /// Print reports as JSON instead of text.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        ensure!(self.cpus > 0, "at least one CPU is required");
        ensure!(self.processes > 0, "at least one process is required");
        Ok(Config {
            cpu_count: self.cpus,
            process_count: self.processes,
            quantum: if self.fcfs { 0 } else { self.quantum },
            switch_in_delay: self.switch_in,
            switch_out_delay: self.switch_out,
            max_ticks: self.max_ticks,
        })
    }
}

fn print_json(reports: &[SimulationReport]) -> Result<()> {
    let out = serde_json::to_string_pretty(reports)
        .context("serializing reports")?;
    println!("{out}");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;

    if let Some(max_cpus) = cli.sweep {
        ensure!(max_cpus > 0, "--sweep needs at least one CPU");
        let reports = sweep(&config.cpu_range(max_cpus, 1), cli.seed);
        if cli.json {
            return print_json(&reports);
        }
        println!("{}", SimulationReport::csv_header());
        for report in &reports {
            println!("{}", report.csv_row());
        }
        return Ok(());
    }

    let plans = seeded_plans(config.process_count, cli.seed);
    let report = simulate_with(config, plans, |now, event| {
        if cli.events {
            println!("t={now} {event:?}");
        }
    });

    if cli.json {
        print_json(std::slice::from_ref(&report))
    } else {
        println!("{}", report.summary());
        Ok(())
    }
}

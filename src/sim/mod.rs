pub mod driver;
pub mod stats;
pub mod workload;

pub use driver::{simulate, simulate_with, sweep};
pub use stats::Summary;
pub use workload::{random_plans, seeded_plans};

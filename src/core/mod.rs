mod countup;
mod engine;
mod types;

pub use countup::{
    CountUp, CountUpHandle, CountUpSpec, NumberFormat, Phase, format_number, spawn_count_up,
};
pub use engine::{monthly_rate_from_annual, run_projection};
pub use types::{ProjectionInput, ProjectionResult};

/// Assumptions driving one projection run. Rates are fractions, not
/// percents; conversion from user-facing percent values happens at the
/// API boundary.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionInput {
    pub transactions_per_month: u32,
    /// Currency granularity transactions are rounded up to. The average
    /// simulated round-up is modeled as half of this value.
    pub round_up_nearest: f64,
    pub horizon_months: u32,
    pub annual_growth_rate: f64,
}

#[derive(Debug, Clone)]
pub struct ProjectionResult {
    /// Month indices 1..=horizon_months.
    pub months: Vec<u32>,
    /// End-of-month balances, rounded to the nearest currency unit.
    pub balances: Vec<f64>,
    pub monthly_contribution: f64,
    pub total_contributed: f64,
    /// Final balance; 0 for an empty horizon.
    pub projected_value: f64,
    pub round_up_events: u64,
}

impl ProjectionResult {
    /// Relative growth over total contributions, e.g. 0.08 for +8%.
    /// None when nothing was contributed, so callers never divide by zero.
    pub fn growth_ratio(&self) -> Option<f64> {
        if self.total_contributed > 0.0 {
            Some(self.projected_value / self.total_contributed - 1.0)
        } else {
            None
        }
    }
}

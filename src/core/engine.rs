use super::types::{ProjectionInput, ProjectionResult};

/// Equivalent monthly compounding rate for a nominal annual rate, via
/// (1 + annual)^(1/12) - 1 rather than a naive division by 12.
pub fn monthly_rate_from_annual(annual_rate: f64) -> f64 {
    (1.0 + annual_rate).powf(1.0 / 12.0) - 1.0
}

/// Projects a compounding balance fed by simulated round-up
/// contributions.
///
/// The average round-up per transaction is modeled as half the round-up
/// granularity, i.e. round-ups are assumed uniform between zero and the
/// granularity. The monthly contribution derived from it is constant
/// across the horizon. Each month the contribution lands first, then the
/// whole balance grows by one month of compounding; the recorded balance
/// is rounded to the nearest currency unit.
pub fn run_projection(inputs: &ProjectionInput) -> ProjectionResult {
    let average_round_up = inputs.round_up_nearest / 2.0;
    let monthly_contribution = average_round_up * f64::from(inputs.transactions_per_month);
    let monthly_rate = monthly_rate_from_annual(inputs.annual_growth_rate);

    let horizon = inputs.horizon_months as usize;
    let mut months = Vec::with_capacity(horizon);
    let mut balances = Vec::with_capacity(horizon);
    let mut balance = 0.0;
    for month in 1..=inputs.horizon_months {
        balance += monthly_contribution;
        balance *= 1.0 + monthly_rate;
        months.push(month);
        balances.push(balance.round());
    }

    ProjectionResult {
        projected_value: balances.last().copied().unwrap_or(0.0),
        months,
        balances,
        monthly_contribution,
        total_contributed: monthly_contribution * f64::from(inputs.horizon_months),
        round_up_events: u64::from(inputs.transactions_per_month)
            * u64::from(inputs.horizon_months),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_inputs() -> ProjectionInput {
        ProjectionInput {
            transactions_per_month: 30,
            round_up_nearest: 10.0,
            horizon_months: 12,
            annual_growth_rate: 0.15,
        }
    }

    #[test]
    fn monthly_rate_compounds_back_to_annual() {
        let monthly = monthly_rate_from_annual(0.15);
        assert_approx((1.0 + monthly).powi(12), 1.15);
    }

    #[test]
    fn monthly_rate_is_below_naive_division() {
        assert!(monthly_rate_from_annual(0.15) < 0.15 / 12.0);
    }

    #[test]
    fn zero_rate_yields_zero_monthly_rate() {
        assert_approx(monthly_rate_from_annual(0.0), 0.0);
    }

    #[test]
    fn worked_example_matches_hand_calculation() {
        let result = run_projection(&sample_inputs());

        assert_approx(result.monthly_contribution, 150.0);
        assert_approx(result.total_contributed, 1_800.0);
        assert_eq!(result.round_up_events, 360);
        assert_eq!(result.months, (1..=12).collect::<Vec<_>>());
        assert_eq!(result.balances.len(), 12);

        // 150 * (1.15)^(1/12) ~ 151.76, recorded rounded.
        assert_approx(result.balances[0], 152.0);

        // Compounding on a gradually built balance beats the deposits but
        // stays under a flat 15% uplift on the whole year's contributions.
        assert!(result.projected_value > 1_800.0);
        assert!(result.projected_value < 2_070.0);
        assert_approx(result.projected_value, *result.balances.last().unwrap());
    }

    #[test]
    fn zero_growth_is_pure_accumulation() {
        let inputs = ProjectionInput {
            annual_growth_rate: 0.0,
            ..sample_inputs()
        };
        let result = run_projection(&inputs);

        for (k, balance) in result.balances.iter().enumerate() {
            assert_approx(*balance, (k as f64 + 1.0) * 150.0);
        }
        assert_approx(result.projected_value, result.total_contributed);
        assert_approx(result.growth_ratio().expect("contributions present"), 0.0);
    }

    #[test]
    fn empty_horizon_yields_empty_series_without_error() {
        let inputs = ProjectionInput {
            horizon_months: 0,
            ..sample_inputs()
        };
        let result = run_projection(&inputs);

        assert!(result.months.is_empty());
        assert!(result.balances.is_empty());
        assert_approx(result.total_contributed, 0.0);
        assert_approx(result.projected_value, 0.0);
        assert_eq!(result.round_up_events, 0);
        assert!(result.growth_ratio().is_none());
    }

    #[test]
    fn zero_transactions_yield_zero_balances_and_no_growth_ratio() {
        let inputs = ProjectionInput {
            transactions_per_month: 0,
            ..sample_inputs()
        };
        let result = run_projection(&inputs);

        assert_eq!(result.balances.len(), 12);
        assert!(result.balances.iter().all(|b| *b == 0.0));
        assert_eq!(result.round_up_events, 0);
        assert!(result.growth_ratio().is_none());
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]
        #[test]
        fn balances_are_non_decreasing_under_non_negative_growth(
            transactions_per_month in 0u32..=500,
            round_up_nearest in 1.0f64..=100.0,
            horizon_months in 0u32..=120,
            annual_growth_rate in 0.0f64..=0.5,
        ) {
            let result = run_projection(&ProjectionInput {
                transactions_per_month,
                round_up_nearest,
                horizon_months,
                annual_growth_rate,
            });

            prop_assert!(
                result.balances.windows(2).all(|w| w[1] >= w[0]),
                "balances must not shrink: {:?}",
                result.balances
            );
        }

        #[test]
        fn round_up_events_are_the_exact_product(
            transactions_per_month in 0u32..=1_000,
            horizon_months in 0u32..=1_200,
        ) {
            let result = run_projection(&ProjectionInput {
                transactions_per_month,
                round_up_nearest: 10.0,
                horizon_months,
                annual_growth_rate: 0.1,
            });

            prop_assert_eq!(
                result.round_up_events,
                u64::from(transactions_per_month) * u64::from(horizon_months)
            );
        }

        #[test]
        fn series_length_matches_horizon(
            horizon_months in 0u32..=240,
        ) {
            let result = run_projection(&ProjectionInput {
                transactions_per_month: 20,
                round_up_nearest: 10.0,
                horizon_months,
                annual_growth_rate: 0.12,
            });

            prop_assert_eq!(result.months.len(), horizon_months as usize);
            prop_assert_eq!(result.balances.len(), horizon_months as usize);
            prop_assert_eq!(result.months.last().copied(), (horizon_months > 0).then_some(horizon_months));
        }
    }
}

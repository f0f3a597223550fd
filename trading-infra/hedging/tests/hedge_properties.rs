//! Behavioural properties of the hedge optimizer
//!
//! Checks the limits the market maker relies on: extreme risk aversion
//! liquidates immediately, zero risk aversion only minimises expected cost,
//! and the immediate fraction grows with risk aversion.

use approx::assert_relative_eq;
use hedging::{
    AlmgrenChrissSolver, HedgeOptimizer, HedgeProblem, ScheduleSolver, ScheduleStatus,
    UniformSchedule, VarObjective,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Reference-curve-like per-unit cost: half spread growing with size
fn curve_cost(volume: f64) -> f64 {
    7.5e-5 * (1.0 + volume / 400.0)
}

#[test]
fn test_extreme_risk_aversion_liquidates_now() {
    let _ = env_logger::builder().is_test(true).try_init();

    let problem = HedgeProblem::new(120.0, 20, 1e6, 6.4e-4);
    let schedule = HedgeOptimizer::default().optimize(&problem, &|_| 1e-4);

    assert!(!schedule.is_fallback());
    assert_relative_eq!(schedule.immediate_fraction(), 1.0, epsilon = 1e-6);
}

#[test]
fn test_zero_risk_aversion_linear_cost_is_uniform() {
    let problem = HedgeProblem::new(120.0, 20, 0.0, 6.4e-4);
    let schedule = HedgeOptimizer::default().optimize(&problem, &|_| 1e-4);

    assert!(!schedule.is_fallback());
    assert_relative_eq!(schedule.immediate_fraction(), 1.0 / 20.0, epsilon = 1e-3);
}

#[test]
fn test_zero_risk_aversion_ignores_volatility() {
    let calm = HedgeProblem::new(300.0, 8, 0.0, 1e-4);
    let wild = HedgeProblem::new(300.0, 8, 0.0, 1e-1);
    let optimizer = HedgeOptimizer::default();

    let a = optimizer.optimize(&calm, &curve_cost);
    let b = optimizer.optimize(&wild, &curve_cost);
    for (x, y) in a.fractions.iter().zip(&b.fractions) {
        assert_relative_eq!(*x, *y, epsilon = 1e-9);
    }
}

#[test]
fn test_immediate_fraction_monotone_in_risk_aversion() {
    let optimizer = HedgeOptimizer::default();
    let gammas = [0.0, 0.01, 0.05, 0.25, 1.0, 100.0];

    let fractions: Vec<f64> = gammas
        .iter()
        .map(|gamma| {
            let problem = HedgeProblem::new(300.0, 10, *gamma, 1e-3);
            let schedule = optimizer.optimize(&problem, &curve_cost);
            assert!(!schedule.is_fallback(), "fallback at gamma={}", gamma);
            schedule.immediate_fraction()
        })
        .collect();

    for pair in fractions.windows(2) {
        assert!(
            pair[1] >= pair[0] - 1e-3,
            "x0 decreased with risk aversion: {:?}",
            fractions
        );
    }
    assert!(fractions[fractions.len() - 1] > 0.99);
}

#[test]
fn test_random_problems_never_worse_than_uniform() {
    let mut rng = StdRng::seed_from_u64(42);
    let optimizer = HedgeOptimizer::default();

    for _ in 0..30 {
        let problem = HedgeProblem::new(
            rng.gen_range(1.0..2_000.0),
            rng.gen_range(2..=20),
            rng.gen_range(0.0..2.0),
            rng.gen_range(1e-5..5e-3),
        );
        let scale = rng.gen_range(50.0..5_000.0);
        let cost = move |v: f64| 1e-4 * (1.0 + v / scale);

        let schedule = optimizer.optimize(&problem, &cost);
        let uniform = UniformSchedule.solve(&problem, &cost).unwrap();

        assert_relative_eq!(schedule.fractions.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        assert!(schedule.fractions.iter().all(|x| *x >= -1e-12));
        assert!(schedule.objective <= uniform.objective * (1.0 + 1e-9));
    }
}

#[test]
fn test_closed_form_is_a_drop_in_solver() {
    let problem = HedgeProblem::new(300.0, 10, 0.5, 1e-3);
    let closed = HedgeOptimizer::new(Box::new(AlmgrenChrissSolver::new())).optimize(&problem, &curve_cost);
    let numeric = HedgeOptimizer::default().optimize(&problem, &curve_cost);

    assert_eq!(closed.status, ScheduleStatus::ClosedForm);
    assert_eq!(numeric.status, ScheduleStatus::Optimized);

    // The numerical solver optimises the exact objective, so it can only do better
    let objective = VarObjective::new(&problem, &curve_cost);
    assert!(objective.value(&numeric.fractions) <= objective.value(&closed.fractions) * (1.0 + 1e-9));
}

//! Inventory Hedge Scheduling
//!
//! Splits an inventory position into a liquidation schedule over a finite
//! horizon, trading off execution cost against exposure risk.
//!
//! # Objective
//!
//! For fractions `x_k` (summing to one) of the inventory `|z|`:
//!
//! - `E[C] = Σ |x_k| · c(|z| · |x_k|)` where `c` is the per-unit cost curve
//! - `Var[C] = σ² · Σ y_k²` with `y_k = 1 - Σ_{j≤k} x_j` the remaining fraction
//! - minimise `E[C] + γ · √Var[C]`
//!
//! # Solvers
//!
//! - [`ProjectedGradientSolver`](application::solvers::ProjectedGradientSolver): bounded black-box minimisation over the simplex
//! - [`AlmgrenChrissSolver`](application::solvers::AlmgrenChrissSolver): closed-form sinh trajectory for locally linear cost
//! - [`UniformSchedule`](application::solvers::UniformSchedule): `x_k = 1/N`, the fallback
//!
//! # Example
//!
//! ```rust
//! use hedging::{HedgeOptimizer, HedgeProblem};
//!
//! let problem = HedgeProblem::new(250.0, 20, 0.5, 6.4e-4);
//! let cost = |volume: f64| 7.5e-5 * (1.0 + volume / 10_000.0);
//!
//! let schedule = HedgeOptimizer::default().optimize(&problem, &cost);
//! let hedge_now = schedule.immediate_fraction() * problem.inventory;
//! assert!(hedge_now > 0.0);
//! ```
//!
//! Only the first slice is meant to be executed; the caller re-solves from
//! scratch at the next decision point (rolling horizon).

pub mod application;
pub mod domain;
pub mod error;

pub use application::optimizer::HedgeOptimizer;
pub use application::solvers::{
    AlmgrenChrissSolver, ProjectedGradientConfig, ProjectedGradientSolver, ScheduleSolver,
    UniformSchedule,
};
pub use domain::{HedgeProblem, HedgeSchedule, ScheduleStatus, VarObjective};
pub use error::{Result, SolveError};

//! Schedule Solvers
//!
//! - Projected gradient: numerical minimisation over the simplex (default)
//! - Almgren-Chriss: closed-form sinh trajectory
//! - Uniform: equal slices

mod almgren_chriss;
mod projected_gradient;
mod protocol;
mod simplex;
mod uniform;

pub use almgren_chriss::AlmgrenChrissSolver;
pub use projected_gradient::{ProjectedGradientConfig, ProjectedGradientSolver};
pub use protocol::ScheduleSolver;
pub use simplex::project_onto_simplex;
pub use uniform::UniformSchedule;

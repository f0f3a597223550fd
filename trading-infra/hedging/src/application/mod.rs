//! Hedging Application Layer
//!
//! Solver implementations and the fallback-aware optimizer facade.

pub mod optimizer;
pub mod solvers;

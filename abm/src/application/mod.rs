//! Application layer: Use cases and orchestration
//!
//! Contains:
//! - **agents**: Investors and market makers
//! - **simulation**: SimulationEngine that coordinates them, plus replications
//! - **analysis**: Market share, internalization and reward series

pub mod agents;
pub mod analysis;
pub mod simulation;

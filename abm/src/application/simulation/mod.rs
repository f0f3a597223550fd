//! Simulation Framework
//!
//! - [`SimulationEngine`]: step-wise orchestrator (`initialize`, `step`, `run`, `finish`)
//! - [`SimulationConfig`]: run configuration, loadable from JSON
//! - [`SimulationLog`]: serialisable per-step output
//! - [`replications`]: parallel Monte-Carlo runs

mod config;
mod engine;
mod step_log;
pub mod replications;

pub use config::{SimulationConfig, TieBreak};
pub use engine::SimulationEngine;
pub use step_log::{
    MarketMakerSnapshot, PendingDisposition, SimulationLog, StepRecord, UnmaturedRevenue,
};
pub use replications::{replication_seeds, run_replications, run_replications_with, run_single};

//! Monte-Carlo replications
//!
//! Independent runs of the same config under different seeds, executed in
//! parallel. Runs share nothing; results come back in seed order.

use super::{SimulationConfig, SimulationEngine, SimulationLog};
use crate::error::Result;
use crate::infrastructure::{RandomStreams, StreamRole};
use rayon::prelude::*;

/// `count` well-separated seeds derived from `base`
pub fn replication_seeds(base: u64, count: usize) -> Vec<u64> {
    let streams = RandomStreams::new(base);
    (0..count as u64)
        .map(|i| streams.derive_seed(StreamRole::Replication, i))
        .collect()
}

/// Run one complete simulation
pub fn run_single(config: &SimulationConfig, seed: u64) -> Result<SimulationLog> {
    let mut engine = SimulationEngine::initialize(config.clone(), seed)?;
    engine.run_to_completion()?;
    Ok(engine.finish())
}

/// Run every seed to completion in parallel
pub fn run_replications(config: &SimulationConfig, seeds: &[u64]) -> Result<Vec<SimulationLog>> {
    run_replications_with(config, seeds, |log| log)
}

/// Run every seed and reduce each log with `summarize` on the worker thread
pub fn run_replications_with<T, F>(config: &SimulationConfig, seeds: &[u64], summarize: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(SimulationLog) -> T + Sync + Send,
{
    seeds
        .par_iter()
        .map(|&seed| run_single(config, seed).map(&summarize))
        .collect()
}

//! Multi-chain execution
//!
//! Chains are independent single-chain runs: each owns its configuration, random stream
//! and chain state, and nothing is shared between them but the read-only objective.
//! Results are merged afterwards by [`best_of`], a pure reduction.

use std::cmp::Reverse;

use indicatif::MultiProgress;
use log::info;
use ordered_float::OrderedFloat;
use rayon::prelude::*;

use crate::objective::Objective;

use super::{
    error::McemError,
    optimizer::{progress_bar, Mcem},
    result::McemResult,
};

impl Mcem {
    /// Runs `chains` independent chains in parallel.
    ///
    /// Chain `i` uses seed `seed + i` and `i + 1` times the iteration and sample budget
    /// (see [`McemConfig::for_chain`](super::McemConfig::for_chain)).
    ///
    /// # Arguments
    ///
    /// * `objective` - Cost function shared read-only by all chains
    /// * `initial_guess` - Starting mean of every chain
    /// * `chains` - Number of chains, at least 1
    ///
    /// # Returns
    ///
    /// * `Result<Vec<McemResult>, McemError>` - One result per chain, in chain order
    pub fn run_chains<O: Objective>(
        &self,
        objective: &O,
        initial_guess: &[f64],
        chains: usize,
    ) -> Result<Vec<McemResult>, McemError> {
        if chains == 0 {
            return Err(McemError::NoChains);
        }

        let available = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(chains.min(available))
            .build()
            .map_err(|e| McemError::ThreadPoolError(e.to_string()))?;

        info!("Running {chains} MCEM chains on {} threads", thread_pool.current_num_threads());

        let runners = (0..chains)
            .map(|index| Mcem::new(self.config().for_chain(index)))
            .collect::<Vec<_>>();

        let multi_progress = MultiProgress::new();
        let progress_bars = runners
            .iter()
            .enumerate()
            .map(|(index, runner)| {
                runner.config().show_progress.then(|| {
                    multi_progress.add(progress_bar(
                        runner.config().max_iters as u64,
                        &format!("Chain {index:02}"),
                    ))
                })
            })
            .collect::<Vec<_>>();

        thread_pool.install(|| {
            runners
                .into_par_iter()
                .zip(progress_bars)
                .map(|(runner, progress)| runner.run_with_progress(objective, initial_guess, progress))
                .collect()
        })
    }
}

/// Picks the result with the lowest best cost.
///
/// Ties go to the later result. Returns `None` for an empty input.
pub fn best_of(results: Vec<McemResult>) -> Option<McemResult> {
    results
        .into_iter()
        .enumerate()
        .min_by_key(|(index, result)| (OrderedFloat(result.best_cost), Reverse(*index)))
        .map(|(_, result)| result)
}

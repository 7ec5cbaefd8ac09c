//! Single-chain MCEM loop
//!
//! Each iteration draws `inner_samples` candidates from the proposal, runs a Metropolis
//! chain over them and records the held vector after every step. The pool's mean and
//! population standard deviation become the next proposal (E-step). The run ends when
//! two consecutive means are within `threshold` in L1 distance, or after `max_iters`.
//!
//! The pseudo-random stream is seeded once per run, so identical inputs produce
//! bit-identical results.

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::objective::Objective;

use super::{
    config::McemConfig, error::McemError, proposal::Proposal, proposal::SPREAD_FLOOR,
    result::McemResult,
};

/// Initial proposal spread relative to |mean|
const INITIAL_RELATIVE_SPREAD: f64 = 0.2;

/// Monte-Carlo Expectation-Maximization optimizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mcem {
    config: McemConfig,
}

impl Mcem {
    pub fn new(config: McemConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &McemConfig {
        &self.config
    }

    /// Runs one chain from `initial_guess`.
    ///
    /// # Arguments
    ///
    /// * `objective` - Cost function over the free parameters
    /// * `initial_guess` - Starting proposal mean, in the objective's parameter order
    ///
    /// # Returns
    ///
    /// * `Result<McemResult, McemError>` - The run result
    ///
    /// # Errors
    ///
    /// Returns an error only for precondition violations: an empty or mismatched guess,
    /// non-positive guesses under positive-only sampling, or an invalid configuration.
    /// If the sample pool overflows during the run, the loop stops early and the best
    /// estimate found so far is returned.
    pub fn run<O: Objective>(
        &self,
        objective: &O,
        initial_guess: &[f64],
    ) -> Result<McemResult, McemError> {
        self.run_with_progress(objective, initial_guess, None)
    }

    pub(crate) fn run_with_progress<O: Objective>(
        &self,
        objective: &O,
        initial_guess: &[f64],
        progress: Option<ProgressBar>,
    ) -> Result<McemResult, McemError> {
        let config = &self.config;
        config.validate()?;
        self.check_guess(objective, initial_guess)?;

        if config.threshold > 0.0 && config.threshold < 1e-12 * l1_norm(initial_guess) {
            warn!(
                "Convergence threshold {:e} is far below the parameter scale; the run will likely use all {} iterations",
                config.threshold, config.max_iters
            );
        }

        info!(
            "Starting MCEM: {} parameters, {} iterations x {} samples, seed {}",
            initial_guess.len(),
            config.max_iters,
            config.inner_samples,
            config.seed
        );

        let progress = progress.or_else(|| {
            config
                .show_progress
                .then(|| progress_bar(config.max_iters as u64, "MCEM"))
        });

        let mut rng = StdRng::seed_from_u64(config.seed);

        let mut mean = initial_guess.to_vec();
        let mut spread = mean
            .iter()
            .map(|m| INITIAL_RELATIVE_SPREAD * m.abs())
            .collect::<Vec<_>>();

        let mut best_parameters = initial_guess.to_vec();
        let mut best_cost = f64::INFINITY;
        let mut previous_mean: Option<Vec<f64>> = None;
        let mut cost_history = Vec::with_capacity(config.max_iters);
        let mut converged = false;
        let mut iterations = 0;

        for iteration in 0..config.max_iters {
            let proposal = match Proposal::new(
                &mean,
                &spread,
                config.positive_only,
                config.min_relative_spread,
            ) {
                Ok(proposal) => proposal,
                Err(e) if iteration == 0 => return Err(e),
                Err(e) => {
                    warn!("Stopping after {iterations} iterations: {e}");
                    break;
                }
            };

            let pool = self.sample_pool(objective, &proposal, &mut rng);
            let (next_mean, next_spread) = pool_moments(&pool, mean.len());
            if !all_finite(&next_mean) || !all_finite(&next_spread) {
                warn!(
                    "Iteration {}: sample pool overflowed, stopping with the best estimate so far",
                    iteration + 1
                );
                break;
            }
            (mean, spread) = (next_mean, next_spread);
            iterations = iteration + 1;

            if let Some(previous) = &previous_mean {
                let distance = l1_distance(previous, &mean);
                if distance <= config.threshold {
                    info!("MCEM converged after {iterations} iterations (L1 step {distance:e})");
                    best_parameters = mean.clone();
                    converged = true;
                    cost_history.push(best_cost);
                    break;
                }
            }

            let cost = objective.cost(&mean);
            if cost < best_cost {
                best_cost = cost;
                best_parameters = mean.clone();
            }
            cost_history.push(best_cost);

            debug!("Iteration {iterations}: mean cost {cost:e}, best cost {best_cost:e}");

            if let Some(pb) = &progress {
                pb.set_position(iterations as u64);
                pb.set_message(format!("best cost {best_cost:.3e}"));
            }

            previous_mean = Some(mean.clone());
        }

        if let Some(pb) = &progress {
            pb.finish_with_message(format!("best cost {best_cost:.3e}"));
        }

        info!("MCEM finished: {iterations} iterations, best cost {best_cost:e}, converged {converged}");

        Ok(McemResult {
            best_parameters,
            best_cost,
            spread,
            iterations,
            converged,
            cost_history,
            seed: config.seed,
        })
    }

    /// Metropolis chain over `inner_samples` proposals; returns the held vector of
    /// every step, rejected steps repeating the previous one.
    fn sample_pool<O: Objective, R: Rng>(
        &self,
        objective: &O,
        proposal: &Proposal,
        rng: &mut R,
    ) -> Vec<Vec<f64>> {
        let mut pool = Vec::with_capacity(self.config.inner_samples);
        let mut held: Vec<f64> = Vec::new();
        let mut held_loglik = f64::NEG_INFINITY;

        for sample in 0..self.config.inner_samples {
            let candidate = proposal.sample(rng);
            let loglik = objective.log_likelihood(&candidate);

            let accept = sample == 0 || {
                // Undefined ratios (both likelihoods -inf) reject
                let delta = loglik - held_loglik;
                let ratio = if delta.is_nan() { 0.0 } else { delta.min(0.0).exp() };
                ratio > rng.gen::<f64>()
            };

            if accept {
                held = candidate;
                held_loglik = loglik;
            }

            pool.push(held.clone());
        }

        pool
    }

    fn check_guess<O: Objective>(&self, objective: &O, guess: &[f64]) -> Result<(), McemError> {
        if guess.is_empty() {
            return Err(McemError::EmptyGuess);
        }

        if guess.len() != objective.dimension() {
            return Err(McemError::GuessLengthMismatch {
                expected: objective.dimension(),
                found: guess.len(),
            });
        }

        for (index, value) in guess.iter().copied().enumerate() {
            if !value.is_finite() {
                return Err(McemError::NonFiniteGuess(index));
            }
            if self.config.positive_only && value <= 0.0 {
                return Err(McemError::NonPositiveGuess { index, value });
            }
        }

        Ok(())
    }
}

/// Elementwise mean and population standard deviation of the pool.
fn pool_moments(pool: &[Vec<f64>], dimension: usize) -> (Vec<f64>, Vec<f64>) {
    let n = pool.len() as f64;

    let mean = (0..dimension)
        .map(|j| pool.iter().map(|x| x[j]).sum::<f64>() / n)
        .collect::<Vec<_>>();

    let spread = (0..dimension)
        .map(|j| {
            let var = pool.iter().map(|x| (x[j] - mean[j]).powi(2)).sum::<f64>() / n;
            var.sqrt().max(SPREAD_FLOOR)
        })
        .collect();

    (mean, spread)
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

fn l1_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
}

fn l1_norm(a: &[f64]) -> f64 {
    a.iter().map(|x| x.abs()).sum()
}

pub(crate) fn progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template(&format!(
            "{label}: {{spinner:.green}} [{{bar:40.cyan/blue}}] {{pos}}/{{len}} | {{elapsed}}/{{eta}} | {{msg}}"
        ))
        .map(|s| s.progress_chars("█▉▊▋▌▍▎▏ "))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

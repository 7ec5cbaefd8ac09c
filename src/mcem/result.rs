use serde::{Deserialize, Serialize};

/// Outcome of one MCEM run.
///
/// `best_parameters` is always defined: it starts as the initial guess and is replaced
/// only by a mean with lower cost, or by the final mean on convergence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McemResult {
    /// Best parameter vector, in the objective's free-parameter order
    pub best_parameters: Vec<f64>,
    /// Lowest cost evaluated at an iteration mean, `+inf` if none was finite
    pub best_cost: f64,
    /// Standard deviation of the last acceptance pool per parameter
    pub spread: Vec<f64>,
    /// Number of completed EM iterations
    pub iterations: usize,
    /// Whether consecutive means came within the threshold
    pub converged: bool,
    /// Best cost after each iteration
    pub cost_history: Vec<f64>,
    /// Seed of the pseudo-random stream
    pub seed: u64,
}

impl McemResult {
    /// Whether any iteration mean was evaluated with a finite cost.
    ///
    /// `false` means the returned parameters are the untouched initial guess.
    pub fn improved(&self) -> bool {
        self.best_cost.is_finite()
    }
}

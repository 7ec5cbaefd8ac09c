use thiserror::Error;

/// Precondition violations detected before an MCEM run starts sampling.
///
/// Once sampling has begun the optimizer always returns a result; failed simulations are
/// penalized inside the objective and an overflowing sample pool ends the run early with
/// the best estimate so far.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum McemError {
    #[error("Initial guess is empty")]
    EmptyGuess,

    #[error("Initial guess has {found} values, objective expects {expected}")]
    GuessLengthMismatch { expected: usize, found: usize },

    /// A log-normal proposal needs strictly positive, finite means
    #[error("Initial guess value {value} at position {index} must be finite and positive for positive-only sampling")]
    NonPositiveGuess { index: usize, value: f64 },

    #[error("Initial guess value at position {0} is not finite")]
    NonFiniteGuess(usize),

    #[error("max_iters must be at least 1")]
    ZeroIterations,

    #[error("inner_samples must be at least 1")]
    ZeroSamples,

    #[error("At least one chain is required")]
    NoChains,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown mode preset '{0}' (expected fast, balanced, precise or test)")]
    UnknownPreset(String),

    #[error("Invalid proposal distribution for parameter {index}: {message}")]
    InvalidProposal { index: usize, message: String },

    #[error("Failed to initialize thread pool: {0}")]
    ThreadPoolError(String),
}

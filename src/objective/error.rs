use thiserror::Error;

use crate::{parameters::ParameterError, simulation::IntegrationError};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ObservationError {
    #[error("Observation has no time points")]
    EmptyTimeGrid,
    #[error("Time point {index} ({value}) must be finite, non-negative and not before its predecessor")]
    InvalidTime { index: usize, value: f64 },
    #[error("Observation has no observed metabolites")]
    NoObservables,
    /// Error indicating the value matrix does not match observables × time points
    #[error("Observed values have shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("Observed metabolite index {0} appears more than once")]
    DuplicateObservable(usize),
    #[error("Observed value at metabolite row {row}, time column {col} is not finite")]
    NonFiniteValue { row: usize, col: usize },
    #[error("Observable index {index} is out of range for a system with {dimension} metabolites")]
    ObservableOutOfRange { index: usize, dimension: usize },
    #[error("Unknown metabolite '{name}' for pathway '{pathway}'")]
    UnknownMetabolite { name: String, pathway: String },
    #[error("Observation rows are ragged")]
    RaggedValues,
    #[error(transparent)]
    ParameterError(#[from] ParameterError),
}

/// Failure to turn a candidate vector into a simulated trajectory.
///
/// Only [`TrajectoryEvaluator::simulate`](super::evaluator::TrajectoryEvaluator::simulate)
/// surfaces these; the residual path replaces them with the penalty vector.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error(transparent)]
    ParameterError(#[from] ParameterError),
    #[error(transparent)]
    IntegrationError(#[from] IntegrationError),
}

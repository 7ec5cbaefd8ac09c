use thiserror::Error;

/// Errors raised while building parameter sets and free/fixed partitions.
///
/// All variants describe configuration mistakes and are detected before any
/// simulation or sampling happens.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Unknown parameter {0}")]
    UnknownParameter(String),
    #[error("Missing values for parameters: {missing:?}")]
    MissingParameters { missing: Vec<String> },
    #[error("Parameter {param} has invalid value {value}: values must be finite and non-negative")]
    InvalidValue { param: String, value: f64 },
    #[error("Parameters appear in both the free and the fixed partition: {overlap:?}")]
    OverlappingPartitions { overlap: Vec<String> },
    #[error("Free parameters listed more than once: {duplicates:?}")]
    DuplicateFreeParameters { duplicates: Vec<String> },
    #[error("No free parameters given")]
    NoFreeParameters,
    #[error("Candidate vector has wrong length: expected {expected}, found {found}")]
    CandidateLengthError { expected: usize, found: usize },
}

//! Integration Error Module
//!
//! The [`IntegrationError`] enum covers every way an integrator can fail to produce a
//! trajectory on the requested time grid:
//! - Invalid time grids or state dimensions
//! - Step-size collapse and step budget exhaustion
//! - Singular iteration matrices in implicit steps
//! - Non-finite states and right-hand-side failures
//!
//! The trajectory evaluator never propagates these errors. It replaces the residuals of a
//! failed integration with a fixed penalty, so the variants mostly serve logging and tests.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntegrationError {
    #[error("Time grid is empty")]
    EmptyTimeGrid,
    #[error("Time grid must be finite, non-negative and non-decreasing (offending value {0})")]
    InvalidTimeGrid(f64),
    #[error("Initial state has length {found}, system expects {expected}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("Step size {h:e} fell below the minimum at t = {t}")]
    StepSizeUnderflow { t: f64, h: f64 },
    #[error("Exceeded the maximum of {0} steps")]
    MaxStepsExceeded(usize),
    #[error("Iteration matrix is singular at t = {0}")]
    SingularMatrix(f64),
    #[error("State became non-finite at t = {0}")]
    NonFiniteState(f64),
    #[error("Error evaluating the right-hand side: {0}")]
    RhsError(String),
    #[error("Solver error: {0}")]
    SolverError(String),
}

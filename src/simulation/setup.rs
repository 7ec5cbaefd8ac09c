//! Setup module for configuring the stiff integrator.
//!
//! This module provides the [`SolverSetup`] struct and its builder for configuring the
//! adaptive step-size control of [`StiffSolver`](super::stiff::StiffSolver):
//!
//! - Error tolerance settings (relative and absolute)
//! - Initial and minimum step size
//! - Step budget per integration
//!
//! The output time grid is not part of the setup; it is passed to every
//! [`Integrator::integrate`](super::integrator::Integrator::integrate) call.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration for adaptive integration
///
/// # Fields
///
/// * `rtol` - Relative tolerance for error control (default: 1e-6)
/// * `atol` - Absolute tolerance for error control (default: 1e-8)
/// * `h0` - Initial step size, `0.0` picks one from the time span (default: 0.0)
/// * `h_min` - Smallest step before the integration is abandoned (default: 1e-12)
/// * `max_steps` - Maximum number of attempted steps (default: 100000)
///
/// # Examples
///
/// ```
/// use metabolic_mcem::prelude::SolverSetupBuilder;
///
/// let setup = SolverSetupBuilder::default()
///     .rtol(1e-8)
///     .atol(1e-10)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSetup {
    #[builder(default = "1e-6")]
    pub rtol: f64,
    #[builder(default = "1e-8")]
    pub atol: f64,
    #[builder(default = "0.0")]
    pub h0: f64,
    #[builder(default = "1e-12")]
    pub h_min: f64,
    #[builder(default = "100_000")]
    pub max_steps: usize,
}

impl Default for SolverSetup {
    fn default() -> Self {
        Self {
            rtol: 1e-6,
            atol: 1e-8,
            h0: 0.0,
            h_min: 1e-12,
            max_steps: 100_000,
        }
    }
}

impl SolverSetup {
    /// Initial step for an integration spanning `span` time units.
    pub fn initial_step(&self, span: f64) -> f64 {
        if self.h0 > 0.0 {
            self.h0
        } else {
            (span * 1e-3).max(self.h_min)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_match_default() {
        let built = SolverSetupBuilder::default().build().unwrap();
        assert_eq!(built, SolverSetup::default());
    }

    #[test]
    fn test_initial_step() {
        let setup = SolverSetup::default();
        assert_eq!(setup.initial_step(10.0), 1e-2);
        assert_eq!(setup.initial_step(0.0), 1e-12);

        let fixed = SolverSetupBuilder::default().h0(0.5).build().unwrap();
        assert_eq!(fixed.initial_step(10.0), 0.5);
    }

    #[test]
    fn test_partial_json() {
        let setup: SolverSetup = serde_json::from_str(r#"{"rtol": 1e-3}"#).unwrap();
        assert_eq!(setup.rtol, 1e-3);
        assert_eq!(setup.max_steps, 100_000);
    }
}

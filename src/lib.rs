//! Metabolic MCEM Library
//!
//! This library estimates rate-law parameters of metabolic pathway ODE models from
//! time-series observations using a Monte-Carlo Expectation-Maximization search:
//! - Typed, closed parameter sets for the glycolysis and TCA cycle networks
//! - Kinetic rate laws and pathway simulators
//! - Stiff and explicit ODE integration onto observation grids
//! - Residual-based cost functions with failure penalties
//! - The MCEM optimizer with reproducible seeding and multi-chain fan-out
//! - A pathway-level estimation driver and JSON IO

#![warn(unused_imports)]

/// Commonly used types and functionality re-exported for convenience
pub mod prelude {
    pub use crate::estimation::*;
    pub use crate::io::*;
    pub use crate::kinetics::*;
    pub use crate::mcem::*;
    pub use crate::objective::*;
    pub use crate::parameters::*;
    pub use crate::simulation::*;
}

/// Procedural and helper macros
pub mod macros {
    /// Generator for closed parameter enumerations
    #[macro_use]
    pub mod parameter_macro;
}

/// Typed parameter keys, parameter sets and free/fixed partitions
pub mod parameters {
    pub use crate::parameters::error::*;
    pub use crate::parameters::glycolysis::*;
    pub use crate::parameters::key::*;
    pub use crate::parameters::partition::*;
    pub use crate::parameters::set::*;
    pub use crate::parameters::tca::*;

    pub mod error;
    pub mod glycolysis;
    pub mod key;
    pub mod partition;
    pub mod set;
    pub mod tca;
}

/// Kinetic rate laws and per-enzyme velocities
pub mod kinetics {
    pub use crate::kinetics::glycolysis::*;
    pub use crate::kinetics::laws::*;
    pub use crate::kinetics::tca::*;

    /// Cofactor pools and enzyme velocities of the glycolysis network
    pub mod glycolysis;
    /// Generic saturation, reversibility and regulation terms
    pub mod laws;
    /// Cofactor pools and enzyme velocities of the TCA cycle
    pub mod tca;
}

/// Pathway simulators and ODE integration
pub mod simulation {
    pub use crate::simulation::error::*;
    pub use crate::simulation::explicit::*;
    pub use crate::simulation::glycolysis::*;
    pub use crate::simulation::integrator::*;
    pub use crate::simulation::pathway::*;
    pub use crate::simulation::setup::*;
    pub use crate::simulation::stiff::*;
    pub use crate::simulation::tca::*;
    pub use crate::simulation::trajectory::*;
    pub use peroxide::fuga::{ODEIntegrator, ODEProblem, GL4, RK4, RK5, RKF45};

    /// Error types for integration failures
    pub mod error;
    /// Fixed-step peroxide solvers resampled onto observation grids
    pub mod explicit;
    /// Glycolysis pathway simulator
    pub mod glycolysis;
    /// Integrator collaborator contract
    pub mod integrator;
    /// Interpolation functionality
    pub mod interpolation;
    /// Shared pathway simulator contract
    pub mod pathway;
    /// Solver configuration
    pub mod setup;
    /// Rosenbrock stiff solver
    pub mod stiff;
    /// TCA cycle pathway simulator
    pub mod tca;
    /// Simulated time courses
    pub mod trajectory;
}

/// Observations, the trajectory evaluator and fit metrics
pub mod objective {
    pub use crate::objective::error::*;
    pub use crate::objective::evaluator::*;
    pub use crate::objective::objfun::*;
    pub use crate::objective::observation::*;

    pub mod error;
    pub mod evaluator;
    pub mod metrics;
    pub mod objfun;
    pub mod observation;
}

/// Monte-Carlo Expectation-Maximization optimizer
pub mod mcem {
    pub use crate::mcem::chains::*;
    pub use crate::mcem::config::*;
    pub use crate::mcem::error::*;
    pub use crate::mcem::optimizer::*;
    pub use crate::mcem::result::*;

    /// Independent multi-chain execution and reduction
    pub mod chains;
    /// Run configuration and mode presets
    pub mod config;
    pub mod error;
    /// Single-chain EM loop
    pub mod optimizer;
    /// Proposal distribution sampling
    pub(crate) mod proposal;
    pub mod result;
}

/// Pathway-level estimation driver and reports
pub mod estimation;

/// IO functionality
pub mod io;

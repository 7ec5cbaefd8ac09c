//! Pathway simulator contract
//!
//! A pathway owns a fixed metabolite ordering and assembles the mass-balance derivative
//! from its enzyme velocities. Every pathway is also a peroxide [`ODEProblem`], so it
//! can be handed to any of the integrators in this crate.

use peroxide::fuga::ODEProblem;
use serde::{Deserialize, Serialize};

use crate::parameters::{ParameterKey, ParameterSet};

/// A metabolic network that can be integrated in time.
pub trait Pathway: ODEProblem + Clone + Send + Sync {
    /// Parameter keys read by the network's rate laws
    type Param: ParameterKey;

    /// Constant cofactor and effector pools
    type Cofactors: Clone + Default + Send + Sync;

    /// Short identifier, e.g. `"glycolysis"`
    const NAME: &'static str;

    /// Metabolite names in state-vector order
    fn metabolites() -> &'static [&'static str];

    /// Position of a metabolite in the state vector
    fn index_of(name: &str) -> Option<usize> {
        Self::metabolites().iter().position(|m| *m == name)
    }

    /// Number of metabolites in the state vector
    fn dimension() -> usize {
        Self::metabolites().len()
    }

    /// Builds the simulator for a complete parameter set with default cofactor levels.
    fn from_parameters(parameters: ParameterSet<Self::Param>) -> Self;

    /// Replaces the cofactor pools.
    fn with_cofactors(self, cofactors: Self::Cofactors) -> Self;

    fn cofactors(&self) -> &Self::Cofactors;

    /// Copy of this simulator with new parameters and unchanged cofactors.
    fn reparameterize(&self, parameters: ParameterSet<Self::Param>) -> Self;

    /// Parameters the simulator was built with.
    fn parameters(&self) -> &ParameterSet<Self::Param>;

    /// Reference initial concentrations (mM).
    fn initial_state(&self) -> Vec<f64>;

    /// Writes the rate of change of every metabolite into `dy`.
    ///
    /// Deterministic and infallible: inputs outside the physical domain are clamped
    /// according to the pathway's [`ConcentrationFloor`] instead of raising.
    fn derivative(&self, t: f64, y: &[f64], dy: &mut [f64]);

    /// Named per-reaction velocities at state `y`.
    fn fluxes(&self, y: &[f64]) -> Vec<(&'static str, f64)>;
}

/// Policy for concentrations entering the rate laws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum ConcentrationFloor {
    /// Use the integrator's state as is, negative values included
    #[default]
    None,
    /// Replace every concentration below the given value by that value
    Positive(f64),
}

impl ConcentrationFloor {
    /// Floor applied by the TCA simulator
    pub const TCA: ConcentrationFloor = ConcentrationFloor::Positive(1e-10);

    /// Applies the policy to a single concentration.
    #[inline]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            ConcentrationFloor::None => x,
            ConcentrationFloor::Positive(min) => x.max(min),
        }
    }

    /// Copies a state vector into a fixed-size buffer, applying the policy.
    #[inline]
    pub fn clamp_into<const N: usize>(self, y: &[f64]) -> [f64; N] {
        let mut out = [0.0; N];
        for (o, v) in out.iter_mut().zip(y) {
            *o = self.apply(*v);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_policy() {
        assert_eq!(ConcentrationFloor::None.apply(-1.0), -1.0);
        assert_eq!(ConcentrationFloor::TCA.apply(-1.0), 1e-10);
        assert_eq!(ConcentrationFloor::TCA.apply(0.0), 1e-10);
        assert_eq!(ConcentrationFloor::TCA.apply(0.3), 0.3);

        let clamped: [f64; 3] = ConcentrationFloor::TCA.clamp_into(&[-2.0, 0.0, 1.0]);
        assert_eq!(clamped, [1e-10, 1e-10, 1.0]);
    }
}

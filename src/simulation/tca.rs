//! TCA cycle simulator
//!
//! Ten mitochondrial metabolites. Pyruvate is imported from a constant cytosolic supply,
//! converted to acetyl-CoA, and condensed with oxaloacetate; oxaloacetate is regenerated
//! by malate dehydrogenase and consumed again by citrate synthase, closing the cycle.
//! All fluxes are computed from the current state, every concentration floored at 1e-10.

use peroxide::fuga::ODEProblem;

use crate::{
    kinetics::tca::{self as k, TcaCofactors},
    parameters::{ParameterSet, TcaParam},
};

use super::pathway::{ConcentrationFloor, Pathway};

/// Metabolite names in state-vector order
pub const TCA_METABOLITES: [&str; 10] = [
    "PYR_mito", "AcCoA", "CIT", "ISOCIT", "aKG", "SucCoA", "SUC", "FUM", "MAL", "OAA",
];

const INITIAL_CONCENTRATIONS: [f64; 10] = [0.5, 0.1, 0.5, 0.05, 0.1, 0.05, 0.5, 0.2, 0.5, 0.01];

const PYR: usize = 0;
const ACCOA: usize = 1;
const CIT: usize = 2;
const ISOCIT: usize = 3;
const AKG: usize = 4;
const SUCCOA: usize = 5;
const SUC: usize = 6;
const FUM: usize = 7;
const MAL: usize = 8;
const OAA: usize = 9;

/// Velocities of the ten TCA reactions at one state (mM/min).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TcaRates {
    pub transport: f64,
    pub pdh: f64,
    pub cs: f64,
    pub aco: f64,
    pub icdh: f64,
    pub kgdh: f64,
    pub scs: f64,
    pub sdh: f64,
    pub fh: f64,
    pub mdh: f64,
}

impl TcaRates {
    pub fn named(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("v_PYR_transport", self.transport),
            ("v_PDH", self.pdh),
            ("v_CS", self.cs),
            ("v_ACO", self.aco),
            ("v_ICDH", self.icdh),
            ("v_KGDH", self.kgdh),
            ("v_SCS", self.scs),
            ("v_SDH", self.sdh),
            ("v_FH", self.fh),
            ("v_MDH", self.mdh),
        ]
    }
}

/// TCA cycle network with fixed cofactor pools.
#[derive(Debug, Clone, PartialEq)]
pub struct TcaModel {
    parameters: ParameterSet<TcaParam>,
    cofactors: TcaCofactors,
}

impl TcaModel {
    pub fn new(parameters: ParameterSet<TcaParam>) -> Self {
        Self {
            parameters,
            cofactors: TcaCofactors::default(),
        }
    }

    /// Computes all reaction velocities from the floored current state.
    pub fn rates(&self, y: &[f64]) -> TcaRates {
        let x: [f64; 10] = ConcentrationFloor::TCA.clamp_into(y);
        let p = &self.parameters;
        let c = &self.cofactors;

        TcaRates {
            transport: k::pyruvate_transport(p, c),
            pdh: k::pyruvate_dehydrogenase(p, x[PYR], c),
            cs: k::citrate_synthase(p, x[ACCOA], x[OAA], x[CIT], c),
            aco: k::aconitase(p, x[CIT], x[ISOCIT]),
            icdh: k::isocitrate_dehydrogenase(p, x[ISOCIT], c),
            kgdh: k::alpha_ketoglutarate_dehydrogenase(p, x[AKG], x[SUCCOA], c),
            scs: k::succinyl_coa_synthetase(p, x[SUCCOA], c),
            sdh: k::succinate_dehydrogenase(p, x[SUC], c),
            fh: k::fumarase(p, x[FUM], x[MAL]),
            mdh: k::malate_dehydrogenase(p, x[MAL], x[OAA], c),
        }
    }
}

impl Pathway for TcaModel {
    type Param = TcaParam;
    type Cofactors = TcaCofactors;

    const NAME: &'static str = "tca";

    fn metabolites() -> &'static [&'static str] {
        &TCA_METABOLITES
    }

    fn from_parameters(parameters: ParameterSet<TcaParam>) -> Self {
        Self::new(parameters)
    }

    fn with_cofactors(mut self, cofactors: TcaCofactors) -> Self {
        self.cofactors = cofactors;
        self
    }

    fn cofactors(&self) -> &TcaCofactors {
        &self.cofactors
    }

    fn reparameterize(&self, parameters: ParameterSet<TcaParam>) -> Self {
        Self {
            parameters,
            ..self.clone()
        }
    }

    fn parameters(&self) -> &ParameterSet<TcaParam> {
        &self.parameters
    }

    fn initial_state(&self) -> Vec<f64> {
        INITIAL_CONCENTRATIONS.to_vec()
    }

    fn derivative(&self, _t: f64, y: &[f64], dy: &mut [f64]) {
        let v = self.rates(y);

        dy[PYR] = v.transport - v.pdh;
        dy[ACCOA] = v.pdh - v.cs;
        dy[CIT] = v.cs - v.aco;
        dy[ISOCIT] = v.aco - v.icdh;
        dy[AKG] = v.icdh - v.kgdh;
        dy[SUCCOA] = v.kgdh - v.scs;
        dy[SUC] = v.scs - v.sdh;
        dy[FUM] = v.sdh - v.fh;
        dy[MAL] = v.fh - v.mdh;
        dy[OAA] = v.mdh - v.cs;
    }

    fn fluxes(&self, y: &[f64]) -> Vec<(&'static str, f64)> {
        self.rates(y).named()
    }
}

impl ODEProblem for TcaModel {
    fn rhs(&self, t: f64, y: &[f64], dy: &mut [f64]) -> anyhow::Result<()> {
        self.derivative(t, y, dy);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_clamping_reaches_rate_laws() {
        // ARRANGE
        let model = TcaModel::new(ParameterSet::literature());
        let mut y = model.initial_state();
        y[OAA] = -0.3;
        y[SUC] = 0.0;

        let mut floored = y.clone();
        floored[OAA] = 1e-10;
        floored[SUC] = 1e-10;

        // ACT
        let mut dy = vec![0.0; 10];
        let mut dy_floored = vec![0.0; 10];
        model.derivative(0.0, &y, &mut dy);
        model.derivative(0.0, &floored, &mut dy_floored);

        // ASSERT
        assert!(dy.iter().all(|v| v.is_finite()));
        assert_eq!(dy, dy_floored);
    }

    #[test]
    fn test_fluxes_are_named_in_reaction_order() {
        let model = TcaModel::new(ParameterSet::literature());
        let fluxes = model.fluxes(&model.initial_state());
        assert_eq!(fluxes.len(), 10);
        assert_eq!(fluxes[0].0, "v_PYR_transport");
        assert_eq!(fluxes[9].0, "v_MDH");
        assert_relative_eq!(fluxes[0].1, 50.0 * 0.5 / (0.019 + 0.5), epsilon = 1e-12);
    }
}

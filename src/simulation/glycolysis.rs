//! Glycolysis simulator
//!
//! Eleven metabolites from intracellular glucose down to pyruvate. The chain is
//! branch-free except for the triose split: aldolase feeds both DHAP and GAP, and
//! triose phosphate isomerase moves mass between the two.
//!
//! Concentrations reach the rate laws unfloored by default, so integrator overshoot
//! into negative values is visible to the kinetics. [`GlycolysisModel::with_floor`]
//! switches to the same positive floor the TCA simulator uses.

use peroxide::fuga::ODEProblem;

use crate::{
    kinetics::glycolysis::{self as k, GlycolysisCofactors},
    parameters::{GlycolysisParam, ParameterSet},
};

use super::pathway::{ConcentrationFloor, Pathway};

/// Metabolite names in state-vector order
pub const GLYCOLYSIS_METABOLITES: [&str; 11] = [
    "glucose", "G6P", "F6P", "F16BP", "DHAP", "GAP", "BPG", "3PG", "2PG", "PEP", "pyruvate",
];

/// Reference initial concentrations (mM), aligned with [`GLYCOLYSIS_METABOLITES`]
const INITIAL_CONCENTRATIONS: [f64; 11] = [
    0.087, 2.45, 0.62, 5.51, 2.67, 0.68, 0.0, 0.9, 0.12, 0.07, 1.85,
];

const GLUCOSE: usize = 0;
const G6P: usize = 1;
const F6P: usize = 2;
const F16BP: usize = 3;
const DHAP: usize = 4;
const GAP: usize = 5;
const BPG: usize = 6;
const PG3: usize = 7;
const PG2: usize = 8;
const PEP: usize = 9;
const PYRUVATE: usize = 10;

/// Velocities of the eleven glycolytic reactions at one state (mM/min).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlycolysisRates {
    pub hxk: f64,
    pub pgi: f64,
    pub pfk: f64,
    pub ald: f64,
    pub tpi: f64,
    pub gapdh: f64,
    pub pgk: f64,
    pub gpm: f64,
    pub eno: f64,
    pub pyk: f64,
    pub pdc: f64,
}

impl GlycolysisRates {
    pub fn named(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("v_HXK", self.hxk),
            ("v_PGI", self.pgi),
            ("v_PFK", self.pfk),
            ("v_ALD", self.ald),
            ("v_TPI", self.tpi),
            ("v_GAPDH", self.gapdh),
            ("v_PGK", self.pgk),
            ("v_GPM", self.gpm),
            ("v_ENO", self.eno),
            ("v_PYK", self.pyk),
            ("v_PDC", self.pdc),
        ]
    }
}

/// Glycolysis network with fixed cofactor levels.
#[derive(Debug, Clone, PartialEq)]
pub struct GlycolysisModel {
    parameters: ParameterSet<GlycolysisParam>,
    cofactors: GlycolysisCofactors,
    floor: ConcentrationFloor,
}

impl GlycolysisModel {
    pub fn new(parameters: ParameterSet<GlycolysisParam>) -> Self {
        Self {
            parameters,
            cofactors: GlycolysisCofactors::default(),
            floor: ConcentrationFloor::None,
        }
    }

    pub fn with_floor(mut self, floor: ConcentrationFloor) -> Self {
        self.floor = floor;
        self
    }

    /// Computes all reaction velocities from the current state.
    pub fn rates(&self, y: &[f64]) -> GlycolysisRates {
        let x: [f64; 11] = self.floor.clamp_into(y);
        let p = &self.parameters;
        let c = &self.cofactors;

        GlycolysisRates {
            hxk: k::hexokinase(p, x[GLUCOSE], x[G6P], c),
            pgi: k::phosphoglucose_isomerase(p, x[G6P], x[F6P]),
            pfk: k::phosphofructokinase(p, x[F6P], c),
            ald: k::aldolase(p, x[F16BP], x[DHAP], x[GAP]),
            tpi: k::triose_phosphate_isomerase(p, x[DHAP], x[GAP]),
            gapdh: k::gapdh(p, x[GAP], c),
            pgk: k::phosphoglycerate_kinase(p, x[BPG], c),
            gpm: k::phosphoglycerate_mutase(p, x[PG3], x[PG2]),
            eno: k::enolase(p, x[PG2], x[PEP]),
            pyk: k::pyruvate_kinase(p, x[PEP], x[F16BP], c),
            pdc: k::pyruvate_decarboxylase(p, x[PYRUVATE]),
        }
    }
}

impl Pathway for GlycolysisModel {
    type Param = GlycolysisParam;
    type Cofactors = GlycolysisCofactors;

    const NAME: &'static str = "glycolysis";

    fn metabolites() -> &'static [&'static str] {
        &GLYCOLYSIS_METABOLITES
    }

    fn from_parameters(parameters: ParameterSet<GlycolysisParam>) -> Self {
        Self::new(parameters)
    }

    fn with_cofactors(mut self, cofactors: GlycolysisCofactors) -> Self {
        self.cofactors = cofactors;
        self
    }

    fn cofactors(&self) -> &GlycolysisCofactors {
        &self.cofactors
    }

    fn reparameterize(&self, parameters: ParameterSet<GlycolysisParam>) -> Self {
        Self {
            parameters,
            ..self.clone()
        }
    }

    fn parameters(&self) -> &ParameterSet<GlycolysisParam> {
        &self.parameters
    }

    fn initial_state(&self) -> Vec<f64> {
        INITIAL_CONCENTRATIONS.to_vec()
    }

    fn derivative(&self, _t: f64, y: &[f64], dy: &mut [f64]) {
        let v = self.rates(y);

        dy[GLUCOSE] = -v.hxk;
        dy[G6P] = v.hxk - v.pgi;
        dy[F6P] = v.pgi - v.pfk;
        dy[F16BP] = v.pfk - v.ald;
        dy[DHAP] = v.ald - v.tpi;
        dy[GAP] = v.ald + v.tpi - v.gapdh;
        dy[BPG] = v.gapdh - v.pgk;
        dy[PG3] = v.pgk - v.gpm;
        dy[PG2] = v.gpm - v.eno;
        dy[PEP] = v.eno - v.pyk;
        dy[PYRUVATE] = v.pyk - v.pdc;
    }

    fn fluxes(&self, y: &[f64]) -> Vec<(&'static str, f64)> {
        self.rates(y).named()
    }
}

impl ODEProblem for GlycolysisModel {
    fn rhs(&self, t: f64, y: &[f64], dy: &mut [f64]) -> anyhow::Result<()> {
        self.derivative(t, y, dy);
        Ok(())
    }
}

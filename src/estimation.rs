//! Estimation driver
//!
//! Runs a complete estimation for one pathway: the free/fixed partition is built from the
//! default free-parameter list (or a user override), the initial guess is a seeded
//! perturbation of the base values, and the MCEM result is summarized into an
//! [`EstimationReport`] with confidence half-widths and percentage errors.
//!
//! When the observation carries reference ("true") parameters they form the base set and
//! errors are reported against them; otherwise the literature values are the base and the
//! report gives the change from the initial guess.

use std::{
    collections::{BTreeMap, HashMap},
    fmt::Display,
    str::FromStr,
    time::Instant,
};

use log::info;
use ndarray::Array2;
use rand::{distributions::Distribution, rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use statrs::distribution::Normal;
use tabled::{builder::Builder, settings::Style};
use thiserror::Error;

use crate::{
    mcem::{best_of, Mcem, McemConfig, McemError},
    objective::{
        metrics::{
            confidence_half_widths, finite_mean, percentage_change, relative_percentage_errors,
            root_mean_squared_error,
        },
        Objective, Observation, ObservationError, ObservationFile, TrajectoryEvaluator,
    },
    parameters::{
        GlycolysisParam, ParameterError, ParameterKey, ParameterPartition, ParameterSet, TcaParam,
    },
    simulation::{
        integrate_from_origin, GlycolysisModel, IntegrationError, Pathway, SolverSetup,
        StiffSolver, TcaModel, TrajectoryRecord,
    },
};

/// Relative width of the initial-guess perturbation
const GUESS_PERTURBATION: f64 = 0.25;

/// Free parameters estimated for glycolysis unless overridden
pub const GLYCOLYSIS_FREE: [GlycolysisParam; 22] = [
    GlycolysisParam::HxkVmax,
    GlycolysisParam::HxkKmGlucose,
    GlycolysisParam::PgiVmax,
    GlycolysisParam::PgiKmG6p,
    GlycolysisParam::PfkVmax,
    GlycolysisParam::PfkKmF6p,
    GlycolysisParam::AldVmax,
    GlycolysisParam::AldKmF16bp,
    GlycolysisParam::TpiVmax,
    GlycolysisParam::TpiKmDhap,
    GlycolysisParam::GapdhVmax,
    GlycolysisParam::GapdhKmGap,
    GlycolysisParam::GapdhKmNad,
    GlycolysisParam::PgkVmax,
    GlycolysisParam::PgkKm13bpg,
    GlycolysisParam::GpmVmax,
    GlycolysisParam::GpmKm3pg,
    GlycolysisParam::EnoVmax,
    GlycolysisParam::EnoKm2pg,
    GlycolysisParam::PykVmax,
    GlycolysisParam::PykKmPep,
    GlycolysisParam::PdcKmPyruvate,
];

/// Free parameters estimated for the TCA cycle unless overridden
pub const TCA_FREE: [TcaParam; 16] = [
    TcaParam::CsVmax,
    TcaParam::CsKmAccoa,
    TcaParam::AcoVmax,
    TcaParam::AcoKmCitrate,
    TcaParam::IcdhVmax,
    TcaParam::IcdhKmIsocitrate,
    TcaParam::KgdhVmax,
    TcaParam::KgdhKmAkg,
    TcaParam::ScsVmax,
    TcaParam::ScsKmSuccoa,
    TcaParam::SdhVmax,
    TcaParam::SdhKmSuccinate,
    TcaParam::FhVmax,
    TcaParam::FhKmFumarate,
    TcaParam::MdhVmax,
    TcaParam::MdhKmMalate,
];

#[derive(Debug, Error)]
pub enum EstimationError {
    #[error(transparent)]
    ParameterError(#[from] ParameterError),
    #[error(transparent)]
    ObservationError(#[from] ObservationError),
    #[error(transparent)]
    McemError(#[from] McemError),
    #[error("Simulation failed: {0}")]
    SimulationFailed(#[from] IntegrationError),
    #[error("Initial guess has {found} values for {expected} free parameters")]
    GuessLengthMismatch { expected: usize, found: usize },
    #[error("Noise level must be finite and non-negative, got {0}")]
    InvalidNoise(f64),
    #[error("Unknown pathway '{0}' (expected glycolysis or tca)")]
    UnknownPathway(String),
}

/// The two supported pathway models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathwayKind {
    Glycolysis,
    Tca,
}

impl PathwayKind {
    pub fn name(self) -> &'static str {
        match self {
            PathwayKind::Glycolysis => GlycolysisModel::NAME,
            PathwayKind::Tca => TcaModel::NAME,
        }
    }

    /// Seed of the initial-guess perturbation
    pub fn guess_seed(self) -> u64 {
        match self {
            PathwayKind::Glycolysis => 42,
            PathwayKind::Tca => 43,
        }
    }

    pub fn metabolites(self) -> &'static [&'static str] {
        match self {
            PathwayKind::Glycolysis => GlycolysisModel::metabolites(),
            PathwayKind::Tca => TcaModel::metabolites(),
        }
    }

    /// Names of the default free parameters, in estimation order
    pub fn default_free_parameters(self) -> Vec<&'static str> {
        match self {
            PathwayKind::Glycolysis => GLYCOLYSIS_FREE.iter().map(|k| k.name()).collect(),
            PathwayKind::Tca => TCA_FREE.iter().map(|k| k.name()).collect(),
        }
    }

    /// Literature values of every parameter of the pathway
    pub fn literature_parameters(self) -> BTreeMap<String, f64> {
        match self {
            PathwayKind::Glycolysis => ParameterSet::<GlycolysisParam>::literature().to_map(),
            PathwayKind::Tca => ParameterSet::<TcaParam>::literature().to_map(),
        }
    }

    /// Resolves an observation file against this pathway's metabolites.
    pub fn observation(self, file: ObservationFile) -> Result<Observation, ObservationError> {
        match self {
            PathwayKind::Glycolysis => file.into_observation::<GlycolysisModel>(),
            PathwayKind::Tca => file.into_observation::<TcaModel>(),
        }
    }
}

impl Display for PathwayKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for PathwayKind {
    type Err = EstimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "glycolysis" => Ok(PathwayKind::Glycolysis),
            "tca" => Ok(PathwayKind::Tca),
            _ => Err(EstimationError::UnknownPathway(s.to_string())),
        }
    }
}

/// Perturbs each value by a uniform factor in `[1 - 0.125, 1 + 0.125)`.
///
/// guess = v · (1 + 0.25 · (U − 0.5))
pub fn perturbed_guess(values: &[f64], seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    values
        .iter()
        .map(|v| v * (1.0 + GUESS_PERTURBATION * (rng.gen::<f64>() - 0.5)))
        .collect()
}

/// Summary of one pathway estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationReport {
    pub pathway: PathwayKind,
    pub parameters: Vec<String>,
    pub initial_guess: Vec<f64>,
    pub estimates: Vec<f64>,
    pub spread: Vec<f64>,
    /// Half-widths of 95 % confidence intervals (1.96 · spread)
    pub confidence_half_widths: Vec<f64>,
    /// Percentage error against the true values, or change from the initial guess
    pub errors: Vec<f64>,
    pub has_true_parameters: bool,
    pub best_cost: f64,
    pub rmse: f64,
    pub iterations: usize,
    pub converged: bool,
    pub chains: usize,
    pub runtime_seconds: f64,
}

impl EstimationReport {
    /// Mean of the finite percentage errors
    pub fn mean_error(&self) -> Option<f64> {
        finite_mean(&self.errors)
    }
}

impl Display for EstimationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let error_header = if self.has_true_parameters {
            "Error (%)"
        } else {
            "Change (%)"
        };

        let mut builder = Builder::default();
        builder.push_record(vec![
            "Parameter",
            "Initial",
            "Estimate",
            "95% CI ±",
            error_header,
        ]);

        for (i, name) in self.parameters.iter().enumerate() {
            builder.push_record(vec![
                name.clone(),
                format!("{:.4}", self.initial_guess[i]),
                format!("{:.4}", self.estimates[i]),
                format!("{:.4}", self.confidence_half_widths[i]),
                format!("{:.2}", self.errors[i]),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::rounded());

        writeln!(f, "{table}")?;
        writeln!(
            f,
            "{}: {} iterations, converged: {}, best cost: {:.4e}, RMSE: {:.4e}",
            self.pathway, self.iterations, self.converged, self.best_cost, self.rmse
        )?;
        match self.mean_error() {
            Some(mean) => write!(f, "Mean {}: {mean:.2}", error_header.to_lowercase())?,
            None => write!(f, "Mean {}: n/a", error_header.to_lowercase())?,
        }
        write!(f, " ({:.2} s)", self.runtime_seconds)
    }
}

/// A configured estimation for one pathway.
#[derive(Debug, Clone)]
pub struct Estimation {
    kind: PathwayKind,
    config: McemConfig,
    solver: SolverSetup,
    free_parameters: Option<Vec<String>>,
    initial_guess: Option<Vec<f64>>,
    chains: usize,
}

#[bon::bon]
impl Estimation {
    /// Creates an estimation.
    ///
    /// # Arguments
    ///
    /// * `kind` - Pathway to estimate
    /// * `config` - MCEM configuration, the balanced preset if omitted
    /// * `solver` - Stiff solver settings
    /// * `free_parameters` - Names overriding the default free list
    /// * `initial_guess` - Explicit starting point overriding the seeded perturbation
    /// * `chains` - Number of independent chains, 1 if omitted
    #[builder]
    pub fn new(
        kind: PathwayKind,
        config: Option<McemConfig>,
        solver: Option<SolverSetup>,
        free_parameters: Option<Vec<String>>,
        initial_guess: Option<Vec<f64>>,
        chains: Option<usize>,
    ) -> Self {
        Self {
            kind,
            config: config.unwrap_or_default(),
            solver: solver.unwrap_or_default(),
            free_parameters,
            initial_guess,
            chains: chains.unwrap_or(1),
        }
    }
}

impl Estimation {
    pub fn kind(&self) -> PathwayKind {
        self.kind
    }

    pub fn config(&self) -> &McemConfig {
        &self.config
    }

    /// Runs the estimation against an observation of this pathway.
    pub fn run(&self, observation: &Observation) -> Result<EstimationReport, EstimationError> {
        match self.kind {
            PathwayKind::Glycolysis => {
                self.run_pathway::<GlycolysisModel>(observation, &GLYCOLYSIS_FREE)
            }
            PathwayKind::Tca => self.run_pathway::<TcaModel>(observation, &TCA_FREE),
        }
    }

    fn run_pathway<P: Pathway>(
        &self,
        observation: &Observation,
        default_free: &[P::Param],
    ) -> Result<EstimationReport, EstimationError> {
        let base = match observation.true_parameters() {
            Some(truth) => ParameterSet::<P::Param>::reference_with(truth)?,
            None => ParameterSet::literature(),
        };

        let free = match &self.free_parameters {
            Some(names) => P::Param::parse_all(names)?,
            None => default_free.to_vec(),
        };

        let partition = ParameterPartition::from_base(base, free)?;

        let initial_guess = match &self.initial_guess {
            Some(guess) if guess.len() != partition.dimension() => {
                return Err(EstimationError::GuessLengthMismatch {
                    expected: partition.dimension(),
                    found: guess.len(),
                })
            }
            Some(guess) => guess.clone(),
            None => perturbed_guess(&partition.initial_values(), self.kind.guess_seed()),
        };

        let evaluator = TrajectoryEvaluator::<P, _>::new(
            partition,
            observation.clone(),
            StiffSolver::new(self.solver),
        )?;

        info!(
            "Estimating {} {} parameters from {} data points",
            evaluator.dimension(),
            P::NAME,
            observation.len()
        );

        let mcem = Mcem::new(self.config.clone());
        let start = Instant::now();

        let result = if self.chains > 1 {
            best_of(mcem.run_chains(&evaluator, &initial_guess, self.chains)?)
                .ok_or(McemError::NoChains)?
        } else {
            mcem.run(&evaluator, &initial_guess)?
        };

        let runtime_seconds = start.elapsed().as_secs_f64();

        let free = evaluator.partition().free();
        let (errors, has_true_parameters) = match observation.true_values_of(free) {
            Some(truth) => (relative_percentage_errors(&result.best_parameters, &truth), true),
            None => (percentage_change(&result.best_parameters, &initial_guess), false),
        };

        let rmse = root_mean_squared_error(&evaluator.residuals(&result.best_parameters));

        Ok(EstimationReport {
            pathway: self.kind,
            parameters: evaluator.partition().free_names(),
            initial_guess,
            confidence_half_widths: confidence_half_widths(&result.spread),
            estimates: result.best_parameters,
            spread: result.spread,
            errors,
            has_true_parameters,
            best_cost: result.best_cost,
            rmse,
            iterations: result.iterations,
            converged: result.converged,
            chains: self.chains.max(1),
            runtime_seconds,
        })
    }
}

/// Simulates a pathway with literature parameters overridden by `parameters`.
pub fn simulate_pathway(
    kind: PathwayKind,
    parameters: &HashMap<String, f64>,
    times: &[f64],
    solver: SolverSetup,
) -> Result<TrajectoryRecord, EstimationError> {
    fn simulate<P: Pathway>(
        parameters: &HashMap<String, f64>,
        times: &[f64],
        solver: SolverSetup,
    ) -> Result<TrajectoryRecord, EstimationError> {
        let model = P::from_parameters(ParameterSet::literature_with(parameters)?);
        let trajectory = integrate_from_origin(&StiffSolver::new(solver), &model, times)?;
        Ok(trajectory.to_record(P::metabolites()))
    }

    match kind {
        PathwayKind::Glycolysis => simulate::<GlycolysisModel>(parameters, times, solver),
        PathwayKind::Tca => simulate::<TcaModel>(parameters, times, solver),
    }
}

/// Simulates a pathway and returns the observed metabolites as an observation file.
///
/// # Arguments
///
/// * `kind` - Pathway to simulate
/// * `parameters` - Overrides of the literature parameter values
/// * `times` - Observation time points
/// * `observable` - Names of the observed metabolites
/// * `noise` - Relative standard deviation of multiplicative Gaussian noise, 0 for exact data
/// * `seed` - Seed of the noise stream
///
/// # Returns
///
/// * `Result<ObservationFile, EstimationError>` - Observation whose `true_parameters` hold the
///   full parameter set used for the simulation
pub fn synthesize_observation<S: AsRef<str>>(
    kind: PathwayKind,
    parameters: &HashMap<String, f64>,
    times: &[f64],
    observable: &[S],
    noise: f64,
    seed: u64,
) -> Result<ObservationFile, EstimationError> {
    match kind {
        PathwayKind::Glycolysis => {
            synthesize::<GlycolysisModel, S>(parameters, times, observable, noise, seed)
        }
        PathwayKind::Tca => synthesize::<TcaModel, S>(parameters, times, observable, noise, seed),
    }
}

fn synthesize<P: Pathway, S: AsRef<str>>(
    parameters: &HashMap<String, f64>,
    times: &[f64],
    observable: &[S],
    noise: f64,
    seed: u64,
) -> Result<ObservationFile, EstimationError> {
    if !(noise.is_finite() && noise >= 0.0) {
        return Err(EstimationError::InvalidNoise(noise));
    }

    let names = observable.iter().map(|s| s.as_ref().to_string()).collect::<Vec<_>>();
    let indices = names
        .iter()
        .map(|name| {
            P::index_of(name).ok_or_else(|| ObservationError::UnknownMetabolite {
                name: name.clone(),
                pathway: P::NAME.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let set = ParameterSet::<P::Param>::literature_with(parameters)?;
    let model = P::from_parameters(set.clone());
    let trajectory = integrate_from_origin(&StiffSolver::default(), &model, times)?;
    let mut values = trajectory.observed(&indices);

    if noise > 0.0 {
        add_noise(&mut values, noise, seed)?;
    }

    let file = ObservationFile {
        time: times.to_vec(),
        observables: names,
        values: values.outer_iter().map(|row| row.to_vec()).collect(),
        true_parameters: Some(set.to_map()),
    };

    // Validates the grid and shape the same way a loaded file is validated
    file.clone().into_observation::<P>()?;

    Ok(file)
}

fn add_noise(values: &mut Array2<f64>, noise: f64, seed: u64) -> Result<(), EstimationError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).map_err(|_| EstimationError::InvalidNoise(noise))?;

    values.mapv_inplace(|v| v * (1.0 + noise * normal.sample(&mut rng)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_free_lists() {
        assert_eq!(PathwayKind::Glycolysis.default_free_parameters().len(), 22);
        assert_eq!(PathwayKind::Tca.default_free_parameters().len(), 16);
        assert_eq!(
            PathwayKind::Tca.default_free_parameters()[..2],
            ["CS_Vmax", "CS_Km_AcCoA"]
        );
        assert_eq!(
            PathwayKind::Glycolysis.default_free_parameters().last(),
            Some(&"PDC_Km_pyruvate")
        );
    }

    #[test]
    fn test_perturbed_guess_is_bounded_and_seeded() {
        let values = vec![10.0; 50];
        let a = perturbed_guess(&values, 42);
        let b = perturbed_guess(&values, 42);
        let c = perturbed_guess(&values, 43);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.iter().all(|v| (8.75..11.25).contains(v)));
    }

    #[test]
    fn test_pathway_kind_parsing() {
        assert_eq!("TCA".parse::<PathwayKind>().unwrap(), PathwayKind::Tca);
        assert_eq!(PathwayKind::Glycolysis.to_string(), "glycolysis");
        assert!("pentose".parse::<PathwayKind>().is_err());
    }

    #[test]
    fn test_synthesize_exact_and_noisy() {
        // ARRANGE
        let times = [0.5, 1.0, 2.0];
        let overrides = HashMap::from([("CS_Vmax".to_string(), 60.0)]);

        // ACT
        let exact =
            synthesize_observation(PathwayKind::Tca, &overrides, &times, &["CIT", "OAA"], 0.0, 1)
                .unwrap();
        let noisy =
            synthesize_observation(PathwayKind::Tca, &overrides, &times, &["CIT", "OAA"], 0.05, 1)
                .unwrap();

        // ASSERT
        assert_eq!(exact.values.len(), 2);
        assert_eq!(exact.values[0].len(), 3);
        assert_eq!(exact.true_parameters.as_ref().unwrap()["CS_Vmax"], 60.0);
        assert_ne!(exact.values, noisy.values);
        assert_eq!(exact.observables, noisy.observables);
    }

    #[test]
    fn test_synthesize_rejects_bad_input() {
        let none: HashMap<String, f64> = HashMap::new();
        assert!(matches!(
            synthesize_observation(PathwayKind::Tca, &none, &[0.0, 1.0], &["citrate"], 0.0, 1),
            Err(EstimationError::ObservationError(_))
        ));
        assert!(matches!(
            synthesize_observation(PathwayKind::Tca, &none, &[0.0, 1.0], &["CIT"], -1.0, 1),
            Err(EstimationError::InvalidNoise(_))
        ));
    }

    #[test]
    fn test_simulate_pathway_names_every_metabolite() {
        let record = simulate_pathway(
            PathwayKind::Glycolysis,
            &HashMap::new(),
            &[1.0, 2.0],
            SolverSetup::default(),
        )
        .unwrap();

        assert_eq!(record.time, vec![1.0, 2.0]);
        assert_eq!(record.species.len(), PathwayKind::Glycolysis.metabolites().len());
    }

    #[test]
    fn test_guess_length_checked() {
        let observation = PathwayKind::Tca
            .observation(
                synthesize_observation(
                    PathwayKind::Tca,
                    &HashMap::new(),
                    &[0.0, 1.0],
                    &["CIT"],
                    0.0,
                    1,
                )
                .unwrap(),
            )
            .unwrap();

        let estimation = Estimation::builder()
            .kind(PathwayKind::Tca)
            .initial_guess(vec![1.0])
            .build();

        assert!(matches!(
            estimation.run(&observation),
            Err(EstimationError::GuessLengthMismatch {
                expected: 16,
                found: 1
            })
        ));
    }
}

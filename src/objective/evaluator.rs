//! Trajectory evaluator
//!
//! Bridges a candidate vector of free-parameter values to residuals: the candidate is
//! merged into the fixed parameters, the pathway is rebuilt and integrated from its
//! initial state over the observation grid, and the simulated observables are compared
//! against the data. Integration failures never escape; they turn into a residual
//! vector of [`FAILURE_RESIDUAL`] entries, so the cost stays large but finite.

use log::trace;
use ndarray::Array1;

use crate::{
    parameters::ParameterPartition,
    simulation::{integrate_from_origin, Integrator, Pathway, Trajectory},
};

use super::{
    error::{EvaluationError, ObservationError},
    objfun::Objective,
    observation::Observation,
};

/// Residual substituted for every data point when a candidate cannot be simulated
pub const FAILURE_RESIDUAL: f64 = 1e10;

/// Cost function of a pathway against one observation.
#[derive(Debug, Clone)]
pub struct TrajectoryEvaluator<P: Pathway, I: Integrator> {
    partition: ParameterPartition<P::Param>,
    observation: Observation,
    integrator: I,
    template: P,
}

impl<P: Pathway, I: Integrator> TrajectoryEvaluator<P, I> {
    /// Creates an evaluator.
    ///
    /// # Arguments
    ///
    /// * `partition` - Free/fixed split of the pathway parameters
    /// * `observation` - Data to fit; its observable indices must address states of `P`
    /// * `integrator` - Integrator used for every simulation
    ///
    /// # Returns
    ///
    /// * `Result<TrajectoryEvaluator<P, I>, ObservationError>` - The evaluator, or an error if
    ///   the observation does not fit the pathway
    pub fn new(
        partition: ParameterPartition<P::Param>,
        observation: Observation,
        integrator: I,
    ) -> Result<Self, ObservationError> {
        observation.check_against::<P>()?;

        let initial = partition.merge(&partition.initial_values())?;
        let template = P::from_parameters(initial);

        Ok(Self {
            partition,
            observation,
            integrator,
            template,
        })
    }

    /// Uses `model` for cofactor levels and concentration policy instead of the defaults.
    pub fn with_template(mut self, model: P) -> Self {
        self.template = model;
        self
    }

    pub fn partition(&self) -> &ParameterPartition<P::Param> {
        &self.partition
    }

    pub fn observation(&self) -> &Observation {
        &self.observation
    }

    pub fn integrator(&self) -> &I {
        &self.integrator
    }

    /// Simulates the pathway for a candidate at the observation time points.
    ///
    /// Integration always starts from the model's initial state at `t = 0`; see
    /// [`integrate_from_origin`].
    pub fn simulate(&self, candidate: &[f64]) -> Result<Trajectory, EvaluationError> {
        let parameters = self.partition.merge(candidate)?;
        let model = self.template.reparameterize(parameters);

        Ok(integrate_from_origin(
            &self.integrator,
            &model,
            self.observation.times(),
        )?)
    }

    fn penalty(&self) -> Array1<f64> {
        Array1::from_elem(self.observation.len(), FAILURE_RESIDUAL)
    }
}

impl<P: Pathway, I: Integrator> Objective for TrajectoryEvaluator<P, I> {
    fn dimension(&self) -> usize {
        self.partition.dimension()
    }

    /// Residuals `y_model[obs, t] − data[obs, t]`, flattened metabolite-major.
    fn residuals(&self, candidate: &[f64]) -> Array1<f64> {
        let trajectory = match self.simulate(candidate) {
            Ok(trajectory) => trajectory,
            Err(e) => {
                trace!("{} simulation failed: {e}", P::NAME);
                return self.penalty();
            }
        };

        let simulated = trajectory.observed(self.observation.observable());
        let residuals = (simulated - self.observation.values())
            .iter()
            .copied()
            .collect::<Array1<f64>>();

        if residuals.iter().any(|r| !r.is_finite()) {
            trace!("{} simulation produced non-finite observables", P::NAME);
            return self.penalty();
        }

        residuals
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::Array2;
    use peroxide::fuga::ODEProblem;

    use crate::{
        parameters::{GlycolysisParam, ParameterSet, TcaParam},
        simulation::{IntegrationError, StiffSolver, TcaModel},
    };

    use super::*;

    /// Integrator that fails on every call
    #[derive(Debug, Clone, Copy)]
    struct Broken;

    impl Integrator for Broken {
        fn integrate<Q: ODEProblem>(
            &self,
            _problem: &Q,
            _y0: &[f64],
            _times: &[f64],
        ) -> Result<Trajectory, IntegrationError> {
            Err(IntegrationError::StepSizeUnderflow { t: 0.0, h: 1e-13 })
        }
    }

    fn tca_observation(times: Vec<f64>) -> Observation {
        let model = TcaModel::new(ParameterSet::literature());
        let traj = StiffSolver::default()
            .integrate(&model, &model.initial_state(), &times)
            .unwrap();
        Observation::new(times, traj.observed(&[2, 9]), vec![2, 9]).unwrap()
    }

    fn tca_partition() -> ParameterPartition<TcaParam> {
        ParameterPartition::from_base(
            ParameterSet::literature(),
            vec![TcaParam::CsVmax, TcaParam::MdhVmax],
        )
        .unwrap()
    }

    #[test]
    fn test_true_parameters_give_zero_residuals() {
        // ARRANGE
        let observation = tca_observation(vec![0.0, 0.5, 1.0, 2.0]);
        let evaluator =
            TrajectoryEvaluator::<TcaModel, _>::new(tca_partition(), observation, StiffSolver::default())
                .unwrap();
        let truth = evaluator.partition().initial_values();

        // ACT
        let residuals = evaluator.residuals(&truth);

        // ASSERT
        assert_eq!(residuals.len(), 8);
        assert!(residuals.iter().all(|r| r.abs() < 1e-12));
        assert!(evaluator.cost(&[truth[0] * 1.5, truth[1]]) > 0.0);
    }

    #[test]
    fn test_leading_zero_is_implicit() {
        let full = tca_observation(vec![0.0, 0.5, 1.0]);
        let values = full.values().slice(ndarray::s![.., 1..]).to_owned();
        let late = Observation::new(vec![0.5, 1.0], values, vec![2, 9]).unwrap();

        let evaluator =
            TrajectoryEvaluator::<TcaModel, _>::new(tca_partition(), late, StiffSolver::default())
                .unwrap();
        let truth = evaluator.partition().initial_values();

        assert!(evaluator.cost(&truth) < 1e-20);
    }

    #[test]
    fn test_failure_yields_penalty() {
        // ARRANGE
        let observation = tca_observation(vec![0.0, 1.0, 2.0]);
        let evaluator =
            TrajectoryEvaluator::<TcaModel, _>::new(tca_partition(), observation, Broken).unwrap();

        // ACT
        let residuals = evaluator.residuals(&[80.0, 100.0]);

        // ASSERT
        assert!(residuals.iter().all(|r| *r == FAILURE_RESIDUAL));
        assert_relative_eq!(evaluator.cost(&[80.0, 100.0]), 1e20 * 6.0);
        assert!(evaluator.log_likelihood(&[80.0, 100.0]).is_finite());
    }

    #[test]
    fn test_wrong_candidate_length_yields_penalty() {
        let observation = tca_observation(vec![0.0, 1.0]);
        let evaluator =
            TrajectoryEvaluator::<TcaModel, _>::new(tca_partition(), observation, StiffSolver::default())
                .unwrap();

        assert!(matches!(
            evaluator.simulate(&[1.0]),
            Err(EvaluationError::ParameterError(_))
        ));
        assert_eq!(evaluator.residuals(&[1.0])[0], FAILURE_RESIDUAL);
    }

    #[test]
    fn test_observable_out_of_range_is_rejected() {
        let observation = Observation::new(vec![0.0], Array2::zeros((1, 1)), vec![10]).unwrap();
        let partition =
            ParameterPartition::from_base(ParameterSet::literature(), vec![GlycolysisParam::HxkVmax])
                .unwrap();

        assert!(TrajectoryEvaluator::<TcaModel, _>::new(tca_partition(), observation.clone(), Broken).is_err());
        assert!(TrajectoryEvaluator::<crate::simulation::GlycolysisModel, _>::new(
            partition,
            observation,
            Broken
        )
        .is_ok());
    }
}

//! Explicit integrators backed by peroxide
//!
//! [`ExplicitSolver`] wraps any peroxide [`ODEIntegrator`] (RK4, RK5, RKF45, GL4, ...)
//! behind the crate's [`Integrator`] contract. The solver steps from the first to the
//! last requested time with step size `dt`, and the output is resampled onto the
//! requested grid. Useful as a cross-check of the stiff solver on mild parameter sets.

use peroxide::fuga::{BasicODESolver, ODEIntegrator, ODEProblem, ODESolver};

use super::{
    error::IntegrationError,
    integrator::{validate_times, Integrator},
    interpolation::interpolate,
    trajectory::Trajectory,
};

/// Fixed or adaptive explicit stepping followed by spline resampling.
#[derive(Debug, Clone)]
pub struct ExplicitSolver<S: ODEIntegrator + Clone> {
    integrator: S,
    dt: f64,
}

impl<S: ODEIntegrator + Clone> ExplicitSolver<S> {
    /// Creates a solver stepping with `dt` (or starting from `dt`, for adaptive methods).
    pub fn new(integrator: S, dt: f64) -> Self {
        Self { integrator, dt }
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }
}

impl<S> Integrator for ExplicitSolver<S>
where
    S: ODEIntegrator + Clone + Send + Sync,
{
    fn integrate<P: ODEProblem>(
        &self,
        problem: &P,
        y0: &[f64],
        times: &[f64],
    ) -> Result<Trajectory, IntegrationError> {
        validate_times(times)?;

        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(IntegrationError::SolverError(format!(
                "Step size must be positive, got {}",
                self.dt
            )));
        }

        let t0 = times[0];
        let t1 = times[times.len() - 1];

        if t1 == t0 {
            let rows = vec![y0.to_vec(); times.len()];
            return trajectory(times, &rows, y0.len());
        }

        let solver = BasicODESolver::new(self.integrator.clone());
        let (t_out, y_out) = solver
            .solve(problem, (t0, t1), self.dt, y0)
            .map_err(|e| IntegrationError::RhsError(e.to_string()))?;

        if let Some(t) = y_out
            .iter()
            .zip(&t_out)
            .find(|(y, _)| y.iter().any(|v| !v.is_finite()))
            .map(|(_, t)| *t)
        {
            return Err(IntegrationError::NonFiniteState(t));
        }

        let rows = interpolate(&y_out, &t_out, times).ok_or_else(|| {
            IntegrationError::SolverError("Solver output could not be resampled".to_string())
        })?;

        trajectory(times, &rows, y0.len())
    }
}

fn trajectory(times: &[f64], rows: &[Vec<f64>], expected: usize) -> Result<Trajectory, IntegrationError> {
    Trajectory::from_rows(times.to_vec(), rows).ok_or(IntegrationError::DimensionMismatch {
        expected,
        found: rows.first().map_or(0, |r| r.len()),
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use peroxide::fuga::RK4;

    use crate::simulation::{stiff::StiffSolver, GlycolysisModel, Pathway};
    use crate::parameters::ParameterSet;

    use super::*;

    struct Decay;

    impl ODEProblem for Decay {
        fn rhs(&self, _t: f64, y: &[f64], dy: &mut [f64]) -> anyhow::Result<()> {
            dy[0] = -0.5 * y[0];
            Ok(())
        }
    }

    #[test]
    fn test_rk4_decay_on_requested_grid() {
        // ARRANGE
        let solver = ExplicitSolver::new(RK4, 0.01);
        let times = [0.0, 0.25, 1.0, 3.0];

        // ACT
        let traj = solver.integrate(&Decay, &[1.0], &times).unwrap();

        // ASSERT
        assert_eq!(traj.times(), &times);
        for (i, t) in times.iter().enumerate() {
            assert_relative_eq!(traj.states()[(i, 0)], (-0.5 * t).exp(), max_relative = 1e-4);
        }
    }

    #[test]
    fn test_agrees_with_stiff_solver_on_glycolysis() {
        let model = GlycolysisModel::new(ParameterSet::literature());
        let y0 = model.initial_state();
        let times = [0.0, 0.01, 0.02, 0.05];

        let explicit = ExplicitSolver::new(RK4, 1e-5)
            .integrate(&model, &y0, &times)
            .unwrap();
        let stiff = StiffSolver::default().integrate(&model, &y0, &times).unwrap();

        for (a, b) in explicit.states().iter().zip(stiff.states().iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-3, max_relative = 1e-3);
        }
    }

    #[test]
    fn test_rejects_non_positive_step() {
        let solver = ExplicitSolver::new(RK4, 0.0);
        assert!(matches!(
            solver.integrate(&Decay, &[1.0], &[0.0, 1.0]),
            Err(IntegrationError::SolverError(_))
        ));
    }
}

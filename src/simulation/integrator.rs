//! Integrator contract
//!
//! An [`Integrator`] turns an [`ODEProblem`] and an initial state into a [`Trajectory`]
//! sampled exactly at the requested time points. Integrators are stateless between calls
//! and are shared read-only across parallel chains.

use peroxide::fuga::ODEProblem;

use super::{error::IntegrationError, pathway::Pathway, trajectory::Trajectory};

pub trait Integrator: Send + Sync {
    /// Integrates `problem` from `times[0]` and returns the state at every entry of `times`.
    ///
    /// # Arguments
    ///
    /// * `problem` - Right-hand side of the system
    /// * `y0` - State at `times[0]`
    /// * `times` - Output time points, non-negative and non-decreasing
    ///
    /// # Returns
    ///
    /// * `Result<Trajectory, IntegrationError>` - One row per time point
    fn integrate<P: ODEProblem>(
        &self,
        problem: &P,
        y0: &[f64],
        times: &[f64],
    ) -> Result<Trajectory, IntegrationError>;
}

/// Integrates a pathway from its initial state at `t = 0` and returns the requested times.
///
/// If the first requested time lies after 0, the origin is integrated but dropped from the
/// result, so the returned trajectory always matches `times` row for row.
pub fn integrate_from_origin<P: Pathway, I: Integrator>(
    integrator: &I,
    model: &P,
    times: &[f64],
) -> Result<Trajectory, IntegrationError> {
    let y0 = model.initial_state();
    match times.first() {
        Some(t0) if *t0 > 0.0 => {
            let mut grid = Vec::with_capacity(times.len() + 1);
            grid.push(0.0);
            grid.extend_from_slice(times);

            Ok(integrator.integrate(model, &y0, &grid)?.drop_leading(1))
        }
        _ => integrator.integrate(model, &y0, times),
    }
}

/// Checks that an output grid is non-empty, finite, non-negative and non-decreasing.
pub(crate) fn validate_times(times: &[f64]) -> Result<(), IntegrationError> {
    let first = *times.first().ok_or(IntegrationError::EmptyTimeGrid)?;
    if !first.is_finite() || first < 0.0 {
        return Err(IntegrationError::InvalidTimeGrid(first));
    }

    for pair in times.windows(2) {
        if !pair[1].is_finite() || pair[1] < pair[0] {
            return Err(IntegrationError::InvalidTimeGrid(pair[1]));
        }
    }

    Ok(())
}

/// Evaluates the right-hand side, mapping failures into [`IntegrationError::RhsError`].
pub(crate) fn eval_rhs<P: ODEProblem>(
    problem: &P,
    t: f64,
    y: &[f64],
    dy: &mut [f64],
) -> Result<(), IntegrationError> {
    problem
        .rhs(t, y, dy)
        .map_err(|e| IntegrationError::RhsError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use crate::{parameters::ParameterSet, simulation::TcaModel};

    use super::*;

    /// Holds the initial state and remembers the last grid it was asked for
    #[derive(Default)]
    struct Recording {
        grid: Mutex<Vec<f64>>,
    }

    impl Integrator for Recording {
        fn integrate<P: ODEProblem>(
            &self,
            _problem: &P,
            y0: &[f64],
            times: &[f64],
        ) -> Result<Trajectory, IntegrationError> {
            *self.grid.lock().unwrap() = times.to_vec();
            let rows = vec![y0.to_vec(); times.len()];
            Ok(Trajectory::from_rows(times.to_vec(), &rows).unwrap())
        }
    }

    #[test]
    fn test_integrate_from_origin_prepends_zero() {
        // ARRANGE
        let model = TcaModel::from_parameters(ParameterSet::literature());
        let integrator = Recording::default();

        // ACT
        let late = integrate_from_origin(&integrator, &model, &[0.5, 1.0, 2.0]).unwrap();
        let late_grid = integrator.grid.lock().unwrap().clone();
        let early = integrate_from_origin(&integrator, &model, &[0.0, 1.0]).unwrap();
        let early_grid = integrator.grid.lock().unwrap().clone();

        // ASSERT
        assert_eq!(late_grid, vec![0.0, 0.5, 1.0, 2.0]);
        assert_eq!(late.times(), &[0.5, 1.0, 2.0]);
        assert_eq!(late.n_times(), 3);
        assert_eq!(early_grid, vec![0.0, 1.0]);
        assert_eq!(early.times(), &[0.0, 1.0]);
    }

    #[test]
    fn test_validate_times() {
        assert!(validate_times(&[0.0, 0.0, 1.0, 2.5]).is_ok());
        assert!(matches!(
            validate_times(&[]),
            Err(IntegrationError::EmptyTimeGrid)
        ));
        assert!(matches!(
            validate_times(&[0.0, 2.0, 1.0]),
            Err(IntegrationError::InvalidTimeGrid(v)) if v == 1.0
        ));
        assert!(matches!(
            validate_times(&[-1.0, 2.0]),
            Err(IntegrationError::InvalidTimeGrid(_))
        ));
        assert!(matches!(
            validate_times(&[0.0, f64::NAN]),
            Err(IntegrationError::InvalidTimeGrid(_))
        ));
    }
}

//! Interpolation of fixed-step solver output
//!
//! Explicit peroxide solvers emit states on their own internal grid. This module
//! resamples that output onto the observation times, using Catmull-Rom splines where
//! they are defined and linear interpolation near the ends of the grid, where the
//! cubic spline has no neighbours to draw on.

use nalgebra::DMatrix;
use splines::{Interpolation, Key, Spline};

/// Resamples solver output at the query times.
///
/// # Arguments
///
/// * `states` - Solver states, one vector per entry of `times`
/// * `times` - Solver time points, strictly increasing
/// * `query_times` - Time points at which to interpolate values
///
/// # Returns
///
/// * `Option<Vec<Vec<f64>>>` - One interpolated state per query time, or `None` if the
///   solver output is empty or a query lies outside a single-point grid
pub fn interpolate(states: &[Vec<f64>], times: &[f64], query_times: &[f64]) -> Option<Vec<Vec<f64>>> {
    let data = concatenate(states)?;

    let cubic_splines = setup_splines(&data, times, Interpolation::CatmullRom);
    let linear_splines = setup_splines(&data, times, Interpolation::Linear);

    query_times
        .iter()
        .map(|t| {
            linear_splines
                .iter()
                .zip(cubic_splines.iter())
                .map(|(linear, cubic)| cubic.sample(*t).or_else(|| linear.clamped_sample(*t)))
                .collect::<Option<Vec<f64>>>()
        })
        .collect()
}

/// Creates one spline per state variable.
fn setup_splines(
    data: &DMatrix<f64>,
    times: &[f64],
    interpolation: Interpolation<f64, f64>,
) -> Vec<Spline<f64, f64>> {
    (0..data.ncols())
        .map(|col| {
            let keys = times
                .iter()
                .enumerate()
                .map(|(row, t)| Key::new(*t, data[(row, col)], interpolation))
                .collect();
            Spline::from_vec(keys)
        })
        .collect()
}

/// Stacks state vectors into a matrix with one row per time point.
fn concatenate(states: &[Vec<f64>]) -> Option<DMatrix<f64>> {
    let ncols = states.first()?.len();
    if states.iter().any(|s| s.len() != ncols) {
        return None;
    }
    Some(DMatrix::from_row_iterator(
        states.len(),
        ncols,
        states.iter().flatten().copied(),
    ))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_interpolate_linear_data() {
        // ARRANGE
        let times = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        let states = times.iter().map(|t| vec![2.0 * t, 1.0]).collect::<Vec<_>>();

        // ACT
        let out = interpolate(&states, &times, &[0.0, 1.5, 4.0]).unwrap();

        // ASSERT
        assert_relative_eq!(out[0][0], 0.0);
        assert_relative_eq!(out[1][0], 3.0, epsilon = 1e-10);
        assert_relative_eq!(out[2][0], 8.0);
        assert!(out.iter().all(|row| row[1] == 1.0));
    }

    #[test]
    fn test_interpolate_rejects_empty() {
        assert!(interpolate(&[], &[], &[0.0]).is_none());
    }
}

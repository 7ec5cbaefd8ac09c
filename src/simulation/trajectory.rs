//! Simulated time courses
//!
//! A [`Trajectory`] stores one state vector per requested time point. It is produced once
//! per evaluator call and only ever summarized into residuals or written out by callers.

use ndarray::{s, Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// States of a pathway at a sequence of time points.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    times: Vec<f64>,
    /// One row per time point, one column per metabolite
    states: Array2<f64>,
}

impl Trajectory {
    /// Creates a trajectory from rows of state vectors.
    ///
    /// # Arguments
    ///
    /// * `times` - Time points
    /// * `rows` - State vectors, one per time point, all of equal length
    ///
    /// # Returns
    ///
    /// * `Option<Trajectory>` - `None` if the rows are ragged or their number does not
    ///   match the number of time points
    pub fn from_rows(times: Vec<f64>, rows: &[Vec<f64>]) -> Option<Self> {
        if rows.len() != times.len() {
            return None;
        }

        let n_states = rows.first().map_or(0, |r| r.len());
        if rows.iter().any(|r| r.len() != n_states) {
            return None;
        }

        let flat = rows.iter().flatten().copied().collect::<Vec<_>>();
        let states = Array2::from_shape_vec((times.len(), n_states), flat).ok()?;

        Some(Self { times, states })
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn states(&self) -> &Array2<f64> {
        &self.states
    }

    pub fn n_times(&self) -> usize {
        self.times.len()
    }

    pub fn n_states(&self) -> usize {
        self.states.ncols()
    }

    /// Time course of a single metabolite.
    pub fn species(&self, index: usize) -> ArrayView1<'_, f64> {
        self.states.column(index)
    }

    /// State vector at the last time point.
    pub fn last_state(&self) -> Option<Array1<f64>> {
        self.states
            .axis_iter(Axis(0))
            .last()
            .map(|row| row.to_owned())
    }

    /// Projects the trajectory onto observed metabolites.
    ///
    /// # Arguments
    ///
    /// * `observable` - State indices, in observation order
    ///
    /// # Returns
    ///
    /// * `Array2<f64>` - One row per observed metabolite, one column per time point
    pub fn observed(&self, observable: &[usize]) -> Array2<f64> {
        self.states.select(Axis(1), observable).reversed_axes()
    }

    /// Drops the first `n` time points.
    pub fn drop_leading(self, n: usize) -> Self {
        let n = n.min(self.times.len());
        Self {
            times: self.times[n..].to_vec(),
            states: self.states.slice(s![n.., ..]).to_owned(),
        }
    }

    /// Converts into a serializable record with named metabolites.
    pub fn to_record(&self, metabolites: &[&str]) -> TrajectoryRecord {
        TrajectoryRecord {
            time: self.times.clone(),
            species: metabolites
                .iter()
                .enumerate()
                .map(|(i, name)| (name.to_string(), self.species(i).to_vec()))
                .collect(),
        }
    }
}

/// Serializable form of a trajectory keyed by metabolite name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrajectoryRecord {
    pub time: Vec<f64>,
    pub species: Vec<(String, Vec<f64>)>,
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn test_from_rows_and_projection() {
        let traj = Trajectory::from_rows(
            vec![0.0, 1.0],
            &[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
        )
        .unwrap();

        assert_eq!(traj.n_states(), 3);
        assert_eq!(traj.observed(&[2, 0]), array![[3.0, 6.0], [1.0, 4.0]]);
        assert_eq!(traj.last_state().unwrap(), array![4.0, 5.0, 6.0]);

        let tail = traj.drop_leading(1);
        assert_eq!(tail.times(), &[1.0]);
        assert_eq!(tail.states(), &array![[4.0, 5.0, 6.0]]);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(Trajectory::from_rows(vec![0.0, 1.0], &[vec![1.0], vec![1.0, 2.0]]).is_none());
        assert!(Trajectory::from_rows(vec![0.0], &[vec![1.0], vec![2.0]]).is_none());
    }
}

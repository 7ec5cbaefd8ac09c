//! Observations
//!
//! An [`Observation`] is the immutable input of an estimation run: a time grid, a value
//! matrix with one row per observed metabolite and one column per time point, and the
//! state indices those rows correspond to. [`ObservationFile`] is its name-based,
//! serializable form.

use std::collections::{BTreeMap, HashSet};

use ndarray::Array2;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    parameters::{ParameterKey, ParameterSet},
    simulation::Pathway,
};

use super::error::ObservationError;

/// Observed time series aligned to a pathway's state vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    times: Vec<f64>,
    values: Array2<f64>,
    observable: Vec<usize>,
    true_parameters: Option<BTreeMap<String, f64>>,
}

impl Observation {
    /// Creates a validated observation.
    ///
    /// # Arguments
    ///
    /// * `times` - Non-empty, finite, non-negative and non-decreasing time grid
    /// * `values` - Observed values, `observable.len()` rows by `times.len()` columns
    /// * `observable` - Distinct state indices, one per row of `values`
    ///
    /// # Returns
    ///
    /// * `Result<Observation, ObservationError>` - The observation or the first problem found
    pub fn new(
        times: Vec<f64>,
        values: Array2<f64>,
        observable: Vec<usize>,
    ) -> Result<Self, ObservationError> {
        validate_times(&times)?;

        if observable.is_empty() {
            return Err(ObservationError::NoObservables);
        }

        let mut seen = HashSet::new();
        if let Some(dup) = observable.iter().find(|i| !seen.insert(**i)) {
            return Err(ObservationError::DuplicateObservable(*dup));
        }

        let expected = (observable.len(), times.len());
        if values.dim() != expected {
            return Err(ObservationError::ShapeMismatch {
                expected,
                found: values.dim(),
            });
        }

        if let Some(((row, col), _)) = values.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ObservationError::NonFiniteValue { row, col });
        }

        Ok(Self {
            times,
            values,
            observable,
            true_parameters: None,
        })
    }

    /// Attaches reference values used only for post-hoc error reporting.
    pub fn with_true_parameters(mut self, parameters: BTreeMap<String, f64>) -> Self {
        self.true_parameters = Some(parameters);
        self
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn observable(&self) -> &[usize] {
        &self.observable
    }

    pub fn true_parameters(&self) -> Option<&BTreeMap<String, f64>> {
        self.true_parameters.as_ref()
    }

    /// Number of observed data points (metabolites × time points)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Reference values of the given keys, if every one of them is known.
    pub fn true_values_of<K: ParameterKey>(&self, keys: &[K]) -> Option<Vec<f64>> {
        let truth = self.true_parameters.as_ref()?;
        keys.iter().map(|k| truth.get(k.name()).copied()).collect()
    }

    /// Checks that every observable index addresses a state of `P`.
    pub fn check_against<P: Pathway>(&self) -> Result<(), ObservationError> {
        let dimension = P::dimension();
        match self.observable.iter().find(|i| **i >= dimension) {
            Some(index) => Err(ObservationError::ObservableOutOfRange {
                index: *index,
                dimension,
            }),
            None => Ok(()),
        }
    }

    /// Converts into the name-based file form for pathway `P`.
    pub fn to_file<P: Pathway>(&self) -> ObservationFile {
        let metabolites = P::metabolites();
        ObservationFile {
            time: self.times.clone(),
            observables: self
                .observable
                .iter()
                .map(|i| metabolites.get(*i).copied().unwrap_or("?").to_string())
                .collect(),
            values: self.values.outer_iter().map(|row| row.to_vec()).collect(),
            true_parameters: self.true_parameters.clone(),
        }
    }
}

/// On-disk form of an [`Observation`], addressing metabolites by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ObservationFile {
    /// Time points of the measurements
    pub time: Vec<f64>,
    /// Observed metabolite names, one per row of `values`
    pub observables: Vec<String>,
    /// Observed concentrations, one row per observable, one column per time point
    pub values: Vec<Vec<f64>>,
    /// Reference parameter values for error reporting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub true_parameters: Option<BTreeMap<String, f64>>,
}

impl ObservationFile {
    /// Resolves metabolite names against pathway `P` and validates the result.
    pub fn into_observation<P: Pathway>(self) -> Result<Observation, ObservationError> {
        let observable = self
            .observables
            .iter()
            .map(|name| {
                P::index_of(name).ok_or_else(|| ObservationError::UnknownMetabolite {
                    name: name.clone(),
                    pathway: P::NAME.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let ncols = self.time.len();
        if self.values.iter().any(|row| row.len() != ncols) {
            return Err(ObservationError::RaggedValues);
        }

        let nrows = self.values.len();
        let flat = self.values.into_iter().flatten().collect::<Vec<_>>();
        let values = Array2::from_shape_vec((nrows, ncols), flat)
            .map_err(|_| ObservationError::RaggedValues)?;

        let observation = Observation::new(self.time, values, observable)?;

        match self.true_parameters {
            Some(truth) => {
                ParameterSet::<P::Param>::reference_with(&truth)?;
                Ok(observation.with_true_parameters(truth))
            }
            None => Ok(observation),
        }
    }
}

fn validate_times(times: &[f64]) -> Result<(), ObservationError> {
    if times.is_empty() {
        return Err(ObservationError::EmptyTimeGrid);
    }

    let mut previous = 0.0;
    for (index, value) in times.iter().copied().enumerate() {
        if !value.is_finite() || value < 0.0 || value < previous {
            return Err(ObservationError::InvalidTime { index, value });
        }
        previous = value;
    }

    Ok(())
}

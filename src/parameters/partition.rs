//! Free/fixed parameter partitions
//!
//! At estimation time the keys of a pathway are split into the *free* keys, whose values
//! the optimizer proposes as an ordered vector, and the *fixed* keys, held constant.
//! [`ParameterPartition::merge`] turns a candidate vector back into a full
//! [`ParameterSet`] the simulators can consume.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;

use super::{error::ParameterError, key::ParameterKey, set::ParameterSet};

/// Ordered free keys plus values for every remaining key.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterPartition<K: ParameterKey> {
    free: Vec<K>,
    base: ParameterSet<K>,
}

impl<K: ParameterKey> ParameterPartition<K> {
    /// Creates a partition from free names and an explicit fixed map.
    ///
    /// The two partitions must be disjoint and together cover every key of `K`.
    ///
    /// # Arguments
    ///
    /// * `free_names` - Ordered names of the parameters to estimate
    /// * `fixed` - Values for all other parameters
    ///
    /// # Returns
    ///
    /// * `Result<ParameterPartition<K>, ParameterError>` - The partition or the first
    ///   configuration problem found
    pub fn new<S: AsRef<str>>(
        free_names: &[S],
        fixed: &HashMap<String, f64>,
    ) -> Result<Self, ParameterError> {
        let free = K::parse_all(free_names)?;
        Self::check_free(&free)?;

        let free_set: HashSet<K> = free.iter().copied().collect();
        let mut overlap = Vec::new();
        let mut filled = fixed.clone();

        for name in fixed.keys().sorted() {
            let key: K = name.parse()?;
            if free_set.contains(&key) {
                overlap.push(name.clone());
            }
        }

        if !overlap.is_empty() {
            return Err(ParameterError::OverlappingPartitions { overlap });
        }

        // Free slots only need a placeholder until the first merge
        for key in &free {
            filled.insert(key.name().to_string(), key.literature_value());
        }

        let base = ParameterSet::from_map(&filled)?;
        Ok(Self { free, base })
    }

    /// Creates a partition whose fixed values are taken from `base`.
    ///
    /// The values of the free keys in `base` serve as their initial values.
    pub fn from_base(base: ParameterSet<K>, free: Vec<K>) -> Result<Self, ParameterError> {
        Self::check_free(&free)?;
        Ok(Self { free, base })
    }

    fn check_free(free: &[K]) -> Result<(), ParameterError> {
        if free.is_empty() {
            return Err(ParameterError::NoFreeParameters);
        }

        let duplicates = free
            .iter()
            .duplicates()
            .map(|k| k.name().to_string())
            .collect::<Vec<_>>();

        if !duplicates.is_empty() {
            return Err(ParameterError::DuplicateFreeParameters { duplicates });
        }

        Ok(())
    }

    /// Ordered free keys
    pub fn free(&self) -> &[K] {
        &self.free
    }

    /// Canonical names of the free keys, in order
    pub fn free_names(&self) -> Vec<String> {
        self.free.iter().map(|k| k.name().to_string()).collect()
    }

    /// Number of free parameters
    pub fn dimension(&self) -> usize {
        self.free.len()
    }

    /// Current base values of the free keys, in order.
    pub fn initial_values(&self) -> Vec<f64> {
        self.base.values_of(&self.free)
    }

    /// Fixed keys, in storage order.
    pub fn fixed(&self) -> impl Iterator<Item = (K, f64)> + '_ {
        self.base.iter().filter(|(k, _)| !self.free.contains(k))
    }

    /// Merges a candidate vector into the fixed values.
    ///
    /// # Arguments
    ///
    /// * `candidate` - Values of the free keys, in the partition's order
    ///
    /// # Returns
    ///
    /// * `Result<ParameterSet<K>, ParameterError>` - The full parameter set
    ///
    /// # Errors
    ///
    /// Returns an error if the candidate length does not match the number of free keys.
    pub fn merge(&self, candidate: &[f64]) -> Result<ParameterSet<K>, ParameterError> {
        if candidate.len() != self.free.len() {
            return Err(ParameterError::CandidateLengthError {
                expected: self.free.len(),
                found: candidate.len(),
            });
        }

        let mut values = self.base.raw().to_vec();
        for (key, value) in self.free.iter().zip(candidate) {
            values[key.index()] = *value;
        }

        Ok(ParameterSet::from_raw(values))
    }
}

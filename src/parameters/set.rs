//! Parameter sets
//!
//! A [`ParameterSet`] holds one value per key of a pathway's parameter enumeration.
//! It replaces free-form name→value dictionaries: a set built through
//! [`ParameterSet::from_map`] is guaranteed to contain exactly the names the rate laws
//! read, each with a finite, non-negative value.

use std::{
    collections::{BTreeMap, HashMap},
    marker::PhantomData,
    ops::Index,
};

use itertools::Itertools;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{error::ParameterError, key::ParameterKey};

/// A complete assignment of values to every key of `K`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet<K: ParameterKey> {
    values: Vec<f64>,
    _keys: PhantomData<K>,
}

impl<K: ParameterKey> ParameterSet<K> {
    /// Creates the set of literature reference values.
    pub fn literature() -> Self {
        Self {
            values: K::ALL.iter().map(|k| k.literature_value()).collect(),
            _keys: PhantomData,
        }
    }

    /// Builds a validated parameter set from a name→value map.
    ///
    /// # Arguments
    ///
    /// * `map` - Canonical parameter names mapped to their values
    ///
    /// # Returns
    ///
    /// * `Result<ParameterSet<K>, ParameterError>` - The parameter set or an error
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A name is not a key of `K`
    /// - A key of `K` has no value
    /// - A value is negative or not finite
    pub fn from_map(map: &HashMap<String, f64>) -> Result<Self, ParameterError> {
        let mut values: Vec<Option<f64>> = vec![None; K::count()];

        // Sorted so that the reported error does not depend on hash order
        for (name, value) in map.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
            let key: K = name.parse()?;
            validate_value(key, *value)?;
            values[key.index()] = Some(*value);
        }

        let missing = K::ALL
            .iter()
            .filter(|k| values[k.index()].is_none())
            .map(|k| k.name().to_string())
            .collect::<Vec<_>>();

        if !missing.is_empty() {
            return Err(ParameterError::MissingParameters { missing });
        }

        Ok(Self {
            values: values.into_iter().flatten().collect(),
            _keys: PhantomData,
        })
    }

    /// Overlays the literature values with the entries of a (possibly partial) map.
    ///
    /// Unknown names and invalid values are still rejected.
    pub fn literature_with(map: &HashMap<String, f64>) -> Result<Self, ParameterError> {
        let mut set = Self::literature();
        for (name, value) in map.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
            let key: K = name.parse()?;
            validate_value(key, *value)?;
            set.values[key.index()] = *value;
        }
        Ok(set)
    }

    /// Overlays the literature values with a reference table.
    ///
    /// Reference tables may list constants no rate law reads; those names are skipped with
    /// a warning. Values of known names are validated like [`ParameterSet::literature_with`].
    pub fn reference_with(map: &BTreeMap<String, f64>) -> Result<Self, ParameterError> {
        let mut set = Self::literature();
        for (name, value) in map {
            let Ok(key) = name.parse::<K>() else {
                warn!("Ignoring reference value {name}: not a rate-law parameter");
                continue;
            };
            validate_value(key, *value)?;
            set.values[key.index()] = *value;
        }
        Ok(set)
    }

    /// Creates a set from raw values in storage order without validation.
    ///
    /// Used for merged candidate vectors, which may carry any value the sampler produced.
    pub(crate) fn from_raw(values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), K::count());
        Self {
            values,
            _keys: PhantomData,
        }
    }

    pub fn get(&self, key: K) -> f64 {
        self.values[key.index()]
    }

    /// Sets a single value in place.
    pub fn set(&mut self, key: K, value: f64) {
        self.values[key.index()] = value;
    }

    /// Returns a copy with a single value replaced.
    pub fn with(mut self, key: K, value: f64) -> Self {
        self.set(key, value);
        self
    }

    /// Iterates over all (key, value) pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (K, f64)> + '_ {
        K::ALL.iter().map(move |k| (*k, self.values[k.index()]))
    }

    /// Values of the given keys, in the given order.
    pub fn values_of(&self, keys: &[K]) -> Vec<f64> {
        keys.iter().map(|k| self.get(*k)).collect()
    }

    /// Converts the set into a name→value map ordered by name.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.iter()
            .map(|(k, v)| (k.name().to_string(), v))
            .collect()
    }

    pub(crate) fn raw(&self) -> &[f64] {
        &self.values
    }
}

impl<K: ParameterKey> Default for ParameterSet<K> {
    fn default() -> Self {
        Self::literature()
    }
}

impl<K: ParameterKey> Index<K> for ParameterSet<K> {
    type Output = f64;

    fn index(&self, key: K) -> &Self::Output {
        &self.values[key.index()]
    }
}

impl<K: ParameterKey> TryFrom<&HashMap<String, f64>> for ParameterSet<K> {
    type Error = ParameterError;

    fn try_from(map: &HashMap<String, f64>) -> Result<Self, Self::Error> {
        Self::from_map(map)
    }
}

impl<K: ParameterKey> Serialize for ParameterSet<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

impl<'de, K: ParameterKey> Deserialize<'de> for ParameterSet<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = HashMap::<String, f64>::deserialize(deserializer)?;
        Self::from_map(&map).map_err(serde::de::Error::custom)
    }
}

/// Checks that a caller-supplied value is usable as a rate constant.
fn validate_value<K: ParameterKey>(key: K, value: f64) -> Result<(), ParameterError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ParameterError::InvalidValue {
            param: key.name().to_string(),
            value,
        });
    }
    Ok(())
}

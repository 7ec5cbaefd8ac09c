//! Parameter keys
//!
//! Every pathway owns a closed enumeration of the parameter names its rate laws read.
//! The enumerations are generated by [`parameter_enum!`](crate::parameter_enum) and
//! implement [`ParameterKey`], which is all the generic parameter machinery needs.

use std::{fmt::Debug, fmt::Display, hash::Hash, str::FromStr};

use serde::{de::DeserializeOwned, Serialize};

use super::error::ParameterError;

/// A closed, typed set of parameter names belonging to one pathway.
///
/// Implementors are plain field-less enums. The position of a key inside [`ParameterKey::ALL`]
/// equals [`ParameterKey::index`], so values can be stored densely.
pub trait ParameterKey:
    Copy
    + Eq
    + Hash
    + Ord
    + Debug
    + Display
    + FromStr<Err = ParameterError>
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// All keys in storage order
    const ALL: &'static [Self];

    /// Canonical name, e.g. `"HXK_Vmax"`
    fn name(self) -> &'static str;

    /// Literature reference value
    fn literature_value(self) -> f64;

    /// Position of this key in [`ParameterKey::ALL`]
    fn index(self) -> usize;

    /// Number of keys in the enumeration
    fn count() -> usize {
        Self::ALL.len()
    }

    /// Parses a list of canonical names, failing on the first unknown one.
    ///
    /// # Arguments
    ///
    /// * `names` - Canonical parameter names
    ///
    /// # Returns
    ///
    /// * `Result<Vec<Self>, ParameterError>` - The keys in the given order
    fn parse_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<Self>, ParameterError> {
        names.iter().map(|n| n.as_ref().parse()).collect()
    }
}

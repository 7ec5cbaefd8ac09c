//! Run configuration
//!
//! [`McemConfig`] carries everything a single MCEM chain needs besides the objective and
//! the initial guess. [`ModePreset`] names the iteration/sample budgets offered to users;
//! the optimizer itself only ever sees the two integers.

use std::{collections::HashMap, fmt::Display, str::FromStr};

use derive_builder::Builder;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::error::McemError;

/// Configuration of one MCEM run
///
/// # Fields
///
/// * `max_iters` - Maximum number of EM iterations, at least 1 (default: 150)
/// * `inner_samples` - Metropolis samples per iteration, at least 1 (default: 1500)
/// * `positive_only` - Sample from a log-normal proposal (default: true)
/// * `threshold` - L1 distance between consecutive means that ends the run (default: 1e-10)
/// * `seed` - Seed of the pseudo-random stream (default: 42)
/// * `min_relative_spread` - Lower bound of the proposal spread relative to |mean| (default: 0.0)
/// * `show_progress` - Draw a progress bar on stderr (default: false)
///
/// # Examples
///
/// ```
/// use metabolic_mcem::prelude::{McemConfigBuilder, ModePreset};
///
/// let config = McemConfigBuilder::default()
///     .preset(ModePreset::Fast)
///     .seed(7)
///     .build()
///     .unwrap();
/// assert_eq!(config.inner_samples, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize, JsonSchema)]
#[builder(build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct McemConfig {
    #[builder(default = "150")]
    pub max_iters: usize,
    #[builder(default = "1500")]
    pub inner_samples: usize,
    #[builder(default = "true")]
    pub positive_only: bool,
    #[builder(default = "1e-10")]
    pub threshold: f64,
    #[builder(default = "42")]
    pub seed: u64,
    #[builder(default = "0.0")]
    pub min_relative_spread: f64,
    #[builder(default = "false")]
    pub show_progress: bool,
}

impl Default for McemConfig {
    fn default() -> Self {
        ModePreset::Balanced.config()
    }
}

impl McemConfigBuilder {
    /// Sets the iteration and sample budget of a preset.
    pub fn preset(&mut self, preset: ModePreset) -> &mut Self {
        let (max_iters, inner_samples) = preset.settings();
        self.max_iters(max_iters).inner_samples(inner_samples)
    }

    fn validate(&self) -> Result<(), String> {
        if self.max_iters == Some(0) {
            return Err("max_iters must be at least 1".to_string());
        }
        if self.inner_samples == Some(0) {
            return Err("inner_samples must be at least 1".to_string());
        }
        if let Some(spread) = self.min_relative_spread {
            if !(spread.is_finite() && spread >= 0.0) {
                return Err(format!("min_relative_spread must be non-negative, got {spread}"));
            }
        }
        Ok(())
    }
}

impl McemConfig {
    /// Checks the preconditions the optimizer relies on.
    pub fn validate(&self) -> Result<(), McemError> {
        if self.max_iters == 0 {
            return Err(McemError::ZeroIterations);
        }
        if self.inner_samples == 0 {
            return Err(McemError::ZeroSamples);
        }
        if !(self.min_relative_spread.is_finite() && self.min_relative_spread >= 0.0) {
            return Err(McemError::InvalidConfig(format!(
                "min_relative_spread must be non-negative, got {}",
                self.min_relative_spread
            )));
        }
        if !(self.threshold.is_finite() && self.threshold >= 0.0) {
            return Err(McemError::InvalidConfig(format!(
                "threshold must be non-negative, got {}",
                self.threshold
            )));
        }
        Ok(())
    }

    /// Configuration of chain `index` in a multi-chain run.
    ///
    /// Chain `i` gets seed `seed + i` and `i + 1` times the iteration and sample budget.
    pub fn for_chain(&self, index: usize) -> Self {
        let scale = index + 1;
        Self {
            max_iters: self.max_iters * scale,
            inner_samples: self.inner_samples * scale,
            seed: self.seed.wrapping_add(index as u64),
            ..self.clone()
        }
    }
}

/// Named iteration/sample budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModePreset {
    Fast,
    #[default]
    Balanced,
    Precise,
    /// Small budget for smoke tests
    Test,
}

lazy_static::lazy_static! {
    static ref PRESET_NAMES: HashMap<&'static str, ModePreset> = {
        let mut m = HashMap::new();
        for preset in ModePreset::ALL {
            m.insert(preset.name(), preset);
        }
        m.insert("quick", ModePreset::Fast);
        m.insert("default", ModePreset::Balanced);
        m.insert("thorough", ModePreset::Precise);
        m
    };
}

impl ModePreset {
    pub const ALL: [ModePreset; 4] = [
        ModePreset::Fast,
        ModePreset::Balanced,
        ModePreset::Precise,
        ModePreset::Test,
    ];

    /// `(max_iters, inner_samples)` of the preset
    pub fn settings(self) -> (usize, usize) {
        match self {
            ModePreset::Fast => (100, 1000),
            ModePreset::Balanced => (150, 1500),
            ModePreset::Precise => (200, 2000),
            ModePreset::Test => (20, 500),
        }
    }

    /// Full configuration with the preset's budget and default everything else.
    pub fn config(self) -> McemConfig {
        let (max_iters, inner_samples) = self.settings();
        McemConfig {
            max_iters,
            inner_samples,
            positive_only: true,
            threshold: 1e-10,
            seed: 42,
            min_relative_spread: 0.0,
            show_progress: false,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ModePreset::Fast => "fast",
            ModePreset::Balanced => "balanced",
            ModePreset::Precise => "precise",
            ModePreset::Test => "test",
        }
    }
}

impl Display for ModePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ModePreset {
    type Err = McemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PRESET_NAMES
            .get(s.trim().to_lowercase().as_str())
            .copied()
            .ok_or_else(|| McemError::UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(ModePreset::Fast.settings(), (100, 1000));
        assert_eq!(ModePreset::Balanced.settings(), (150, 1500));
        assert_eq!(ModePreset::Precise.settings(), (200, 2000));
        assert_eq!(ModePreset::Test.settings(), (20, 500));
    }

    #[test]
    fn test_default_config_json() {
        let json = serde_json::to_string(&McemConfig::default()).unwrap();
        insta::assert_snapshot!(json, @r#"{"max_iters":150,"inner_samples":1500,"positive_only":true,"threshold":1e-10,"seed":42,"min_relative_spread":0.0,"show_progress":false}"#);
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("Precise".parse::<ModePreset>().unwrap(), ModePreset::Precise);
        assert_eq!(" quick ".parse::<ModePreset>().unwrap(), ModePreset::Fast);
        assert!(matches!(
            "slow".parse::<ModePreset>(),
            Err(McemError::UnknownPreset(_))
        ));

        for preset in ModePreset::ALL {
            assert_eq!(preset.to_string().parse::<ModePreset>().unwrap(), preset);
        }
    }

    #[test]
    fn test_builder_defaults_and_validation() {
        let config = McemConfigBuilder::default().build().unwrap();
        assert_eq!(config, McemConfig::default());
        assert!(config.positive_only);
        assert_eq!(config.threshold, 1e-10);

        assert!(McemConfigBuilder::default().max_iters(0).build().is_err());
        assert!(McemConfigBuilder::default().inner_samples(0).build().is_err());
    }

    #[test]
    fn test_chain_scaling() {
        let base = ModePreset::Test.config();
        let third = base.for_chain(2);
        assert_eq!(third.seed, 44);
        assert_eq!(third.max_iters, 60);
        assert_eq!(third.inner_samples, 1500);
    }

    #[test]
    fn test_partial_json_config() {
        let config: McemConfig = serde_json::from_str(r#"{"max_iters": 5, "seed": 1}"#).unwrap();
        assert_eq!(config.max_iters, 5);
        assert_eq!(config.inner_samples, 1500);
        assert!(config.positive_only);
    }
}

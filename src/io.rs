use std::{collections::HashMap, path::PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::{
    estimation::{EstimationReport, PathwayKind},
    mcem::{McemConfig, McemError},
    objective::{Observation, ObservationError, ObservationFile},
};

/// Loads and parses any JSON document from a file.
///
/// # Arguments
///
/// * `path` - Path to the JSON file
///
/// # Returns
///
/// Returns a `Result` containing either:
/// * `Ok(T)` - The parsed document
/// * `Err(IOError)` - An error that occurred during file reading or JSON parsing
pub fn load_json<T: DeserializeOwned>(path: impl Into<PathBuf>) -> Result<T, IOError> {
    let path = path.into();
    let file = std::fs::File::open(path).map_err(IOError::FileNotFound)?;
    serde_json::from_reader(file).map_err(IOError::JsonParseError)
}

/// Saves any serializable document as pretty-printed JSON.
pub fn save_json<T: Serialize>(path: impl Into<PathBuf>, doc: &T) -> Result<(), IOError> {
    let path = path.into();
    let file = std::fs::File::create(path).map_err(IOError::FileNotFound)?;
    serde_json::to_writer_pretty(file, doc).map_err(IOError::JsonParseError)
}

/// Loads an observation file and resolves it against a pathway.
///
/// # Errors
///
/// This function will return an error if:
/// * The file cannot be opened or parsed (`IOError::FileNotFound`, `IOError::JsonParseError`)
/// * A metabolite name is unknown, the grid is invalid or the value table is ragged
///   (`IOError::InvalidObservation`)
pub fn load_observation(
    path: impl Into<PathBuf>,
    kind: PathwayKind,
) -> Result<Observation, IOError> {
    let file: ObservationFile = load_json(path)?;
    Ok(kind.observation(file)?)
}

/// Loads a flat `{name: value}` parameter map.
pub fn load_parameters(path: impl Into<PathBuf>) -> Result<HashMap<String, f64>, IOError> {
    load_json(path)
}

/// Loads an MCEM configuration; missing fields take their defaults.
pub fn load_config(path: impl Into<PathBuf>) -> Result<McemConfig, IOError> {
    let config: McemConfig = load_json(path)?;
    config.validate()?;
    Ok(config)
}

pub fn save_report(path: impl Into<PathBuf>, report: &EstimationReport) -> Result<(), IOError> {
    save_json(path, report)
}

/// Represents errors that can occur while reading or writing estimation files.
#[derive(Error, Debug)]
pub enum IOError {
    /// The file could not be found, opened or created.
    #[error("File not found: {0}")]
    FileNotFound(#[from] std::io::Error),

    /// The file contents are not valid JSON for the expected document.
    #[error("Failed to parse JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Invalid observation: {0}")]
    InvalidObservation(#[from] ObservationError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] McemError),
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_observation_file_round_trip() {
        // ARRANGE
        let dir = tempdir().unwrap();
        let path = dir.path().join("obs.json");
        let file = ObservationFile {
            time: vec![0.0, 1.0],
            observables: vec!["CIT".to_string(), "OAA".to_string()],
            values: vec![vec![0.5, 0.6], vec![0.01, 0.02]],
            true_parameters: Some(BTreeMap::from([("CS_Vmax".to_string(), 90.0)])),
        };

        // ACT
        save_json(&path, &file).unwrap();
        let observation = load_observation(&path, PathwayKind::Tca).unwrap();

        // ASSERT
        assert_eq!(observation.observable(), &[2, 9]);
        assert_eq!(observation.true_parameters().unwrap()["CS_Vmax"], 90.0);
    }

    #[test]
    fn test_observation_with_wrong_pathway() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("obs.json");
        std::fs::write(
            &path,
            r#"{"time": [0.0, 1.0], "observables": ["CIT"], "values": [[0.5, 0.6]]}"#,
        )
        .unwrap();

        assert!(matches!(
            load_observation(&path, PathwayKind::Glycolysis),
            Err(IOError::InvalidObservation(_))
        ));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"max_iters": 7, "seed": 3}"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.max_iters, 7);
        assert_eq!(config.seed, 3);
        assert_eq!(config.inner_samples, McemConfig::default().inner_samples);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"inner_samples": 0}"#).unwrap();

        assert!(matches!(
            load_config(&path),
            Err(IOError::InvalidConfig(McemError::ZeroSamples))
        ));
    }

    #[test]
    fn test_missing_file_and_bad_json() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_parameters(dir.path().join("missing.json")),
            Err(IOError::FileNotFound(_))
        ));

        let path = dir.path().join("params.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            load_parameters(&path),
            Err(IOError::JsonParseError(_))
        ));
    }
}

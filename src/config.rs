//! The configuration surface consumed by the pipeline: the parameters file
//! and the filesystem layout of preprocessed data.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::AspicsError;
use crate::params::{CalibrationParams, DiseaseParams};

/// Filesystem layout for preprocessed study-area data. Passed explicitly to
/// the pipeline; there is no process-wide path state.
#[derive(Debug, Clone)]
pub struct PathConfig {
    processed_data_root: PathBuf,
}

impl PathConfig {
    pub fn new<P: Into<PathBuf>>(processed_data_root: P) -> PathConfig {
        PathConfig {
            processed_data_root: processed_data_root.into(),
        }
    }

    #[must_use]
    pub fn processed_data_root(&self) -> &Path {
        &self.processed_data_root
    }

    #[must_use]
    pub fn study_area_folder(&self, study_area: &str) -> PathBuf {
        self.processed_data_root.join(study_area)
    }

    /// The snapshot cache artifact for a study area. The filename is kept
    /// from the existing on-disk layout of study-area folders.
    #[must_use]
    pub fn snapshot_cache_path(&self, study_area: &str) -> PathBuf {
        self.study_area_folder(study_area)
            .join("snapshot")
            .join("cache.npz")
    }
}

/// The `simulation` section of the parameters file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationSettings {
    pub iterations: u32,
    pub repetitions: u32,
    pub output: bool,
    pub output_every_iteration: bool,
    pub study_area: String,
    pub use_lockdown: bool,
    pub use_gui: bool,
    pub use_gpu: bool,
    /// Day offset into the lockdown reference series that becomes day 0 of
    /// the simulation.
    pub start_date: usize,
    /// Stop after assembling the snapshot instead of running the model.
    pub initialise_only: bool,
}

impl SimulationSettings {
    /// Checks the range and flag-combination rules before assembly begins.
    ///
    /// # Errors
    /// `AspicsError::Config` naming the violated rule.
    pub fn validate(&self) -> Result<(), AspicsError> {
        if self.iterations < 1 {
            return Err(AspicsError::Config(
                "iterations must be at least 1; to only initialise the model, \
                 set initialise_only instead"
                    .to_string(),
            ));
        }
        if self.repetitions < 1 {
            return Err(AspicsError::Config(
                "repetitions must be at least 1".to_string(),
            ));
        }
        if !self.output && self.output_every_iteration {
            return Err(AspicsError::Config(
                "can't disable output while requesting output at every iteration".to_string(),
            ));
        }
        Ok(())
    }
}

/// The whole parameters file. Calibration and disease sections are optional;
/// composed parameters are applied only when both are present.
#[derive(Debug, Clone, Deserialize)]
pub struct ParametersFile {
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub calibration: Option<CalibrationParams>,
    #[serde(default)]
    pub disease: Option<DiseaseParams>,
}

impl ParametersFile {
    /// Loads and parses a parameters file.
    ///
    /// # Errors
    /// `AspicsError` when the file is unreadable or malformed.
    pub fn load(path: &Path) -> Result<ParametersFile, AspicsError> {
        let contents = fs::read_to_string(path)?;
        let parameters = serde_json::from_str(&contents)?;
        Ok(parameters)
    }
}

//! The top-level assembly pipeline: decide between reusing the snapshot
//! cache and regenerating from raw data, apply calibrated parameters, then
//! either stop after initialisation or hand the state to the engine.

use std::fs;
use std::path::Path;

use log::info;

use crate::cache::InitialisationCache;
use crate::config::{PathConfig, SimulationSettings};
use crate::convert::SnapshotConverter;
use crate::engine::{RunOptions, RunResult, SimulationEngine};
use crate::error::AspicsError;
use crate::lockdown::derive_time_activity_multipliers;
use crate::params::{CalibrationParams, DiseaseParams, Params};
use crate::snapshot::Snapshot;

/// Seed used for every run. Reproducibility across runs is a hard
/// requirement, so this is fixed policy, not an option.
pub const SNAPSHOT_PRNG_SEED: u64 = 42;

/// What assembly produced.
#[derive(Debug)]
pub enum AssemblyOutcome {
    /// Normal, non-error termination: `initialise_only` was set, so the
    /// snapshot was built (and cached) but nothing is to be executed.
    InitialisedOnly,
    Assembled(Box<Snapshot>),
}

/// Coordinates snapshot assembly for one study area at a time. Owns the
/// snapshot exclusively for the whole assembly sequence, then transfers it
/// to the engine.
pub struct SnapshotPipeline<C: SnapshotConverter> {
    paths: PathConfig,
    converter: C,
}

impl<C: SnapshotConverter> SnapshotPipeline<C> {
    pub fn new(paths: PathConfig, converter: C) -> SnapshotPipeline<C> {
        SnapshotPipeline { paths, converter }
    }

    /// Assembles a ready-to-run snapshot: loads it from the snapshot cache
    /// when one exists, otherwise regenerates it from the raw-data cache and
    /// persists it for future runs. Either way the result is reseeded and,
    /// when both parameter sections are supplied, gets the composed
    /// parameters applied.
    ///
    /// # Errors
    /// `AspicsError::Config` for a missing processed-data root, missing
    /// study-area folder, empty raw-data cache, or out-of-range start date;
    /// I/O and collaborator errors are propagated unchanged. All errors are
    /// fatal; nothing is retried.
    pub fn assemble(
        &self,
        settings: &SimulationSettings,
        calibration: Option<&CalibrationParams>,
        disease: Option<&DiseaseParams>,
    ) -> Result<AssemblyOutcome, AspicsError> {
        settings.validate()?;
        self.check_data_folders(settings)?;

        let cache_path = self.paths.snapshot_cache_path(&settings.study_area);
        let mut snapshot = if cache_path.exists() {
            info!("loading cached snapshot from {}", cache_path.display());
            Snapshot::load_full(&cache_path)?
        } else {
            self.generate_and_persist(settings, &cache_path)?
        };

        snapshot.seed_prngs(SNAPSHOT_PRNG_SEED);

        if let (Some(calibration), Some(disease)) = (calibration, disease) {
            snapshot.update_params(Params::new(calibration, disease));
            if disease.improve_health {
                info!("switching to healthier population");
                snapshot.switch_to_healthier_population();
            }
        }

        if settings.initialise_only {
            info!("finished initialising the model; initialise_only is set, not running it");
            return Ok(AssemblyOutcome::InitialisedOnly);
        }
        Ok(AssemblyOutcome::Assembled(Box::new(snapshot)))
    }

    /// Assembles and, unless assembly stopped after initialisation, runs the
    /// model on the given engine. Returns `None` for the initialise-only
    /// path.
    ///
    /// # Errors
    /// Everything [`SnapshotPipeline::assemble`] reports, plus engine
    /// failures.
    pub fn run<E: SimulationEngine>(
        &self,
        engine: &mut E,
        settings: &SimulationSettings,
        calibration: Option<&CalibrationParams>,
        disease: Option<&DiseaseParams>,
        parameters_file: &Path,
    ) -> Result<Option<RunResult>, AspicsError> {
        let mut snapshot = match self.assemble(settings, calibration, disease)? {
            AssemblyOutcome::InitialisedOnly => return Ok(None),
            AssemblyOutcome::Assembled(snapshot) => snapshot,
        };

        let mode = if settings.use_gui { "GUI" } else { "headless" };
        info!("running model in {mode} mode");
        let options = RunOptions {
            study_area: settings.study_area.clone(),
            parameters_file: parameters_file.to_path_buf(),
            iterations: settings.iterations,
            use_gui: settings.use_gui,
            use_gpu: settings.use_gpu,
            quiet: false,
        };
        engine.run(&mut snapshot, &options).map(Some)
    }

    fn check_data_folders(&self, settings: &SimulationSettings) -> Result<(), AspicsError> {
        let root = self.paths.processed_data_root();
        if !root.exists() {
            return Err(AspicsError::Config(format!(
                "processed data folder {} does not exist; make sure you are \
                 running from the correct working directory",
                root.display()
            )));
        }
        let study_area_folder = self.paths.study_area_folder(&settings.study_area);
        if !study_area_folder.exists() {
            return Err(AspicsError::Config(format!(
                "study area folder {} doesn't exist; check the spelling or the location",
                study_area_folder.display()
            )));
        }
        Ok(())
    }

    fn generate_and_persist(
        &self,
        settings: &SimulationSettings,
        cache_path: &Path,
    ) -> Result<Snapshot, AspicsError> {
        info!("generating snapshot for {}", settings.study_area);
        let study_area_folder = self.paths.study_area_folder(&settings.study_area);
        let cache = InitialisationCache::new(&study_area_folder);
        if cache.is_empty() {
            return Err(AspicsError::Config(format!(
                "the initialisation cache for study area {} is empty; \
                 run the initialisation step first",
                settings.study_area
            )));
        }

        info!("loading data from previous cache");
        let (individuals, activity_locations, lockdown) = cache.read_from_cache()?;

        if settings.use_lockdown {
            info!("loading the lockdown scenario");
        }
        let multipliers = derive_time_activity_multipliers(
            settings.use_lockdown,
            settings.start_date,
            &lockdown,
        )?;

        let snapshot =
            self.converter
                .generate_snapshot(&individuals, &activity_locations, multipliers)?;

        // Snapshot folder may not exist yet on the very first run.
        fs::create_dir_all(cache_path.parent().expect("cache path has a parent"))?;
        snapshot.save(cache_path)?;
        Ok(snapshot)
    }
}

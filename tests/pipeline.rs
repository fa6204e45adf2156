//! End-to-end assembly tests over temporary study-area folders, with
//! recording collaborators to observe the cache decisions.

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use assert_approx_eq::assert_approx_eq;
use tempfile::tempdir;

use aspics::cache::InitialisationCache;
use aspics::config::{PathConfig, SimulationSettings};
use aspics::convert::{DefaultConverter, SnapshotConverter};
use aspics::engine::{RunOptions, RunResult, SimulationEngine};
use aspics::error::AspicsError;
use aspics::lockdown::{LockdownTimeSeries, TimeActivityMultipliers};
use aspics::params::{CalibrationParams, DiseaseParams};
use aspics::pipeline::{AssemblyOutcome, SnapshotPipeline};
use aspics::population::{Activity, ActivityLocation, Individual};
use aspics::snapshot::{HealthVariant, Snapshot};

const STUDY_AREA: &str = "test-area";

/// Counts conversions so tests can assert the cache-hit short circuit. The
/// counter is shared because the pipeline takes the converter by value.
#[derive(Default)]
struct RecordingConverter {
    calls: Rc<Cell<usize>>,
}

impl RecordingConverter {
    fn with_counter() -> (RecordingConverter, Rc<Cell<usize>>) {
        let converter = RecordingConverter::default();
        let counter = Rc::clone(&converter.calls);
        (converter, counter)
    }
}

impl SnapshotConverter for RecordingConverter {
    fn generate_snapshot(
        &self,
        individuals: &[Individual],
        activity_locations: &[ActivityLocation],
        time_activity_multipliers: TimeActivityMultipliers,
    ) -> Result<Snapshot, AspicsError> {
        self.calls.set(self.calls.get() + 1);
        DefaultConverter.generate_snapshot(individuals, activity_locations, time_activity_multipliers)
    }
}

#[derive(Default)]
struct RecordingEngine {
    calls: usize,
}

impl SimulationEngine for RecordingEngine {
    fn run(
        &mut self,
        _snapshot: &mut Snapshot,
        options: &RunOptions,
    ) -> Result<RunResult, AspicsError> {
        self.calls += 1;
        Ok(RunResult {
            iterations_completed: options.iterations,
        })
    }
}

fn settings() -> SimulationSettings {
    SimulationSettings {
        iterations: 10,
        repetitions: 1,
        output: true,
        output_every_iteration: false,
        study_area: STUDY_AREA.to_string(),
        use_lockdown: false,
        use_gui: false,
        use_gpu: false,
        start_date: 0,
        initialise_only: false,
    }
}

fn calibration() -> CalibrationParams {
    serde_json::from_str(
        r#"{"hazard_location_multipliers": {
            "Retail": 2.0, "Nightclubs": 1.5,
            "PrimarySchool": 0.8, "SecondarySchool": 0.9,
            "Home": 1.0, "Work": 1.2
        }}"#,
    )
    .unwrap()
}

fn disease(improve_health: bool) -> DiseaseParams {
    serde_json::from_str(&format!(
        r#"{{"current_risk_beta": 0.5,
            "presymptomatic": 0.7, "asymptomatic": 0.3, "symptomatic": 1.0,
            "overweight": 1.1, "obesity_30": 1.2, "obesity_35": 1.4, "obesity_40": 1.9,
            "cvd": 1.05, "diabetes": 1.15, "bloodpressure": 1.25,
            "improve_health": {improve_health}}}"#
    ))
    .unwrap()
}

/// Populates the raw-data cache for `STUDY_AREA` under `root`.
fn write_raw_cache(root: &Path) {
    let individuals = vec![
        Individual {
            age: 34,
            obesity: 2,
            cvd: 0,
            diabetes: 0,
            blood_pressure: 1,
            place_ids: vec![0, 1],
            baseline_flows: vec![0.7, 0.3],
        },
        Individual {
            age: 70,
            obesity: 0,
            cvd: 1,
            diabetes: 1,
            blood_pressure: 0,
            place_ids: vec![0],
            baseline_flows: vec![1.0],
        },
    ];
    let locations = vec![
        ActivityLocation {
            activity: Activity::Home,
            lat: 53.8,
            lon: -1.55,
        },
        ActivityLocation {
            activity: Activity::Work,
            lat: 53.79,
            lon: -1.54,
        },
    ];
    let lockdown = LockdownTimeSeries {
        change: vec![1.0, 1.0, 0.5, 0.5, 1.0],
    };
    InitialisationCache::new(root.join(STUDY_AREA))
        .write_to_cache(&individuals, &locations, &lockdown)
        .unwrap();
}

fn assembled(outcome: AssemblyOutcome) -> Box<Snapshot> {
    match outcome {
        AssemblyOutcome::Assembled(snapshot) => snapshot,
        AssemblyOutcome::InitialisedOnly => panic!("expected an assembled snapshot"),
    }
}

#[test]
fn cache_miss_generates_persists_and_later_hits() {
    let temp_dir = tempdir().unwrap();
    write_raw_cache(temp_dir.path());
    let (converter, conversions) = RecordingConverter::with_counter();
    let pipeline = SnapshotPipeline::new(PathConfig::new(temp_dir.path()), converter);
    let cache_path = temp_dir
        .path()
        .join(STUDY_AREA)
        .join("snapshot")
        .join("cache.npz");

    let first = assembled(pipeline.assemble(&settings(), None, None).unwrap());
    assert!(cache_path.exists());
    assert_eq!(first.npeople, 2);
    assert_eq!(conversions.get(), 1);

    // The second assembly loads the persisted snapshot instead of converting.
    let second = assembled(pipeline.assemble(&settings(), None, None).unwrap());
    assert_eq!(second, first);
    assert_eq!(conversions.get(), 1);
}

#[test]
fn empty_raw_cache_is_fatal_before_any_conversion() {
    let temp_dir = tempdir().unwrap();
    std::fs::create_dir_all(temp_dir.path().join(STUDY_AREA)).unwrap();
    let (converter, conversions) = RecordingConverter::with_counter();
    let pipeline = SnapshotPipeline::new(PathConfig::new(temp_dir.path()), converter);

    let result = pipeline.assemble(&settings(), None, None);
    assert!(matches!(result, Err(AspicsError::Config(_))));
    assert_eq!(conversions.get(), 0);
}

#[test]
fn missing_study_area_folder_is_fatal() {
    let temp_dir = tempdir().unwrap();
    let pipeline = SnapshotPipeline::new(PathConfig::new(temp_dir.path()), DefaultConverter);

    let result = pipeline.assemble(&settings(), None, None);
    match result {
        Err(AspicsError::Config(message)) => assert!(message.contains(STUDY_AREA)),
        other => panic!("expected a config error, got {other:?}"),
    }
}

#[test]
fn missing_processed_data_root_is_fatal() {
    let temp_dir = tempdir().unwrap();
    let pipeline = SnapshotPipeline::new(
        PathConfig::new(temp_dir.path().join("not-there")),
        DefaultConverter,
    );

    assert!(pipeline.assemble(&settings(), None, None).is_err());
}

#[test]
fn out_of_range_start_date_fails_assembly() {
    let temp_dir = tempdir().unwrap();
    write_raw_cache(temp_dir.path());
    let pipeline = SnapshotPipeline::new(PathConfig::new(temp_dir.path()), DefaultConverter);

    let mut lockdown_settings = settings();
    lockdown_settings.use_lockdown = true;
    lockdown_settings.start_date = 100;

    let result = pipeline.assemble(&lockdown_settings, None, None);
    assert!(matches!(result, Err(AspicsError::Config(_))));
}

#[test]
fn lockdown_series_is_sliced_into_the_snapshot() {
    let temp_dir = tempdir().unwrap();
    write_raw_cache(temp_dir.path());
    let pipeline = SnapshotPipeline::new(PathConfig::new(temp_dir.path()), DefaultConverter);

    let mut lockdown_settings = settings();
    lockdown_settings.use_lockdown = true;
    lockdown_settings.start_date = 2;
    lockdown_settings.iterations = 3;

    let snapshot = assembled(pipeline.assemble(&lockdown_settings, None, None).unwrap());
    assert_eq!(snapshot.time_activity_multipliers.as_slice(), &[0.5, 0.5, 1.0]);
}

#[test]
fn composed_params_and_healthier_variant_are_applied() {
    let temp_dir = tempdir().unwrap();
    write_raw_cache(temp_dir.path());
    let pipeline = SnapshotPipeline::new(PathConfig::new(temp_dir.path()), DefaultConverter);

    let snapshot = assembled(
        pipeline
            .assemble(&settings(), Some(&calibration()), Some(&disease(true)))
            .unwrap(),
    );

    assert_approx_eq!(snapshot.params.location_hazard_multipliers.retail, 1.0);
    assert_eq!(snapshot.params.individual_hazard_multipliers.symptomatic, 1.0);
    assert_eq!(snapshot.health_variant(), HealthVariant::Healthier);
    // Obesity derived from baseline: tiers 2 and 0 drop to 1 and 0.
    assert_eq!(snapshot.people_obesity, vec![1, 0]);
}

#[test]
fn params_left_as_placeholder_when_sections_missing() {
    let temp_dir = tempdir().unwrap();
    write_raw_cache(temp_dir.path());
    let pipeline = SnapshotPipeline::new(PathConfig::new(temp_dir.path()), DefaultConverter);

    let snapshot = assembled(
        pipeline
            .assemble(&settings(), Some(&calibration()), None)
            .unwrap(),
    );
    assert_eq!(snapshot.health_variant(), HealthVariant::Baseline);
    assert_eq!(snapshot.params.cvd_multiplier, 1.0);
}

#[test]
fn seeding_is_reproducible_across_assemblies() {
    let temp_dir = tempdir().unwrap();
    write_raw_cache(temp_dir.path());
    let pipeline = SnapshotPipeline::new(PathConfig::new(temp_dir.path()), DefaultConverter);

    let first = assembled(pipeline.assemble(&settings(), None, None).unwrap());
    let second = assembled(pipeline.assemble(&settings(), None, None).unwrap());
    assert_eq!(first.people_prngs, second.people_prngs);
}

#[test]
fn initialise_only_returns_early_without_the_engine() {
    let temp_dir = tempdir().unwrap();
    write_raw_cache(temp_dir.path());
    let pipeline = SnapshotPipeline::new(PathConfig::new(temp_dir.path()), DefaultConverter);

    let mut init_settings = settings();
    init_settings.initialise_only = true;

    let mut engine = RecordingEngine::default();
    let result = pipeline
        .run(
            &mut engine,
            &init_settings,
            None,
            None,
            Path::new("parameters.json"),
        )
        .unwrap();

    assert!(result.is_none());
    assert_eq!(engine.calls, 0);
    // The snapshot was still built and cached.
    assert!(temp_dir
        .path()
        .join(STUDY_AREA)
        .join("snapshot")
        .join("cache.npz")
        .exists());
}

#[test]
fn full_run_hands_the_snapshot_to_the_engine() {
    let temp_dir = tempdir().unwrap();
    write_raw_cache(temp_dir.path());
    let pipeline = SnapshotPipeline::new(PathConfig::new(temp_dir.path()), DefaultConverter);

    let mut engine = RecordingEngine::default();
    let result = pipeline
        .run(
            &mut engine,
            &settings(),
            None,
            None,
            Path::new("parameters.json"),
        )
        .unwrap();

    assert_eq!(engine.calls, 1);
    assert_eq!(
        result,
        Some(RunResult {
            iterations_completed: 10
        })
    );
}

//! Assembly of ready-to-run simulation state for an agent-based epidemic
//! model.
//!
//! Starting a run means producing a "snapshot": the population, its activity
//! locations, per-day behavioral multipliers and calibrated hazard
//! parameters, packed into the flat buffers the execution kernels consume.
//! Building one from raw data is expensive, so this crate caches the result
//! per study area and decides on each run between reusing the cache and
//! regenerating.
//!
//! The pieces, bottom up:
//! * [`params`] composes the calibrated hazard-multiplier set from the raw
//!   calibration and disease configuration.
//! * [`lockdown`] derives the per-day time-activity multiplier series,
//!   either a flat baseline or a lockdown scenario aligned to a start date.
//! * [`cache`] reads and writes the raw-data initialisation cache produced
//!   by the upstream preprocessing step.
//! * [`convert`] and [`engine`] are the two external seams: building a
//!   snapshot from raw data, and executing an assembled one.
//! * [`pipeline`] ties it together: cache decision, parameter application,
//!   deterministic reseeding, and the initialise-only early exit.

pub mod cache;
pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod lockdown;
pub mod params;
pub mod pipeline;
pub mod population;
pub mod snapshot;

pub use config::{ParametersFile, PathConfig, SimulationSettings};
pub use error::AspicsError;
pub use lockdown::{
    derive_time_activity_multipliers, TimeActivityMultipliers, BASELINE_MULTIPLIER_DAYS,
};
pub use params::Params;
pub use pipeline::{AssemblyOutcome, SnapshotPipeline, SNAPSHOT_PRNG_SEED};
pub use snapshot::{HealthVariant, Snapshot};

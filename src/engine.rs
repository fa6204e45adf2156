//! The execution-engine seam. The pipeline hands a fully assembled snapshot
//! to whichever [`SimulationEngine`] it was constructed with; the
//! transmission kernels themselves live behind this trait.

use std::path::PathBuf;

use log::{debug, info};

use crate::error::AspicsError;
use crate::snapshot::Snapshot;

/// Run-mode flags and context passed through to the engine.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub study_area: String,
    pub parameters_file: PathBuf,
    pub iterations: u32,
    pub use_gui: bool,
    pub use_gpu: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub iterations_completed: u32,
}

/// Consumes an assembled snapshot and runs the model.
pub trait SimulationEngine {
    /// # Errors
    /// Engine failures surface as `AspicsError::Upstream`.
    fn run(
        &mut self,
        snapshot: &mut Snapshot,
        options: &RunOptions,
    ) -> Result<RunResult, AspicsError>;
}

/// Minimal CPU engine: advances the simulation clock day by day and checks
/// the time-activity series covers the whole run. Accelerated (GPU) and GUI
/// execution are provided by separate engines and rejected here.
#[derive(Debug, Default)]
pub struct HeadlessEngine;

impl SimulationEngine for HeadlessEngine {
    fn run(
        &mut self,
        snapshot: &mut Snapshot,
        options: &RunOptions,
    ) -> Result<RunResult, AspicsError> {
        if options.use_gpu {
            return Err(AspicsError::Upstream(
                "GPU execution requested, but no accelerated engine is available".to_string(),
            ));
        }
        if options.use_gui {
            return Err(AspicsError::Upstream(
                "GUI execution requested, but no GUI engine is available".to_string(),
            ));
        }

        let covered = snapshot.time_activity_multipliers.len();
        if (options.iterations as usize) > covered {
            return Err(AspicsError::Config(format!(
                "the time-activity multiplier series covers {covered} days, but \
                 {} iterations were requested",
                options.iterations
            )));
        }

        for day in 0..options.iterations {
            // Coverage was checked above.
            let multiplier = snapshot
                .time_activity_multipliers
                .day(day as usize)
                .expect("multiplier series covers the run");
            debug!(
                "day {day} of {} ({}): activity multiplier {multiplier}",
                options.iterations, options.study_area
            );
        }

        if !options.quiet {
            info!(
                "completed {} iterations for {} ({} people, {} places)",
                options.iterations, options.study_area, snapshot.npeople, snapshot.nplaces
            );
        }
        Ok(RunResult {
            iterations_completed: options.iterations,
        })
    }
}

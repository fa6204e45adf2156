//! Derivation of the per-day time-activity multiplier series that scales
//! attendance at activity locations, either as a flat baseline or from a
//! lockdown scenario aligned to the configured start date.

use serde::{Deserialize, Serialize};

use crate::error::AspicsError;

/// Length of the baseline (no-lockdown) multiplier series. Named rather than
/// inlined because reproducibility tests depend on it.
pub const BASELINE_MULTIPLIER_DAYS: usize = 2000;

/// Behavioral suppression factors over calendar time, independent of the
/// simulation start date. Produced by upstream preprocessing and stored in
/// the initialisation cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockdownTimeSeries {
    pub change: Vec<f32>,
}

/// Per-simulation-day attendance scaling factors, indexed from day 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeActivityMultipliers(Vec<f32>);

impl TimeActivityMultipliers {
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The multiplier for a given simulation day, if the series covers it.
    #[must_use]
    pub fn day(&self, day: usize) -> Option<f32> {
        self.0.get(day).copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

/// Derives the time-activity multiplier series for a run.
///
/// Without a lockdown scenario this is [`BASELINE_MULTIPLIER_DAYS`] days of
/// 1.0 (no suppression). With one, the reference series is sliced from
/// `start_date` to its end and reindexed so that day 0 of the simulation is
/// the configured start date.
///
/// # Errors
/// `AspicsError::Config` if `start_date` lies beyond the reference series;
/// an empty schedule is never returned silently.
pub fn derive_time_activity_multipliers(
    use_lockdown: bool,
    start_date: usize,
    lockdown: &LockdownTimeSeries,
) -> Result<TimeActivityMultipliers, AspicsError> {
    if !use_lockdown {
        return Ok(TimeActivityMultipliers(vec![1.0; BASELINE_MULTIPLIER_DAYS]));
    }

    if start_date >= lockdown.change.len() {
        return Err(AspicsError::Config(format!(
            "start date (day {start_date}) is beyond the lockdown reference series, \
             which covers {} days",
            lockdown.change.len()
        )));
    }

    Ok(TimeActivityMultipliers(lockdown.change[start_date..].to_vec()))
}

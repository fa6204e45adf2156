//! The assembled simulation state: flat per-person and per-place buffers in
//! the layout the execution kernels consume, plus the applied parameter set.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::AspicsError;
use crate::lockdown::TimeActivityMultipliers;
use crate::params::Params;
use crate::population::Activity;

/// Which population variant the snapshot currently holds. The healthier
/// variant is a one-shot transition, never an additive edit, so re-applying
/// it cannot double-apply the transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthVariant {
    Baseline,
    Healthier,
}

/// A ready-to-run simulation state.
///
/// People buffers are indexed by person; `place_ids` and `baseline_flows`
/// are flattened to `npeople * nslots`, padded with [`Snapshot::SENTINEL_PLACE`]
/// and 0.0 flow for people with fewer assignments. Each person carries a
/// 4-word PRNG state, filled by [`Snapshot::seed_prngs`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub nplaces: u32,
    pub npeople: u32,
    pub nslots: u32,
    pub time_activity_multipliers: TimeActivityMultipliers,
    pub place_activities: Vec<Activity>,
    /// Interleaved (lat, lon) per place.
    pub place_coords: Vec<f32>,
    pub people_ages: Vec<u16>,
    pub people_obesity: Vec<u16>,
    pub people_cvd: Vec<u8>,
    pub people_diabetes: Vec<u8>,
    pub people_blood_pressure: Vec<u8>,
    pub people_place_ids: Vec<u32>,
    pub people_baseline_flows: Vec<f32>,
    pub people_prngs: Vec<[u32; 4]>,
    pub params: Params,
    /// Obesity tiers as preprocessed, retained so the healthier-population
    /// switch is derived rather than applied in place.
    baseline_obesity: Vec<u16>,
    health_variant: HealthVariant,
}

impl Snapshot {
    /// Slot padding value for people with fewer activity assignments than
    /// `nslots`.
    pub const SENTINEL_PLACE: u32 = u32::MAX;

    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        nplaces: u32,
        npeople: u32,
        nslots: u32,
        time_activity_multipliers: TimeActivityMultipliers,
        place_activities: Vec<Activity>,
        place_coords: Vec<f32>,
        people_ages: Vec<u16>,
        people_obesity: Vec<u16>,
        people_cvd: Vec<u8>,
        people_diabetes: Vec<u8>,
        people_blood_pressure: Vec<u8>,
        people_place_ids: Vec<u32>,
        people_baseline_flows: Vec<f32>,
    ) -> Snapshot {
        let baseline_obesity = people_obesity.clone();
        Snapshot {
            nplaces,
            npeople,
            nslots,
            time_activity_multipliers,
            place_activities,
            place_coords,
            people_ages,
            people_obesity,
            people_cvd,
            people_diabetes,
            people_blood_pressure,
            people_place_ids,
            people_baseline_flows,
            people_prngs: vec![[0; 4]; npeople as usize],
            params: Params::default(),
            baseline_obesity,
            health_variant: HealthVariant::Baseline,
        }
    }

    /// Fills every person's PRNG state from a single seed. Reseeding with
    /// the same value reproduces the same states bit for bit.
    pub fn seed_prngs(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        for state in &mut self.people_prngs {
            for word in state.iter_mut() {
                *word = rng.random();
            }
        }
    }

    /// Replaces the placeholder parameters with the composed set.
    pub fn update_params(&mut self, params: Params) {
        self.params = params;
    }

    /// Switches to the healthier population: everyone drops one obesity
    /// tier relative to the preprocessed baseline. Idempotent; a snapshot
    /// already holding the healthier variant is left untouched.
    pub fn switch_to_healthier_population(&mut self) {
        if self.health_variant == HealthVariant::Healthier {
            return;
        }
        self.health_variant = HealthVariant::Healthier;
        self.people_obesity = self
            .baseline_obesity
            .iter()
            .map(|&tier| tier.saturating_sub(1))
            .collect();
    }

    #[must_use]
    pub fn health_variant(&self) -> HealthVariant {
        self.health_variant
    }

    /// Persists the snapshot to the cache artifact at `path`.
    ///
    /// # Errors
    /// `AspicsError` on file creation or encoding failure.
    pub fn save(&self, path: &Path) -> Result<(), AspicsError> {
        let mut writer = BufWriter::new(File::create(path)?);
        bincode::serde::encode_into_std_write(self, &mut writer, bincode::config::standard())?;
        Ok(())
    }

    /// Loads a previously persisted snapshot.
    ///
    /// # Errors
    /// `AspicsError` on file open or decoding failure.
    pub fn load_full(path: &Path) -> Result<Snapshot, AspicsError> {
        let mut reader = BufReader::new(File::open(path)?);
        let snapshot =
            bincode::serde::decode_from_std_read(&mut reader, bincode::config::standard())?;
        Ok(snapshot)
    }
}

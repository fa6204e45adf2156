//! Conversion of preprocessed population data into a snapshot. The pipeline
//! only depends on the [`SnapshotConverter`] trait; [`DefaultConverter`]
//! packs the cache rows into the flat buffer layout.

use crate::error::AspicsError;
use crate::lockdown::TimeActivityMultipliers;
use crate::population::{ActivityLocation, Individual};
use crate::snapshot::Snapshot;

/// Builds a fresh simulation state from raw population data. Invoked by the
/// pipeline only on a snapshot-cache miss.
pub trait SnapshotConverter {
    /// # Errors
    /// `AspicsError` when the population data is internally inconsistent.
    fn generate_snapshot(
        &self,
        individuals: &[Individual],
        activity_locations: &[ActivityLocation],
        time_activity_multipliers: TimeActivityMultipliers,
    ) -> Result<Snapshot, AspicsError>;
}

/// Straightforward buffer-packing conversion: one slot row per person, padded
/// to the widest assignment list, with parameters left at their placeholder
/// values until the pipeline applies the composed set.
#[derive(Debug, Default)]
pub struct DefaultConverter;

impl SnapshotConverter for DefaultConverter {
    fn generate_snapshot(
        &self,
        individuals: &[Individual],
        activity_locations: &[ActivityLocation],
        time_activity_multipliers: TimeActivityMultipliers,
    ) -> Result<Snapshot, AspicsError> {
        let nplaces = activity_locations.len() as u32;
        let npeople = individuals.len() as u32;
        let nslots = individuals
            .iter()
            .map(|person| person.place_ids.len())
            .max()
            .unwrap_or(0) as u32;

        let mut place_activities = Vec::with_capacity(activity_locations.len());
        let mut place_coords = Vec::with_capacity(activity_locations.len() * 2);
        for location in activity_locations {
            place_activities.push(location.activity);
            place_coords.push(location.lat);
            place_coords.push(location.lon);
        }

        let mut people_ages = Vec::with_capacity(individuals.len());
        let mut people_obesity = Vec::with_capacity(individuals.len());
        let mut people_cvd = Vec::with_capacity(individuals.len());
        let mut people_diabetes = Vec::with_capacity(individuals.len());
        let mut people_blood_pressure = Vec::with_capacity(individuals.len());
        let mut people_place_ids = Vec::with_capacity(individuals.len() * nslots as usize);
        let mut people_baseline_flows = Vec::with_capacity(individuals.len() * nslots as usize);

        for (index, person) in individuals.iter().enumerate() {
            if person.place_ids.len() != person.baseline_flows.len() {
                return Err(AspicsError::Config(format!(
                    "individual {index} has {} place assignments but {} baseline flows",
                    person.place_ids.len(),
                    person.baseline_flows.len()
                )));
            }
            if let Some(&bad) = person.place_ids.iter().find(|&&id| id >= nplaces) {
                return Err(AspicsError::Config(format!(
                    "individual {index} references place {bad}, but only {nplaces} \
                     activity locations exist"
                )));
            }

            people_ages.push(person.age);
            people_obesity.push(person.obesity);
            people_cvd.push(person.cvd);
            people_diabetes.push(person.diabetes);
            people_blood_pressure.push(person.blood_pressure);

            people_place_ids.extend_from_slice(&person.place_ids);
            people_baseline_flows.extend_from_slice(&person.baseline_flows);
            for _ in person.place_ids.len()..nslots as usize {
                people_place_ids.push(Snapshot::SENTINEL_PLACE);
                people_baseline_flows.push(0.0);
            }
        }

        Ok(Snapshot::new(
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
        ))
    }
}

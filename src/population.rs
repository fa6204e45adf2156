//! The typed rows stored in the raw-data initialisation cache: one record per
//! person and one per activity location, produced by the upstream
//! preprocessing step and consumed by snapshot conversion.

use serde::{Deserialize, Serialize};

/// The closed set of activity-location categories. Hazard calibration is
/// keyed by these categories, so adding one is a calibration-schema change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Activity {
    Retail,
    Nightclubs,
    PrimarySchool,
    SecondarySchool,
    Home,
    Work,
}

/// One person from the preprocessed population.
///
/// `place_ids` and `baseline_flows` are parallel: slot `i` says which place
/// the person visits and the baseline share of their time spent there.
/// Obesity is tiered: 0 = normal, 1 = overweight, 2..=4 = obesity tiers
/// (BMI 30/35/40). The remaining comorbidity fields are 0/1 indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub age: u16,
    pub obesity: u16,
    pub cvd: u8,
    pub diabetes: u8,
    pub blood_pressure: u8,
    pub place_ids: Vec<u32>,
    pub baseline_flows: Vec<f32>,
}

/// One venue people can attend, tagged with its activity category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLocation {
    pub activity: Activity,
    pub lat: f32,
    pub lon: f32,
}

//! Composition of calibrated hazard-multiplier parameters from the raw
//! calibration and disease sections of the parameters file.

use serde::{Deserialize, Serialize};

/// Raw per-location hazard multipliers as they appear in the calibration
/// section of the parameters file. Every category is required; a missing
/// category is a deserialization error, never a defaulted zero.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CalibrationParams {
    pub hazard_location_multipliers: HazardLocationInputs,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HazardLocationInputs {
    #[serde(rename = "Retail")]
    pub retail: f32,
    #[serde(rename = "Nightclubs")]
    pub nightclubs: f32,
    #[serde(rename = "PrimarySchool")]
    pub primary_school: f32,
    #[serde(rename = "SecondarySchool")]
    pub secondary_school: f32,
    #[serde(rename = "Home")]
    pub home: f32,
    #[serde(rename = "Work")]
    pub work: f32,
}

/// Scalar risk factors from the disease section of the parameters file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DiseaseParams {
    pub current_risk_beta: f32,
    pub presymptomatic: f32,
    pub asymptomatic: f32,
    pub symptomatic: f32,
    pub overweight: f32,
    pub obesity_30: f32,
    pub obesity_35: f32,
    pub obesity_40: f32,
    pub cvd: f32,
    pub diabetes: f32,
    pub bloodpressure: f32,
    pub improve_health: bool,
}

/// Per-location hazard weights with `current_risk_beta` already folded in,
/// so downstream hazard computation never re-applies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationHazardMultipliers {
    pub retail: f32,
    pub nightclubs: f32,
    pub primary_school: f32,
    pub secondary_school: f32,
    pub home: f32,
    pub work: f32,
}

/// Per-symptom-state hazard multipliers, carried verbatim (not pre-scaled).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualHazardMultipliers {
    pub presymptomatic: f32,
    pub asymptomatic: f32,
    pub symptomatic: f32,
}

/// The composed parameter set applied to a snapshot. Built once per run and
/// immutable afterwards.
///
/// `obesity_multipliers` is positional: overweight, then the BMI 30/35/40
/// obesity tiers. Downstream kernels index it by tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Params {
    pub location_hazard_multipliers: LocationHazardMultipliers,
    pub individual_hazard_multipliers: IndividualHazardMultipliers,
    pub obesity_multipliers: [f32; 4],
    pub cvd_multiplier: f32,
    pub diabetes_multiplier: f32,
    pub bloodpressure_multiplier: f32,
}

impl Params {
    /// Composes the calibrated parameter set. Pure and deterministic: the
    /// six location multipliers are scaled by `current_risk_beta` exactly
    /// once, the three symptom-state multipliers are copied unchanged.
    #[must_use]
    pub fn new(calibration: &CalibrationParams, disease: &DiseaseParams) -> Params {
        let beta = disease.current_risk_beta;
        let locations = &calibration.hazard_location_multipliers;

        Params {
            location_hazard_multipliers: LocationHazardMultipliers {
                retail: locations.retail * beta,
                nightclubs: locations.nightclubs * beta,
                primary_school: locations.primary_school * beta,
                secondary_school: locations.secondary_school * beta,
                home: locations.home * beta,
                work: locations.work * beta,
            },
            individual_hazard_multipliers: IndividualHazardMultipliers {
                presymptomatic: disease.presymptomatic,
                asymptomatic: disease.asymptomatic,
                symptomatic: disease.symptomatic,
            },
            obesity_multipliers: [
                disease.overweight,
                disease.obesity_30,
                disease.obesity_35,
                disease.obesity_40,
            ],
            cvd_multiplier: disease.cvd,
            diabetes_multiplier: disease.diabetes,
            bloodpressure_multiplier: disease.bloodpressure,
        }
    }
}

impl Default for Params {
    /// Neutral placeholder used by freshly converted snapshots before the
    /// calibrated set is applied. Every multiplier is 1.0.
    fn default() -> Self {
        Params {
            location_hazard_multipliers: LocationHazardMultipliers {
                retail: 1.0,
                nightclubs: 1.0,
                primary_school: 1.0,
                secondary_school: 1.0,
                home: 1.0,
                work: 1.0,
            },
            individual_hazard_multipliers: IndividualHazardMultipliers {
                presymptomatic: 1.0,
                asymptomatic: 1.0,
                symptomatic: 1.0,
            },
            obesity_multipliers: [1.0; 4],
            cvd_multiplier: 1.0,
            diabetes_multiplier: 1.0,
            bloodpressure_multiplier: 1.0,
        }
    }
}

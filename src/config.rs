use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calories::{convert_weight, WeightUnit};

pub const DEFAULT_LAP_DISTANCE: f64 = 200.0;
pub const MAX_LAP_DISTANCE: f64 = 2000.0;
pub const MAX_WEIGHT: f64 = 500.0;

/// Common indoor track and corridor lap lengths, in meters
pub const DISTANCE_PRESETS: [f64; 6] = [100.0, 150.0, 200.0, 250.0, 300.0, 400.0];

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("lap distance must be within (0, 2000] meters, got {0}")]
    InvalidLapDistance(f64),

    #[error("weight must be within (0, 500], got {0}")]
    InvalidWeight(f64),

    #[error("profile name must not be empty")]
    EmptyName,
}

pub fn validate_lap_distance(meters: f64) -> Result<f64, ConfigError> {
    if meters > 0.0 && meters <= MAX_LAP_DISTANCE {
        Ok(meters)
    } else {
        Err(ConfigError::InvalidLapDistance(meters))
    }
}

pub fn validate_weight(value: f64) -> Result<f64, ConfigError> {
    if value > 0.0 && value <= MAX_WEIGHT {
        Ok(value)
    } else {
        Err(ConfigError::InvalidWeight(value))
    }
}

/// Step to the neighbouring preset. Distances between presets snap to the
/// nearest preset in the requested direction.
pub fn cycle_preset(current: f64, forward: bool) -> f64 {
    let pick = if forward {
        DISTANCE_PRESETS.iter().find(|p| **p > current)
    } else {
        DISTANCE_PRESETS.iter().rev().find(|p| **p < current)
    };
    match (pick, forward) {
        (Some(p), _) => *p,
        (None, true) => DISTANCE_PRESETS[0],
        (None, false) => DISTANCE_PRESETS[DISTANCE_PRESETS.len() - 1],
    }
}

/// Runner profile. The weight is always kept in kilograms; `weight_unit` is
/// only the unit the runner prefers to see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    /// kilograms, 0 when unknown
    pub weight: f64,
    pub weight_unit: WeightUnit,
}

impl UserProfile {
    /// Build a profile from user input given in `unit`. An out-of-range weight
    /// is dropped rather than rejected, which disables calorie estimates.
    pub fn new(name: &str, weight: Option<f64>, unit: WeightUnit) -> Result<Self, ConfigError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        let weight = weight
            .and_then(|w| validate_weight(w).ok())
            .map_or(0.0, |w| convert_weight(w, unit, WeightUnit::Kg));

        Ok(Self {
            name: name.to_string(),
            weight,
            weight_unit: unit,
        })
    }

    /// Weight for the statistics engine, if one was given
    pub fn weight_kg(&self) -> Option<f64> {
        (self.weight > 0.0).then_some(self.weight)
    }

    /// Weight in the runner's preferred unit
    pub fn display_weight(&self) -> Option<f64> {
        self.weight_kg()
            .map(|kg| convert_weight(kg, WeightUnit::Kg, self.weight_unit))
    }
}

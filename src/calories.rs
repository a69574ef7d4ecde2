//! Energy expenditure estimates and body-weight units.
//!
//! Calories are estimated with the MET formula, `MET × kg × hours`, using
//! running intensities from the Compendium of Physical Activities.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::lap::speed;
use crate::util::MS_PER_HOUR;

pub const KG_TO_LBS: f64 = 2.20462;
pub const LBS_TO_KG: f64 = 0.453592;

/// Speed ceilings in km/h and the MET value that applies below each.
const MET_TABLE: [(f64, f64); 7] = [
    (6.4, 6.0),   // < 4 mph
    (8.0, 8.3),   // 4-5 mph
    (9.6, 9.8),   // 5-6 mph
    (11.2, 11.0), // 6-7 mph
    (12.8, 11.8), // 7-8 mph
    (14.4, 12.8), // 8-9 mph
    (16.0, 14.5), // 9-10 mph
];
const MET_CEILING: f64 = 16.0;

pub fn met_for_speed(speed_kmh: f64) -> f64 {
    MET_TABLE
        .iter()
        .find(|(below, _)| speed_kmh < *below)
        .map_or(MET_CEILING, |(_, met)| *met)
}

/// Kilocalories for a run. Exactly zero when any input is zero.
pub fn calories_burned(time_ms: f64, distance_m: f64, weight_kg: f64) -> f64 {
    if time_ms == 0.0 || distance_m == 0.0 || weight_kg == 0.0 {
        return 0.0;
    }
    let met = met_for_speed(speed(time_ms, distance_m));
    met * weight_kg * (time_ms / MS_PER_HOUR)
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

pub fn convert_weight(value: f64, from: WeightUnit, to: WeightUnit) -> f64 {
    match (from, to) {
        (WeightUnit::Kg, WeightUnit::Lbs) => value * KG_TO_LBS,
        (WeightUnit::Lbs, WeightUnit::Kg) => value * LBS_TO_KG,
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_met_breakpoints() {
        assert_eq!(met_for_speed(0.0), 6.0);
        assert_eq!(met_for_speed(6.39), 6.0);
        assert_eq!(met_for_speed(6.4), 8.3);
        assert_eq!(met_for_speed(9.0), 9.8);
        assert_eq!(met_for_speed(11.0), 11.0);
        assert_eq!(met_for_speed(12.0), 11.8);
        assert_eq!(met_for_speed(14.0), 12.8);
        assert_eq!(met_for_speed(15.99), 14.5);
        assert_eq!(met_for_speed(16.0), 16.0);
        assert_eq!(met_for_speed(25.0), 16.0);
    }

    #[test]
    fn test_calories_zero_inputs() {
        assert_eq!(calories_burned(0.0, 400.0, 70.0), 0.0);
        assert_eq!(calories_burned(125_000.0, 0.0, 70.0), 0.0);
        assert_eq!(calories_burned(125_000.0, 400.0, 0.0), 0.0);
    }

    #[test]
    fn test_calories_one_hour_at_ten_kmh() {
        // 10 km/h falls in the 9.6..11.2 band
        let kcal = calories_burned(3_600_000.0, 10_000.0, 70.0);
        assert!((kcal - 770.0).abs() < 1e-9);
    }

    #[test]
    fn test_calories_positive_for_positive_inputs() {
        assert!(calories_burned(1.0, 1.0, 1.0) > 0.0);
        assert!(calories_burned(125_000.0, 400.0, 55.5) > 0.0);
    }

    #[test]
    fn test_convert_weight() {
        assert!((convert_weight(100.0, WeightUnit::Kg, WeightUnit::Lbs) - 220.462).abs() < 1e-9);
        assert!((convert_weight(100.0, WeightUnit::Lbs, WeightUnit::Kg) - 45.3592).abs() < 1e-9);
        assert_eq!(convert_weight(72.5, WeightUnit::Kg, WeightUnit::Kg), 72.5);
        assert_eq!(convert_weight(160.0, WeightUnit::Lbs, WeightUnit::Lbs), 160.0);
    }

    #[test]
    fn test_convert_weight_round_trip() {
        for x in [0.1, 1.0, 45.0, 70.3, 120.0, 499.9] {
            let lbs = convert_weight(x, WeightUnit::Kg, WeightUnit::Lbs);
            let back = convert_weight(lbs, WeightUnit::Lbs, WeightUnit::Kg);
            assert!((back - x).abs() / x < 1e-5, "{x} came back as {back}");
        }
    }

    #[test]
    fn test_weight_unit_display() {
        assert_eq!(WeightUnit::Kg.to_string(), "kg");
        assert_eq!(WeightUnit::Lbs.to_string(), "lbs");
    }
}

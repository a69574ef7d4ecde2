use serde::{Deserialize, Serialize};

use crate::util::{METERS_PER_KM, MS_PER_HOUR, MS_PER_SECOND};

/// Seconds per kilometer. Zero when no distance was covered.
pub fn pace(time_ms: f64, distance_m: f64) -> f64 {
    if distance_m == 0.0 {
        return 0.0;
    }
    (time_ms / MS_PER_SECOND) / (distance_m / METERS_PER_KM)
}

/// Kilometers per hour. Zero when no time has passed.
pub fn speed(time_ms: f64, distance_m: f64) -> f64 {
    if time_ms == 0.0 {
        return 0.0;
    }
    (distance_m / METERS_PER_KM) / (time_ms / MS_PER_HOUR)
}

/// One completed lap. Pace and speed are fixed when the lap is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lap {
    pub lap_number: usize,
    /// milliseconds spent on this lap
    pub time: u64,
    /// meters
    pub distance: f64,
    pub pace: f64,
    pub speed: f64,
}

impl Lap {
    pub fn new(lap_number: usize, time: u64, distance: f64) -> Self {
        Self {
            lap_number,
            time,
            distance,
            pace: pace(time as f64, distance),
            speed: speed(time as f64, distance),
        }
    }
}

use serde::Serialize;

use crate::calories::calories_burned;
use crate::lap::{pace, speed, Lap};
use crate::util::{coefficient_of_variation, METERS_PER_KM, MS_PER_SECOND};

/// Below this absolute difference (in percent) the halves count as even.
const EVEN_SPLIT_TOLERANCE: f64 = 1.0;
const MAX_PROJECTIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SplitType {
    /// second half faster
    Negative,
    /// second half slower
    Positive,
    Even,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitAnalysis {
    pub first_half_pace: f64,
    pub second_half_pace: f64,
    /// signed percentage, negative when the second half was faster
    pub split_difference: f64,
    pub split_type: SplitType,
}

/// Race distances used for finish-time projections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
pub enum RaceDistance {
    #[strum(to_string = "1 km")]
    OneKm,
    #[strum(to_string = "5 km")]
    FiveKm,
    #[strum(to_string = "10 km")]
    TenKm,
    #[strum(to_string = "Half Marathon")]
    HalfMarathon,
    #[strum(to_string = "Marathon")]
    Marathon,
}

impl RaceDistance {
    pub const ALL: [RaceDistance; 5] = [
        RaceDistance::OneKm,
        RaceDistance::FiveKm,
        RaceDistance::TenKm,
        RaceDistance::HalfMarathon,
        RaceDistance::Marathon,
    ];

    pub fn meters(&self) -> f64 {
        match self {
            RaceDistance::OneKm => 1000.0,
            RaceDistance::FiveKm => 5000.0,
            RaceDistance::TenKm => 10_000.0,
            RaceDistance::HalfMarathon => 21_097.5,
            RaceDistance::Marathon => 42_195.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectedTime {
    pub target: RaceDistance,
    /// meters
    pub distance: f64,
    /// milliseconds
    pub time: f64,
}

/// Snapshot of a run derived from its laps. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats<'a> {
    pub total_distance: f64,
    pub total_time: u64,
    pub average_pace: f64,
    pub average_speed: f64,
    pub fastest_lap: Option<&'a Lap>,
    pub slowest_lap: Option<&'a Lap>,
    pub total_laps: usize,
    pub pace_consistency: f64,
    pub pace_range: f64,
    pub split_analysis: Option<SplitAnalysis>,
    pub projected_times: Vec<ProjectedTime>,
    pub average_lap_time: f64,
    pub calories_burned: Option<f64>,
}

impl Default for RunStats<'_> {
    fn default() -> Self {
        Self {
            total_distance: 0.0,
            total_time: 0,
            average_pace: 0.0,
            average_speed: 0.0,
            fastest_lap: None,
            slowest_lap: None,
            total_laps: 0,
            pace_consistency: 0.0,
            pace_range: 0.0,
            split_analysis: None,
            projected_times: Vec::new(),
            average_lap_time: 0.0,
            calories_burned: None,
        }
    }
}

/// Derive the full statistics snapshot from the recorded laps.
///
/// `weight_kg` enables the calorie estimate when it is positive.
pub fn compute_stats(laps: &[Lap], weight_kg: Option<f64>) -> RunStats<'_> {
    if laps.is_empty() {
        return RunStats::default();
    }

    let (total_time, total_distance) = totals(laps);
    let average_pace = pace(total_time as f64, total_distance);
    let average_speed = speed(total_time as f64, total_distance);

    // first occurrence wins on ties, for both extremes
    let fastest_lap = laps
        .iter()
        .reduce(|best, lap| if lap.time < best.time { lap } else { best });
    let slowest_lap = laps
        .iter()
        .reduce(|worst, lap| if lap.time > worst.time { lap } else { worst });

    let pace_range = match (fastest_lap, slowest_lap) {
        (Some(fastest), Some(slowest)) => slowest.pace - fastest.pace,
        _ => 0.0,
    };

    let calories = weight_kg
        .filter(|kg| *kg > 0.0 && total_time > 0 && total_distance > 0.0)
        .map(|kg| calories_burned(total_time as f64, total_distance, kg));

    RunStats {
        total_distance,
        total_time,
        average_pace,
        average_speed,
        fastest_lap,
        slowest_lap,
        total_laps: laps.len(),
        pace_consistency: pace_consistency(laps),
        pace_range,
        split_analysis: split_analysis(laps),
        projected_times: projected_times(average_pace, total_distance),
        average_lap_time: total_time as f64 / laps.len() as f64,
        calories_burned: calories,
    }
}

fn totals(laps: &[Lap]) -> (u64, f64) {
    laps.iter().fold((0, 0.0), |(time, distance), lap| {
        (time + lap.time, distance + lap.distance)
    })
}

/// Coefficient of variation of the lap paces, in percent.
pub fn pace_consistency(laps: &[Lap]) -> f64 {
    if laps.len() < 2 {
        return 0.0;
    }
    let paces: Vec<f64> = laps.iter().map(|lap| lap.pace).collect();
    coefficient_of_variation(&paces).unwrap_or(0.0)
}

/// Compare the first and second half of the laps. The first half is the
/// shorter one when the count is odd.
pub fn split_analysis(laps: &[Lap]) -> Option<SplitAnalysis> {
    if laps.len() < 2 {
        return None;
    }
    let (first, second) = laps.split_at(laps.len() / 2);

    let half_pace = |half: &[Lap]| {
        let (time, distance) = totals(half);
        pace(time as f64, distance)
    };
    let first_half_pace = half_pace(first);
    let second_half_pace = half_pace(second);

    let split_difference = if first_half_pace == 0.0 {
        0.0
    } else {
        100.0 * (second_half_pace - first_half_pace) / first_half_pace
    };

    let split_type = if split_difference.abs() < EVEN_SPLIT_TOLERANCE {
        SplitType::Even
    } else if split_difference < 0.0 {
        SplitType::Negative
    } else {
        SplitType::Positive
    };

    Some(SplitAnalysis {
        first_half_pace,
        second_half_pace,
        split_difference,
        split_type,
    })
}

/// Finish times for the next race distances not yet covered, at the given
/// pace in seconds per km.
pub fn projected_times(average_pace: f64, total_distance: f64) -> Vec<ProjectedTime> {
    if average_pace <= 0.0 {
        return Vec::new();
    }
    RaceDistance::ALL
        .iter()
        .filter(|target| target.meters() > total_distance)
        .take(MAX_PROJECTIONS)
        .map(|target| ProjectedTime {
            target: *target,
            distance: target.meters(),
            time: average_pace * (target.meters() / METERS_PER_KM) * MS_PER_SECOND,
        })
        .collect()
}

/// How far a lap time sits from the average, as a signed percentage.
pub fn lap_comparison(lap_time: u64, average_lap_time: f64) -> f64 {
    if average_lap_time == 0.0 {
        return 0.0;
    }
    (lap_time as f64 - average_lap_time) / average_lap_time * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laps(entries: &[(u64, f64)]) -> Vec<Lap> {
        entries.iter()
            .enumerate()
            .map(|(i, (time, distance))| Lap::new(i + 1, *time, *distance))
            .collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_laps_baseline() {
        let stats = compute_stats(&[], Some(70.0));

        assert_eq!(stats, RunStats::default());
        assert_eq!(stats.total_laps, 0);
        assert!(stats.fastest_lap.is_none());
        assert!(stats.split_analysis.is_none());
        assert!(stats.projected_times.is_empty());
        assert!(stats.calories_burned.is_none());
    }

    #[test]
    fn test_two_lap_reference_run() {
        let laps = laps(&[(60_000, 200.0), (65_000, 200.0)]);
        let stats = compute_stats(&laps, None);

        assert_eq!(stats.total_distance, 400.0);
        assert_eq!(stats.total_time, 125_000);
        assert!(approx(stats.average_pace, 312.5));
        assert!(approx(stats.average_speed, 11.52));
        assert!(approx(stats.pace_consistency, 4.0));
        assert!(approx(stats.pace_range, 25.0));
        assert_eq!(stats.average_lap_time, 62_500.0);
        assert_eq!(stats.fastest_lap.unwrap().time, 60_000);
        assert_eq!(stats.slowest_lap.unwrap().time, 65_000);
        assert!(stats.calories_burned.is_none());

        let split = stats.split_analysis.unwrap();
        assert!(approx(split.first_half_pace, 300.0));
        assert!(approx(split.second_half_pace, 325.0));
        assert!(approx(split.split_difference, 25.0 / 3.0));
        assert_eq!(split.split_type, SplitType::Positive);
    }

    #[test]
    fn test_extremes_are_references_into_laps() {
        let laps = laps(&[(70_000, 200.0), (60_000, 200.0), (80_000, 200.0)]);
        let stats = compute_stats(&laps, None);

        assert!(std::ptr::eq(stats.fastest_lap.unwrap(), &laps[1]));
        assert!(std::ptr::eq(stats.slowest_lap.unwrap(), &laps[2]));
    }

    #[test]
    fn test_ties_pick_first_encountered() {
        let laps = laps(&[(60_000, 200.0), (60_000, 200.0), (70_000, 200.0), (70_000, 200.0)]);
        let stats = compute_stats(&laps, None);

        assert_eq!(stats.fastest_lap.unwrap().lap_number, 1);
        assert_eq!(stats.slowest_lap.unwrap().lap_number, 3);
    }

    #[test]
    fn test_single_lap() {
        let laps = laps(&[(90_000, 400.0)]);
        let stats = compute_stats(&laps, None);

        assert_eq!(stats.total_laps, 1);
        assert_eq!(stats.pace_consistency, 0.0);
        assert_eq!(stats.pace_range, 0.0);
        assert!(stats.split_analysis.is_none());
        assert_eq!(stats.fastest_lap, stats.slowest_lap);
    }

    #[test]
    fn test_compute_stats_is_pure() {
        let laps = laps(&[(61_000, 200.0), (59_500, 200.0), (62_250, 200.0)]);

        assert_eq!(compute_stats(&laps, Some(68.0)), compute_stats(&laps, Some(68.0)));
    }

    #[test]
    fn test_pace_range_uses_time_extremes() {
        // the 400 m lap is slowest by time but fastest by pace
        let laps = laps(&[(60_000, 200.0), (100_000, 400.0)]);
        let stats = compute_stats(&laps, None);

        assert!(approx(stats.pace_range, 250.0 - 300.0));
    }

    #[test]
    fn test_split_odd_count_gives_first_half_fewer_laps() {
        let laps = laps(&[(60_000, 200.0), (50_000, 200.0), (50_000, 200.0)]);
        let split = split_analysis(&laps).unwrap();

        assert!(approx(split.first_half_pace, 300.0));
        assert!(approx(split.second_half_pace, 250.0));
        assert_eq!(split.split_type, SplitType::Negative);
    }

    #[test]
    fn test_split_even_within_one_percent() {
        let laps = laps(&[(60_000, 200.0), (60_500, 200.0)]);
        let split = split_analysis(&laps).unwrap();

        assert!(split.split_difference > 0.0);
        assert_eq!(split.split_type, SplitType::Even);
    }

    #[test]
    fn test_split_with_zero_first_half_pace() {
        let laps = laps(&[(0, 200.0), (60_000, 200.0)]);
        let split = split_analysis(&laps).unwrap();

        assert_eq!(split.split_difference, 0.0);
        assert_eq!(split.split_type, SplitType::Even);
    }

    #[test]
    fn test_projected_times_skip_covered_distances() {
        let projections = projected_times(300.0, 500.0);

        assert_eq!(projections.len(), 3);
        assert_eq!(projections[0].target, RaceDistance::OneKm);
        assert_eq!(projections[0].time, 300_000.0);
        assert_eq!(projections[1].target, RaceDistance::FiveKm);
        assert_eq!(projections[2].target, RaceDistance::TenKm);
        assert!(projections.iter().all(|p| p.distance > 500.0));
    }

    #[test]
    fn test_projected_times_near_the_end() {
        let projections = projected_times(300.0, 25_000.0);

        assert_eq!(projections.len(), 1);
        assert_eq!(projections[0].target, RaceDistance::Marathon);
        assert!(approx(projections[0].time, 300.0 * 42.195 * 1000.0));

        assert!(projected_times(300.0, 42_195.0).is_empty());
    }

    #[test]
    fn test_projected_times_need_a_pace() {
        assert!(projected_times(0.0, 0.0).is_empty());
    }

    #[test]
    fn test_zero_distance_laps_have_no_projections() {
        let laps = laps(&[(60_000, 0.0), (60_000, 0.0)]);
        let stats = compute_stats(&laps, Some(70.0));

        assert_eq!(stats.average_pace, 0.0);
        assert!(stats.projected_times.is_empty());
        assert!(stats.calories_burned.is_none());
    }

    #[test]
    fn test_calories_only_with_weight() {
        let laps = laps(&[(60_000, 200.0), (65_000, 200.0)]);

        assert!(compute_stats(&laps, None).calories_burned.is_none());
        assert!(compute_stats(&laps, Some(0.0)).calories_burned.is_none());

        // 11.52 km/h -> MET 11.8
        let kcal = compute_stats(&laps, Some(70.0)).calories_burned.unwrap();
        assert!(approx(kcal, 11.8 * 70.0 * 125_000.0 / 3_600_000.0));
    }

    #[test]
    fn test_lap_comparison() {
        assert!(approx(lap_comparison(66_000, 60_000.0), 10.0));
        assert!(approx(lap_comparison(54_000, 60_000.0), -10.0));
        assert_eq!(lap_comparison(54_000, 0.0), 0.0);
    }

    #[test]
    fn test_race_distance_labels() {
        assert_eq!(RaceDistance::OneKm.to_string(), "1 km");
        assert_eq!(RaceDistance::HalfMarathon.to_string(), "Half Marathon");
        assert_eq!(SplitType::Negative.to_string(), "negative");
    }
}

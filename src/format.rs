//! Human readable renderings of times, paces and distances.

use crate::lap::Lap;
use crate::stats::{lap_comparison, RunStats};

/// `H:MM:SS` from one hour on, `MM:SS.cc` below.
pub fn format_time(ms: u64) -> String {
    let total_secs = ms / 1000;
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    let cs = (ms % 1000) / 10;

    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{:02}:{:02}.{:02}", m, s, cs)
    }
}

/// Pace in seconds per km as `M:SS`
pub fn format_pace(secs_per_km: f64) -> String {
    let whole = secs_per_km.max(0.0).floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

pub fn format_speed(kmh: f64) -> String {
    format!("{:.1}", kmh)
}

pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.2} km", meters / 1000.0)
    } else {
        format!("{} m", meters.round())
    }
}

/// Signed percentage with one decimal, the sign always shown.
pub fn format_percentage(value: f64) -> String {
    let sign = if value >= 0.0 { '+' } else { '-' };
    format!("{}{:.1}%", sign, value.abs())
}

/// Coarse duration such as `1h 23m 45s`, `5m 30s` or `42s`.
pub fn format_projected_time(ms: f64) -> String {
    let total_secs = (ms.max(0.0) / 1000.0).floor() as u64;
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;

    if h > 0 {
        format!("{}h {}m {}s", h, m, s)
    } else if m > 0 {
        format!("{}m {}s", m, s)
    } else {
        format!("{}s", s)
    }
}

/// Plain-text run report, one fact per line followed by the lap list.
pub fn summary_report(stats: &RunStats<'_>, laps: &[Lap]) -> String {
    if laps.is_empty() {
        return "No laps recorded.\n".to_string();
    }

    let mut lines = vec![
        format!("Laps:         {}", stats.total_laps),
        format!("Distance:     {}", format_distance(stats.total_distance)),
        format!("Time:         {}", format_time(stats.total_time)),
        format!("Avg pace:     {}/km", format_pace(stats.average_pace)),
        format!("Avg speed:    {} km/h", format_speed(stats.average_speed)),
        format!("Avg lap:      {}", format_time(stats.average_lap_time as u64)),
    ];
    if let (Some(fastest), Some(slowest)) = (stats.fastest_lap, stats.slowest_lap) {
        lines.push(format!(
            "Fastest lap:  #{} {}",
            fastest.lap_number,
            format_time(fastest.time)
        ));
        lines.push(format!(
            "Slowest lap:  #{} {}",
            slowest.lap_number,
            format_time(slowest.time)
        ));
    }
    lines.push(format!("Consistency:  {:.1}%", stats.pace_consistency));
    lines.push(format!("Pace range:   {:.0}s", stats.pace_range));
    if let Some(split) = &stats.split_analysis {
        lines.push(format!(
            "Split:        {} ({}) {} -> {}",
            split.split_type,
            format_percentage(split.split_difference),
            format_pace(split.first_half_pace),
            format_pace(split.second_half_pace),
        ));
    }
    for projection in &stats.projected_times {
        lines.push(format!(
            "Projected:    {} in {}",
            projection.target,
            format_projected_time(projection.time)
        ));
    }
    if let Some(kcal) = stats.calories_burned {
        lines.push(format!("Calories:     {:.0} kcal", kcal));
    }

    lines.push(String::new());
    lines.extend(laps.iter().map(|lap| {
        format!(
            "#{:<3} {}  {}/km  {}",
            lap.lap_number,
            format_time(lap.time),
            format_pace(lap.pace),
            format_percentage(lap_comparison(lap.time, stats.average_lap_time)),
        )
    }));

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

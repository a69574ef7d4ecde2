pub const MS_PER_SECOND: f64 = 1000.0;
pub const MS_PER_HOUR: f64 = 3_600_000.0;
pub const METERS_PER_KM: f64 = 1000.0;

pub fn mean(data: &[f64]) -> Option<f64> {
    match data.len() {
        0 => None,
        count => Some(data.iter().sum::<f64>() / count as f64),
    }
}

/// Population standard deviation.
pub fn std_dev(data: &[f64]) -> Option<f64> {
    let data_mean = mean(data)?;
    let variance = data
        .iter()
        .map(|value| {
            let diff = data_mean - *value;

            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;

    Some(variance.sqrt())
}

/// Standard deviation as a percentage of the mean.
pub fn coefficient_of_variation(data: &[f64]) -> Option<f64> {
    match (mean(data), std_dev(data)) {
        (Some(m), Some(sd)) if m != 0.0 => Some(100.0 * sd / m),
        _ => None,
    }
}

/// Milliseconds between two epoch-millisecond instants, clamped at zero.
pub fn span_ms(from: i64, to: i64) -> u64 {
    to.saturating_sub(from).max(0) as u64
}

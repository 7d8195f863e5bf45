//! Summary statistics over metric samples

use tm_core::MetricStats;

/// Linear-interpolated percentile of sorted values, `p` in 0..=100
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let idx = (sorted.len() - 1) as f64 * p / 100.0;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;
    let frac = idx - lower as f64;
    sorted[lower] * (1.0 - frac) + sorted[upper] * frac
}

/// Summarize samples in their own unit. Empty input yields the default
/// stats with a count of zero.
pub fn summarize(values: &[f64]) -> MetricStats {
    if values.is_empty() {
        return MetricStats::default();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let count = sorted.len();
    let sum: f64 = sorted.iter().sum();
    MetricStats {
        count,
        avg: sum / count as f64,
        min: sorted[0],
        max: sorted[count - 1],
        median: percentile(&sorted, 50.0),
        p90: percentile(&sorted, 90.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_zero_count() {
        let stats = summarize(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.avg, 0.0);
    }

    #[test]
    fn single_value_is_all_statistics() {
        let stats = summarize(&[7.5]);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.avg, 7.5);
        assert_eq!(stats.min, 7.5);
        assert_eq!(stats.max, 7.5);
        assert_eq!(stats.median, 7.5);
        assert_eq!(stats.p90, 7.5);
    }

    #[test]
    fn percentiles_interpolate_between_samples() {
        // Unsorted on purpose
        let stats = summarize(&[5.0, 1.0, 4.0, 2.0, 3.0]);
        assert_eq!(stats.count, 5);
        assert_eq!(stats.avg, 3.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.median, 3.0);
        // p90 of 5 samples sits 0.6 of the way from the 4th to the 5th
        assert!((stats.p90 - 4.6).abs() < 1e-9);
    }

    #[test]
    fn median_of_even_count_is_the_midpoint() {
        let stats = summarize(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(stats.median, 2.5);
    }
}

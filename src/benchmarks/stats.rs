use std::time::Duration;

/// Calculate the mean (average) duration from a collection of durations
pub fn calculate_mean(durations: &[Duration]) -> Duration {
    if durations.is_empty() {
        return Duration::ZERO;
    }

    let total: Duration = durations.iter().sum();
    total / durations.len() as u32
}

/// Calculate the median of an already sorted slice
pub fn calculate_median(sorted: &[Duration]) -> Duration {
    let len = sorted.len();
    match len {
        0 => Duration::ZERO,
        _ if len.is_multiple_of(2) => (sorted[len / 2 - 1] + sorted[len / 2]) / 2,
        _ => sorted[len / 2],
    }
}

/// Sample standard deviation (n-1) of durations
pub fn calculate_std_dev(durations: &[Duration], mean: Duration) -> Duration {
    let samples: Vec<f64> = durations.iter().map(|d| d.as_nanos() as f64).collect();
    let std_dev_nanos = sample_std_dev(&samples, mean.as_nanos() as f64);
    Duration::from_nanos(std_dev_nanos as u64)
}

/// Percentile of an already sorted slice, taking the element at rank
/// `percentile * (len - 1)` rounded up.
///
/// `percentile` is a fraction, e.g. 0.95 for the 95th percentile.
pub fn calculate_percentile(sorted: &[Duration], percentile: f64) -> Duration {
    if sorted.is_empty() || percentile <= 0.0 {
        return Duration::ZERO;
    }

    let last = sorted.len() - 1;
    if percentile >= 1.0 {
        return sorted[last];
    }

    let index = (percentile * last as f64).ceil() as usize;
    sorted[index.min(last)]
}

/// Operations per second over `total_duration`
pub fn calculate_throughput(operations: u64, total_duration: Duration) -> f64 {
    if total_duration.is_zero() {
        return 0.0;
    }

    operations as f64 / total_duration.as_secs_f64()
}

pub fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n-1); zero for fewer than two values
pub fn sample_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }

    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / (values.len() - 1) as f64;

    variance.sqrt()
}

/// Latency distribution of the successful operations of a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LatencySummary {
    pub mean: Duration,
    pub median: Duration,
    pub std_dev: Duration,
    pub min: Duration,
    pub max: Duration,
    pub p95: Duration,
    pub p99: Duration,
}

impl LatencySummary {
    pub fn from_durations(durations: &[Duration]) -> Self {
        if durations.is_empty() {
            return Self::default();
        }

        let mut sorted = durations.to_vec();
        sorted.sort();

        let mean = calculate_mean(&sorted);
        Self {
            mean,
            median: calculate_median(&sorted),
            std_dev: calculate_std_dev(&sorted, mean),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            p95: calculate_percentile(&sorted, 0.95),
            p99: calculate_percentile(&sorted, 0.99),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(values: &[u64]) -> Vec<Duration> {
        values.iter().map(|v| Duration::from_millis(*v)).collect()
    }

    #[test]
    fn test_calculate_mean() {
        assert_eq!(
            calculate_mean(&millis(&[100, 200, 300])),
            Duration::from_millis(200)
        );
        assert_eq!(calculate_mean(&[]), Duration::ZERO);
    }

    #[test]
    fn test_calculate_median() {
        assert_eq!(
            calculate_median(&millis(&[100, 200, 300])),
            Duration::from_millis(200)
        );
        assert_eq!(
            calculate_median(&millis(&[100, 200, 300, 400])),
            Duration::from_millis(250)
        );
        assert_eq!(calculate_median(&[]), Duration::ZERO);
    }

    #[test]
    fn test_calculate_std_dev() {
        let durations = millis(&[100, 200, 300]);
        let std_dev = calculate_std_dev(&durations, calculate_mean(&durations));

        assert!(std_dev >= Duration::from_millis(95));
        assert!(std_dev <= Duration::from_millis(105));
        assert_eq!(calculate_std_dev(&[], Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn test_calculate_percentile() {
        let sorted: Vec<Duration> = (1..=100).map(|i| Duration::from_millis(i * 10)).collect();
        // rank 0.95 * 99 = 94.05 rounds up to index 95
        assert_eq!(calculate_percentile(&sorted, 0.95), Duration::from_millis(960));
        assert_eq!(calculate_percentile(&sorted, 0.5), Duration::from_millis(510));

        let single = millis(&[100]);
        assert_eq!(calculate_percentile(&single, 0.0), Duration::ZERO);
        assert_eq!(calculate_percentile(&single, 0.5), Duration::from_millis(100));
        assert_eq!(calculate_percentile(&single, 1.0), Duration::from_millis(100));
        assert_eq!(calculate_percentile(&[], 0.95), Duration::ZERO);
    }

    #[test]
    fn test_calculate_throughput() {
        assert_eq!(calculate_throughput(100, Duration::from_secs(10)), 10.0);
        assert_eq!(calculate_throughput(100, Duration::from_millis(2500)), 40.0);
        assert_eq!(calculate_throughput(100, Duration::ZERO), 0.0);
    }

    #[test]
    fn test_f64_helpers() {
        assert_eq!(mean_f64(&[]), 0.0);
        assert_eq!(mean_f64(&[1.0, 2.0, 3.0]), 2.0);
        assert_eq!(sample_std_dev(&[5.0], 5.0), 0.0);
        assert_eq!(sample_std_dev(&[1.0, 2.0, 3.0], 2.0), 1.0);
    }

    #[test]
    fn test_latency_summary() {
        let summary = LatencySummary::from_durations(&millis(&[30, 10, 20]));
        assert_eq!(summary.min, Duration::from_millis(10));
        assert_eq!(summary.max, Duration::from_millis(30));
        assert_eq!(summary.median, Duration::from_millis(20));
        assert_eq!(summary.mean, Duration::from_millis(20));
        assert_eq!(summary.p99, Duration::from_millis(30));

        assert_eq!(LatencySummary::from_durations(&[]), LatencySummary::default());
    }
}

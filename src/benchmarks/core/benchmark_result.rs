use std::time::Duration;

use serde::{Serialize, Serializer};

use super::benchmark_config::{BenchmarkConfig, BenchmarkMode};
use crate::benchmarks::stats::{self, LatencySummary};

/// Counters and samples collected while a trial was measuring.
#[derive(Debug, Clone, Default)]
pub struct MeasurementSamples {
    /// One score per measured iteration, already in the configured unit
    pub scores: Vec<f64>,
    /// Latency of every successful measured operation
    pub latencies: Vec<Duration>,
    pub operations: u64,
    /// Measured iterations ended by a request failure
    pub failures: u64,
    pub warmup_failures: u64,
    pub requests_issued: u64,
    pub total_duration: Duration,
}

/// Results from running a benchmark trial; one report row.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkResult {
    pub name: String,
    pub mode: BenchmarkMode,
    pub threads: u32,
    pub iterations: u32,
    pub operations: u64,
    pub failures: u64,
    pub warmup_failures: u64,
    pub requests_issued: u64,
    pub score: f64,
    pub score_error: f64,
    pub unit: String,
    #[serde(rename = "total_duration_ms", serialize_with = "as_millis")]
    pub total_duration: Duration,
    #[serde(rename = "mean_ms", serialize_with = "as_millis")]
    pub mean: Duration,
    #[serde(rename = "median_ms", serialize_with = "as_millis")]
    pub median: Duration,
    #[serde(rename = "std_dev_ms", serialize_with = "as_millis")]
    pub std_dev: Duration,
    #[serde(rename = "min_ms", serialize_with = "as_millis")]
    pub min: Duration,
    #[serde(rename = "max_ms", serialize_with = "as_millis")]
    pub max: Duration,
    #[serde(rename = "p95_ms", serialize_with = "as_millis")]
    pub p95: Duration,
    #[serde(rename = "p99_ms", serialize_with = "as_millis")]
    pub p99: Duration,
    pub throughput: f64, // successful operations per second over the measuring phase
}

impl BenchmarkResult {
    /// Builds a report row from the samples of one trial.
    ///
    /// The score is the mean of the per-iteration scores and the score error
    /// their sample standard deviation. Latency statistics only cover
    /// operations that succeeded.
    pub fn from_samples(
        name: &str,
        mode: BenchmarkMode,
        config: &BenchmarkConfig,
        samples: MeasurementSamples,
    ) -> Self {
        let score = stats::mean_f64(&samples.scores);
        let score_error = stats::sample_std_dev(&samples.scores, score);
        let latency = LatencySummary::from_durations(&samples.latencies);
        let throughput = stats::calculate_throughput(samples.operations, samples.total_duration);

        Self {
            name: name.to_string(),
            mode,
            threads: 1,
            iterations: config.iterations,
            operations: samples.operations,
            failures: samples.failures,
            warmup_failures: samples.warmup_failures,
            requests_issued: samples.requests_issued,
            score,
            score_error,
            unit: config.time_unit.score_unit(mode),
            total_duration: samples.total_duration,
            mean: latency.mean,
            median: latency.median,
            std_dev: latency.std_dev,
            min: latency.min,
            max: latency.max,
            p95: latency.p95,
            p99: latency.p99,
            throughput,
        }
    }

    pub fn success(&self) -> bool {
        self.failures == 0 && self.warmup_failures == 0
    }
}

fn as_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64() * 1_000.0)
}

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::retry::RetryConfig;
use crate::config::HttpMethod;
use crate::error::{BenchError, Result};

/// How an iteration is bounded and how its score is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkMode {
    /// Back-to-back operations for a fixed iteration time; score is ops per unit.
    #[value(alias = "thrpt")]
    Throughput,
    /// Exactly one operation per iteration; score is time per operation.
    #[value(alias = "ss")]
    SingleShotTime,
}

impl BenchmarkMode {
    pub fn short_name(&self) -> &'static str {
        match self {
            BenchmarkMode::Throughput => "thrpt",
            BenchmarkMode::SingleShotTime => "ss",
        }
    }
}

impl fmt::Display for BenchmarkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchmarkMode::Throughput => write!(f, "throughput"),
            BenchmarkMode::SingleShotTime => write!(f, "single-shot"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    #[value(alias = "s")]
    Seconds,
    #[value(alias = "ms")]
    Milliseconds,
    #[value(alias = "us")]
    Microseconds,
}

impl TimeUnit {
    pub fn suffix(&self) -> &'static str {
        match self {
            TimeUnit::Seconds => "s",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Microseconds => "us",
        }
    }

    /// Expresses `duration` in this unit.
    pub fn convert(&self, duration: Duration) -> f64 {
        match self {
            TimeUnit::Seconds => duration.as_secs_f64(),
            TimeUnit::Milliseconds => duration.as_secs_f64() * 1_000.0,
            TimeUnit::Microseconds => duration.as_secs_f64() * 1_000_000.0,
        }
    }

    /// Operations per one of this unit over `elapsed`.
    pub fn rate(&self, operations: u64, elapsed: Duration) -> f64 {
        let span = self.convert(elapsed);
        if span <= 0.0 {
            return 0.0;
        }
        operations as f64 / span
    }

    pub fn score_unit(&self, mode: BenchmarkMode) -> String {
        match mode {
            BenchmarkMode::Throughput => format!("ops/{}", self.suffix()),
            BenchmarkMode::SingleShotTime => format!("{}/op", self.suffix()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Json,
}

/// Configuration for benchmark execution
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    pub method: HttpMethod,
    /// Overrides the REST client's path for `method`; may contain `{id}`
    pub target_path: Option<String>,
    /// Each mode runs as its own trial
    pub modes: Vec<BenchmarkMode>,
    pub warmup_iterations: u32,
    pub warmup_time: Duration,
    pub iterations: u32,
    pub measurement_time: Duration,
    pub time_unit: TimeUnit,
    pub output_format: OutputFormat,
    pub output_path: PathBuf,
    pub fail_on_error: bool,
    pub cooldown_between_iterations: Duration,
    pub show_progress: bool,
    /// Probe the target before the trial starts
    pub readiness: Option<RetryConfig>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            method: HttpMethod::Post,
            target_path: None,
            modes: vec![BenchmarkMode::Throughput],
            warmup_iterations: 1,
            warmup_time: Duration::from_secs(10),
            iterations: 10,
            measurement_time: Duration::from_secs(10),
            time_unit: TimeUnit::Seconds,
            output_format: OutputFormat::Csv,
            output_path: PathBuf::from("bench-report.csv"),
            fail_on_error: true,
            cooldown_between_iterations: Duration::ZERO,
            show_progress: true,
            readiness: None,
        }
    }
}

impl BenchmarkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.modes.is_empty() {
            return Err(BenchError::Configuration(
                "at least one benchmark mode is required".to_string(),
            ));
        }
        if self.iterations == 0 {
            return Err(BenchError::Configuration(
                "measurement iterations must be greater than zero".to_string(),
            ));
        }
        if self.modes.contains(&BenchmarkMode::Throughput) {
            if self.measurement_time.is_zero() {
                return Err(BenchError::Configuration(
                    "measurement time must be greater than zero in throughput mode".to_string(),
                ));
            }
            if self.warmup_iterations > 0 && self.warmup_time.is_zero() {
                return Err(BenchError::Configuration(
                    "warmup time must be greater than zero in throughput mode".to_string(),
                ));
            }
        }
        if let Some(path) = &self.target_path {
            if path.trim().is_empty() {
                return Err(BenchError::Configuration(
                    "target path must not be empty".to_string(),
                ));
            }
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(BenchError::Configuration(
                "output path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Iteration time budget for `mode`; single-shot iterations are unbounded in time.
    pub fn iteration_budget(&self, mode: BenchmarkMode, warmup: bool) -> Duration {
        match (mode, warmup) {
            (BenchmarkMode::SingleShotTime, _) => Duration::ZERO,
            (BenchmarkMode::Throughput, true) => self.warmup_time,
            (BenchmarkMode::Throughput, false) => self.measurement_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(BenchmarkConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_modes() {
        let config = BenchmarkConfig {
            modes: vec![],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BenchError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_iterations() {
        let config = BenchmarkConfig {
            iterations: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_measurement_time_only_matters_for_throughput() {
        let single_shot = BenchmarkConfig {
            modes: vec![BenchmarkMode::SingleShotTime],
            measurement_time: Duration::ZERO,
            warmup_time: Duration::ZERO,
            ..Default::default()
        };
        assert!(single_shot.validate().is_ok());

        let throughput = BenchmarkConfig {
            measurement_time: Duration::ZERO,
            ..Default::default()
        };
        assert!(throughput.validate().is_err());
    }

    #[test]
    fn test_time_unit_conversions() {
        let elapsed = Duration::from_millis(2500);
        assert_eq!(TimeUnit::Seconds.convert(elapsed), 2.5);
        assert_eq!(TimeUnit::Milliseconds.convert(elapsed), 2500.0);
        assert_eq!(TimeUnit::Seconds.rate(100, elapsed), 40.0);
        assert_eq!(TimeUnit::Seconds.rate(100, Duration::ZERO), 0.0);
    }

    #[test]
    fn test_score_units() {
        assert_eq!(
            TimeUnit::Seconds.score_unit(BenchmarkMode::Throughput),
            "ops/s"
        );
        assert_eq!(
            TimeUnit::Milliseconds.score_unit(BenchmarkMode::SingleShotTime),
            "ms/op"
        );
    }
}

use std::time::{Duration, Instant};

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};

use super::benchmark_config::{BenchmarkConfig, BenchmarkMode};
use super::benchmark_result::{BenchmarkResult, MeasurementSamples};
use super::context::TrialContext;
use super::phase::{PhaseTracker, TrialPhase};
use super::retry;
use crate::config::RestClientConfig;
use crate::error::{BenchError, Result};

/// What one warmup or measured iteration produced.
#[derive(Debug, Default)]
pub struct IterationSample {
    pub operations: u64,
    /// Set when a counted request failure ended the iteration
    pub failed: bool,
    pub latencies: Vec<Duration>,
    pub elapsed: Duration,
}

/// Trait for benchmark scenarios using the template method pattern.
///
/// Implement `setup()` and `single_iteration()` to create a benchmark.
/// The default `run_benchmark()` implementation walks the trial through
/// warmup, measurement and reporting, and applies the failure policy.
#[async_trait]
pub trait BenchmarkScenario: Send + Sync {
    /// Name of the benchmark scenario
    fn name(&self) -> &str;

    /// Configuration for this benchmark
    fn config(&self) -> &BenchmarkConfig;

    /// Trial setup: build the HTTP client and a fresh id source.
    /// This is NOT timed and runs once before warmup iterations.
    async fn setup(&mut self, rest: &RestClientConfig) -> Result<TrialContext>;

    /// Run a single operation and return its duration.
    async fn single_iteration(&self, context: &mut TrialContext) -> Result<Duration>;

    /// Runs operations until the iteration is over: one operation in
    /// single-shot mode, otherwise until `budget` has elapsed.
    ///
    /// A request failure ends the iteration. It is returned when
    /// `fail_on_error` is set, otherwise the iteration is marked failed.
    /// Other errors always propagate.
    async fn run_iteration(
        &self,
        context: &mut TrialContext,
        mode: BenchmarkMode,
        budget: Duration,
        fail_on_error: bool,
    ) -> Result<IterationSample> {
        let mut sample = IterationSample::default();
        let start = Instant::now();

        loop {
            match self.single_iteration(context).await {
                Ok(duration) => {
                    sample.operations += 1;
                    sample.latencies.push(duration);
                }
                Err(e) if e.is_request_failure() && !fail_on_error => {
                    tracing::debug!("{}: request failed: {}", self.name(), e);
                    sample.failed = true;
                    break;
                }
                Err(e) => return Err(e),
            }

            if mode == BenchmarkMode::SingleShotTime || start.elapsed() >= budget {
                break;
            }
        }

        sample.elapsed = start.elapsed();
        Ok(sample)
    }

    /// Run one trial of `mode` with standard warmup, timing, and statistics collection.
    async fn run_benchmark(
        &mut self,
        rest: &RestClientConfig,
        mode: BenchmarkMode,
    ) -> Result<BenchmarkResult> {
        let config = self.config().clone();
        let name = self.name().to_string();
        let mut phase = PhaseTracker::new(&name);

        tracing::info!("Setting up benchmark: {} ({})", name, mode);
        let mut context = self.setup(rest).await?;

        if let Some(readiness) = &config.readiness {
            retry::wait_until_ready(&context.client, readiness).await?;
        }

        let abort = |phase: TrialPhase, iteration: u32, source: BenchError| {
            tracing::error!(
                "Benchmark {} aborted during {} iteration {}: {}",
                name,
                phase,
                iteration,
                source
            );
            BenchError::Aborted {
                benchmark: name.clone(),
                phase,
                iteration,
                source: Box::new(source),
            }
        };

        // Warmup phase (skip if warmup_iterations == 0)
        phase.advance(TrialPhase::Warmup)?;
        let mut warmup_failures = 0;
        if config.warmup_iterations > 0 {
            tracing::info!("Running {} warmup iterations...", config.warmup_iterations);

            let pb = progress_bar(
                config.show_progress,
                config.warmup_iterations,
                "{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                "=>-",
            );
            pb.set_message("Warmup");

            let budget = config.iteration_budget(mode, true);
            for iteration in 0..config.warmup_iterations {
                let sample = self
                    .run_iteration(&mut context, mode, budget, config.fail_on_error)
                    .await
                    .map_err(|e| abort(TrialPhase::Warmup, iteration, e))?;
                warmup_failures += u64::from(sample.failed);
                pb.inc(1);
                cooldown(config.cooldown_between_iterations).await;
            }

            pb.finish_with_message("Warmup complete");
            if warmup_failures > 0 {
                tracing::warn!("{} warmup iterations failed", warmup_failures);
            }
        }

        // Benchmark phase
        phase.advance(TrialPhase::Measuring)?;
        tracing::info!("Running {} benchmark iterations...", config.iterations);

        let pb = progress_bar(
            config.show_progress,
            config.iterations,
            "{msg} [{bar:40.green/blue}] {pos}/{len} ({percent}%) - ETA: {eta}",
            "##-",
        );
        pb.set_message("Benchmarking");

        let budget = config.iteration_budget(mode, false);
        let mut samples = MeasurementSamples {
            scores: Vec::with_capacity(config.iterations as usize),
            warmup_failures,
            ..Default::default()
        };
        let overall_start = Instant::now();

        for iteration in 0..config.iterations {
            let sample = self
                .run_iteration(&mut context, mode, budget, config.fail_on_error)
                .await
                .map_err(|e| abort(TrialPhase::Measuring, iteration, e))?;

            let score = match mode {
                _ if sample.failed => None,
                BenchmarkMode::Throughput => {
                    Some(config.time_unit.rate(sample.operations, sample.elapsed))
                }
                BenchmarkMode::SingleShotTime => sample
                    .latencies
                    .first()
                    .map(|latency| config.time_unit.convert(*latency)),
            };
            if let Some(score) = score {
                tracing::debug!(
                    "Iteration {}: {:.3} {}",
                    iteration + 1,
                    score,
                    config.time_unit.score_unit(mode)
                );
                samples.scores.push(score);
            }
            if sample.failed {
                tracing::warn!(
                    "Iteration {} failed after {} operations",
                    iteration + 1,
                    sample.operations
                );
                samples.failures += 1;
            }

            samples.operations += sample.operations;
            samples.latencies.extend(sample.latencies);
            pb.inc(1);
            cooldown(config.cooldown_between_iterations).await;
        }

        pb.finish_with_message("Benchmark complete");
        samples.total_duration = overall_start.elapsed();
        samples.requests_issued = context.requests.issued();

        // Calculate and return results
        phase.advance(TrialPhase::Reporting)?;
        let result = BenchmarkResult::from_samples(&name, mode, &config, samples);
        phase.advance(TrialPhase::Done)?;

        Ok(result)
    }
}

fn progress_bar(enabled: bool, len: u32, template: &str, progress_chars: &str) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars(progress_chars),
    );
    pb
}

async fn cooldown(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

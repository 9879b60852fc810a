use std::time::{Duration, Instant};

use crate::benchmarks::scenarios::TodoRequestBenchmark;
use crate::benchmarks::{BenchmarkConfig, BenchmarkResult, BenchmarkScenario};
use crate::config::RestClientConfig;
use crate::error::Result;
use crate::report;

pub struct BenchmarkRegistry;

impl BenchmarkRegistry {
    /// Runs one trial per configured mode, logs a summary and writes the report.
    ///
    /// A fail-fast abort stops the run at once and no report is written.
    pub async fn run_all_benchmarks(
        rest: &RestClientConfig,
        config: &BenchmarkConfig,
    ) -> Result<Vec<BenchmarkResult>> {
        rest.validate()?;
        config.validate()?;

        let overall_start = Instant::now();
        let mut results = Vec::with_capacity(config.modes.len());
        let mut scenario = TodoRequestBenchmark::new(config.clone());

        tracing::info!("=== Running Performance Benchmarks ===");

        for mode in &config.modes {
            results.push(scenario.run_benchmark(rest, *mode).await?);
        }

        Self::print_summary(&results, overall_start.elapsed());

        let path = report::write_report(
            &results,
            config.output_format,
            &config.output_path,
            &rest.url,
        )?;
        tracing::info!("Report written to {}", path.display());

        Ok(results)
    }

    fn print_summary(results: &[BenchmarkResult], overall_duration: Duration) {
        if results.is_empty() {
            return;
        }

        tracing::info!("=== Benchmark Results Summary ===");
        tracing::info!("");

        for result in results {
            tracing::info!("Benchmark: {} ({})", result.name, result.mode);
            tracing::info!("  Iterations:  {}", result.iterations);
            tracing::info!("  Operations:  {}", result.operations);
            tracing::info!("  Failures:    {}", result.failures);
            tracing::info!("  Total Time:  {:?}", result.total_duration);
            tracing::info!("");
            tracing::info!(
                "  Score:       {:.3} ± {:.3} {}",
                result.score,
                result.score_error,
                result.unit
            );
            tracing::info!("");
            tracing::info!("  Latency:");
            tracing::info!("    Mean:      {:?}", result.mean);
            tracing::info!("    Median:    {:?}", result.median);
            tracing::info!("    Std Dev:   {:?}", result.std_dev);
            tracing::info!("    Min:       {:?}", result.min);
            tracing::info!("    Max:       {:?}", result.max);
            tracing::info!("    P95:       {:?}", result.p95);
            tracing::info!("    P99:       {:?}", result.p99);
            tracing::info!("");
            tracing::info!("  Throughput:  {:.2} ops/sec", result.throughput);
            tracing::info!("");
            tracing::info!("---");
        }

        tracing::info!("");
        tracing::info!("Total Benchmarks: {}", results.len());
        tracing::info!("Overall Duration: {:?}", overall_duration);
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use mockito::Server;

    use super::*;
    use crate::benchmarks::{BenchmarkMode, OutputFormat};
    use crate::error::BenchError;

    fn config(output_path: &Path, fail_on_error: bool) -> BenchmarkConfig {
        BenchmarkConfig {
            modes: vec![BenchmarkMode::SingleShotTime],
            warmup_iterations: 2,
            iterations: 5,
            fail_on_error,
            show_progress: false,
            output_path: output_path.to_path_buf(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_successful_run_writes_report() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/todos")
            .with_status(201)
            .expect(7)
            .create_async()
            .await;
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.csv");

        let results = BenchmarkRegistry::run_all_benchmarks(
            &RestClientConfig::new(&server.url()),
            &config(&output, true),
        )
        .await
        .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].iterations, 5);
        mock.assert_async().await;

        let mut reader = csv::Reader::from_path(&output).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][3], "5");
    }

    #[tokio::test]
    async fn test_fail_fast_run_returns_error_without_report() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/todos")
            .with_status(500)
            .create_async()
            .await;
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.csv");

        let err = BenchmarkRegistry::run_all_benchmarks(
            &RestClientConfig::new(&server.url()),
            &config(&output, true),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, BenchError::Aborted { .. }));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_failures_reported_without_fail_fast() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/todos")
            .with_status(500)
            .create_async()
            .await;
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.json");
        let bench_config = BenchmarkConfig {
            output_format: OutputFormat::Json,
            ..config(&output, false)
        };

        let results = BenchmarkRegistry::run_all_benchmarks(
            &RestClientConfig::new(&server.url()),
            &bench_config,
        )
        .await
        .unwrap();

        assert_eq!(results[0].failures, 5);
        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(report["results"][0]["failures"], 5);
    }

    #[tokio::test]
    async fn test_repeated_runs_have_matching_structure() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/todos")
            .with_status(201)
            .create_async()
            .await;
        let dir = tempfile::tempdir().unwrap();
        let rest = RestClientConfig::new(&server.url());
        let mut bench_config = config(&dir.path().join("first.csv"), true);
        bench_config.modes = vec![BenchmarkMode::SingleShotTime, BenchmarkMode::SingleShotTime];

        let first = BenchmarkRegistry::run_all_benchmarks(&rest, &bench_config)
            .await
            .unwrap();
        bench_config.output_path = dir.path().join("second.csv");
        let second = BenchmarkRegistry::run_all_benchmarks(&rest, &bench_config)
            .await
            .unwrap();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.mode, b.mode);
            assert_eq!(a.iterations, b.iterations);
            assert_eq!(a.operations, b.operations);
            assert_eq!(a.failures, b.failures);
            assert_eq!(a.requests_issued, b.requests_issued);
            assert_eq!(a.unit, b.unit);
        }
    }

    #[tokio::test]
    async fn test_invalid_config_fails_before_any_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/todos")
            .expect(0)
            .create_async()
            .await;
        let dir = tempfile::tempdir().unwrap();
        let mut bench_config = config(&dir.path().join("report.csv"), true);
        bench_config.iterations = 0;

        let err = BenchmarkRegistry::run_all_benchmarks(
            &RestClientConfig::new(&server.url()),
            &bench_config,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, BenchError::Configuration(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unwritable_report_is_output_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/todos")
            .with_status(201)
            .create_async()
            .await;
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let output = blocker.path().join("report.csv");

        let err = BenchmarkRegistry::run_all_benchmarks(
            &RestClientConfig::new(&server.url()),
            &config(&output, true),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, BenchError::Output(_)));
    }
}

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::benchmarks::{BenchmarkResult, OutputFormat};
use crate::error::{BenchError, Result};

pub const CSV_HEADER: [&str; 16] = [
    "Benchmark",
    "Mode",
    "Threads",
    "Iterations",
    "Operations",
    "Failures",
    "Warmup Failures",
    "Score",
    "Score Error",
    "Unit",
    "Mean (ms)",
    "P50 (ms)",
    "P95 (ms)",
    "P99 (ms)",
    "Min (ms)",
    "Max (ms)",
];

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    target: &'a str,
    results: &'a [BenchmarkResult],
}

/// Writes `results` to `path` in `format` and returns the written path.
pub fn write_report(
    results: &[BenchmarkResult],
    format: OutputFormat,
    path: &Path,
    target: &str,
) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            BenchError::Output(format!("failed to create {}: {}", parent.display(), e))
        })?;
    }

    match format {
        OutputFormat::Csv => write_csv(results, path)?,
        OutputFormat::Json => write_json(results, path, target)?,
    }

    Ok(path.to_path_buf())
}

fn write_csv(results: &[BenchmarkResult], path: &Path) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| BenchError::Output(format!("failed to create {}: {}", path.display(), e)))?;
    let mut wtr = csv::Writer::from_writer(file);

    let csv_error = |e: csv::Error| BenchError::Output(format!("csv: {}", e));

    wtr.write_record(CSV_HEADER).map_err(csv_error)?;
    for result in results {
        wtr.write_record(csv_row(result)).map_err(csv_error)?;
    }

    wtr.flush()
        .map_err(|e| BenchError::Output(format!("failed to flush {}: {}", path.display(), e)))
}

fn csv_row(result: &BenchmarkResult) -> Vec<String> {
    let ms = |d: std::time::Duration| format!("{:.3}", d.as_secs_f64() * 1_000.0);
    vec![
        result.name.clone(),
        result.mode.short_name().to_string(),
        result.threads.to_string(),
        result.iterations.to_string(),
        result.operations.to_string(),
        result.failures.to_string(),
        result.warmup_failures.to_string(),
        format!("{:.6}", result.score),
        format!("{:.6}", result.score_error),
        result.unit.clone(),
        ms(result.mean),
        ms(result.median),
        ms(result.p95),
        ms(result.p99),
        ms(result.min),
        ms(result.max),
    ]
}

fn write_json(results: &[BenchmarkResult], path: &Path, target: &str) -> Result<()> {
    let report = JsonReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        target,
        results,
    };
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| BenchError::Output(format!("failed to serialize report: {}", e)))?;

    fs::write(path, json)
        .map_err(|e| BenchError::Output(format!("failed to write {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::benchmarks::core::MeasurementSamples;
    use crate::benchmarks::{BenchmarkConfig, BenchmarkMode};

    fn sample_result(mode: BenchmarkMode) -> BenchmarkResult {
        let config = BenchmarkConfig {
            iterations: 2,
            ..Default::default()
        };
        let samples = MeasurementSamples {
            scores: vec![100.0, 120.0],
            latencies: vec![Duration::from_millis(8), Duration::from_millis(10)],
            operations: 2,
            failures: 1,
            requests_issued: 3,
            total_duration: Duration::from_millis(20),
            ..Default::default()
        };
        BenchmarkResult::from_samples("post_todo", mode, &config, samples)
    }

    #[test]
    fn test_csv_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.csv");
        let results = vec![
            sample_result(BenchmarkMode::Throughput),
            sample_result(BenchmarkMode::SingleShotTime),
        ];

        let written = write_report(&results, OutputFormat::Csv, &path, "http://localhost").unwrap();
        assert_eq!(written, path);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), CSV_HEADER.to_vec());

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "post_todo");
        assert_eq!(&rows[0][1], "thrpt");
        assert_eq!(&rows[0][3], "2");
        assert_eq!(&rows[0][5], "1");
        assert_eq!(&rows[0][7], "110.000000");
        assert_eq!(&rows[0][9], "ops/s");
        assert_eq!(&rows[1][1], "ss");
        assert_eq!(&rows[1][9], "s/op");
    }

    #[test]
    fn test_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let results = vec![sample_result(BenchmarkMode::Throughput)];

        write_report(&results, OutputFormat::Json, &path, "http://localhost:8080").unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["target"], "http://localhost:8080");
        assert_eq!(value["results"][0]["name"], "post_todo");
        assert_eq!(value["results"][0]["iterations"], 2);
        assert_eq!(value["results"][0]["failures"], 1);
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn test_unwritable_path_is_output_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().join("report.csv");

        let err = write_report(
            &[sample_result(BenchmarkMode::Throughput)],
            OutputFormat::Csv,
            &path,
            "http://localhost",
        )
        .unwrap_err();
        assert!(matches!(err, BenchError::Output(_)));
    }
}

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};

use ::todo_bench::benchmarks::{RetryConfig, TimeUnit};
use ::todo_bench::*;

/// Load-generation benchmark for a todo REST API.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Base URL of the todo API
    #[arg(long, env = "TODO_BENCH_URL", default_value = "http://localhost:8080")]
    url: String,

    #[arg(long, env = "TODO_BENCH_GET_PATH", default_value = "/todos")]
    get_path: String,

    #[arg(long, env = "TODO_BENCH_POST_PATH", default_value = "/todos")]
    post_path: String,

    #[arg(long, env = "TODO_BENCH_PUT_PATH", default_value = "/todos/{id}")]
    put_path: String,

    #[arg(long, env = "TODO_BENCH_DELETE_PATH", default_value = "/todos/{id}")]
    delete_path: String,

    #[arg(long, env = "TODO_BENCH_CONNECT_TIMEOUT_MS", default_value_t = 30_000)]
    connect_timeout_ms: u64,

    #[arg(long, env = "TODO_BENCH_REQUEST_TIMEOUT_MS", default_value_t = 30_000)]
    request_timeout_ms: u64,

    #[arg(long, env = "TODO_BENCH_MAX_CONNECTIONS_PER_ROUTE", default_value_t = 5)]
    max_connections_per_route: usize,

    /// HTTP method of the benchmarked request
    #[arg(long, value_enum, env = "TODO_BENCH_METHOD", default_value = "post")]
    method: HttpMethod,

    /// Request path, overriding the path configured for the method; `{id}` is expanded
    #[arg(long, env = "TODO_BENCH_TARGET_PATH")]
    target_path: Option<String>,

    /// Benchmark modes; each one runs as a separate trial
    #[arg(
        long = "mode",
        value_enum,
        value_delimiter = ',',
        env = "TODO_BENCH_MODES",
        default_value = "throughput"
    )]
    modes: Vec<BenchmarkMode>,

    #[arg(long, env = "TODO_BENCH_WARMUP_ITERATIONS", default_value_t = 1)]
    warmup_iterations: u32,

    /// Seconds per warmup iteration in throughput mode
    #[arg(long, env = "TODO_BENCH_WARMUP_TIME", default_value_t = 10)]
    warmup_time: u64,

    #[arg(long, env = "TODO_BENCH_ITERATIONS", default_value_t = 10)]
    iterations: u32,

    /// Seconds per measurement iteration in throughput mode
    #[arg(long, env = "TODO_BENCH_MEASUREMENT_TIME", default_value_t = 10)]
    measurement_time: u64,

    #[arg(long, value_enum, env = "TODO_BENCH_TIME_UNIT", default_value = "seconds")]
    time_unit: TimeUnit,

    #[arg(long, value_enum, env = "TODO_BENCH_FORMAT", default_value = "csv")]
    format: OutputFormat,

    #[arg(long, value_name = "PATH", env = "TODO_BENCH_OUTPUT", default_value = "bench-report.csv")]
    output: PathBuf,

    /// Abort the run on the first failed request
    #[arg(long, env = "TODO_BENCH_FAIL_ON_ERROR", default_value_t = true, action = ArgAction::Set)]
    fail_on_error: bool,

    #[arg(long, env = "TODO_BENCH_COOLDOWN_MS", default_value_t = 0)]
    cooldown_ms: u64,

    #[arg(long, default_value_t = false)]
    no_progress: bool,

    /// Wait for the list endpoint to answer before starting
    #[arg(long, env = "TODO_BENCH_WAIT_READY", default_value_t = false)]
    wait_ready: bool,

    #[arg(long, env = "TODO_BENCH_READY_POLL_MS", default_value_t = 500)]
    ready_poll_ms: u64,

    #[arg(long, env = "TODO_BENCH_READY_TIMEOUT_MS", default_value_t = 10_000)]
    ready_timeout_ms: u64,

    /// Also write logs to a daily rolling file in this directory
    #[arg(long, value_name = "PATH", env = "TODO_BENCH_LOGS_DIR")]
    logs_dir: Option<PathBuf>,
}

impl Args {
    fn rest_config(&self) -> RestClientConfig {
        RestClientConfig {
            url: self.url.clone(),
            todos_get_path: self.get_path.clone(),
            todos_post_path: self.post_path.clone(),
            todos_put_path: self.put_path.clone(),
            todos_delete_path: self.delete_path.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_connections_per_route: self.max_connections_per_route,
        }
    }

    fn benchmark_config(&self) -> BenchmarkConfig {
        BenchmarkConfig {
            method: self.method,
            target_path: self.target_path.clone(),
            modes: self.modes.clone(),
            warmup_iterations: self.warmup_iterations,
            warmup_time: Duration::from_secs(self.warmup_time),
            iterations: self.iterations,
            measurement_time: Duration::from_secs(self.measurement_time),
            time_unit: self.time_unit,
            output_format: self.format,
            output_path: self.output.clone(),
            fail_on_error: self.fail_on_error,
            cooldown_between_iterations: Duration::from_millis(self.cooldown_ms),
            show_progress: !self.no_progress,
            readiness: self.wait_ready.then(|| {
                RetryConfig::new(
                    Duration::from_millis(self.ready_poll_ms),
                    Duration::from_millis(self.ready_timeout_ms),
                )
            }),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    init_tracing(args.logs_dir.as_deref())?;

    tracing::info!("=== Starting Todo API Performance Benchmark ===");

    let rest = args.rest_config();
    let config = args.benchmark_config();

    let outcome = BenchmarkRegistry::run_all_benchmarks(&rest, &config).await;
    match &outcome {
        Ok(_) => tracing::info!("=== All Performance Benchmarks Completed Successfully ==="),
        Err(e) => tracing::error!("Benchmark run failed: {}", e),
    }

    flush_tracing();
    outcome.map(|_| ())
}

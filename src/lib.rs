use std::path::Path;
use std::sync::Mutex;

use once_cell::sync::OnceCell;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::EnvFilter, fmt::Layer, prelude::*, registry::Registry};

pub mod benchmarks;
pub mod client;
pub mod config;
mod error;
pub mod report;
pub mod todo;

pub use crate::benchmarks::registry::BenchmarkRegistry;
pub use crate::benchmarks::{BenchmarkConfig, BenchmarkMode, BenchmarkResult, OutputFormat};
pub use crate::client::{ResponseSummary, TodoRestClient};
pub use crate::config::{HttpMethod, RestClientConfig};
pub use crate::error::{BenchError, Result};
pub use crate::todo::{IdGenerator, RequestBuilder, TodoItem};

static TRACING_GUARDS: OnceCell<Mutex<Vec<WorkerGuard>>> = OnceCell::new();
static TRACING_INIT: OnceCell<()> = OnceCell::new();

/// Installs the global subscriber: stdout always, plus a daily rolling file
/// when `logs_dir` is given. Calling it again is a no-op.
pub fn init_tracing(logs_dir: Option<&Path>) -> Result<()> {
    TRACING_INIT
        .get_or_try_init(|| {
            let mut guards = Vec::with_capacity(2);

            let (non_blocking_stdout, stdout_guard) =
                tracing_appender::non_blocking(std::io::stdout());
            guards.push(stdout_guard);

            let stdout_layer = Layer::new()
                .with_writer(non_blocking_stdout)
                .with_ansi(true)
                .with_target(true);

            let file_layer = match logs_dir {
                Some(dir) => {
                    std::fs::create_dir_all(dir).map_err(|e| {
                        BenchError::LoggingSetup(format!(
                            "Failed to create logs directory {:?}: {}",
                            dir, e
                        ))
                    })?;
                    let file_appender = tracing_appender::rolling::RollingFileAppender::builder()
                        .rotation(tracing_appender::rolling::Rotation::DAILY)
                        .filename_prefix("todo-bench")
                        .filename_suffix("log")
                        .build(dir)
                        .map_err(|e| BenchError::LoggingSetup(e.to_string()))?;
                    let (non_blocking_file, file_guard) =
                        tracing_appender::non_blocking(file_appender);
                    guards.push(file_guard);
                    Some(
                        Layer::new()
                            .with_writer(non_blocking_file)
                            .with_ansi(false)
                            .with_target(true),
                    )
                }
                None => None,
            };

            TRACING_GUARDS.set(Mutex::new(guards)).ok();

            Registry::default()
                .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
                .with(stdout_layer)
                .with(file_layer)
                .try_init()
                .map_err(|e| BenchError::LoggingSetup(e.to_string()))
        })
        .map(|_| ())
}

/// Drops the non-blocking writer guards so buffered log lines reach their sinks.
/// Call once, right before the process exits.
pub fn flush_tracing() {
    if let Some(guards) = TRACING_GUARDS.get() {
        if let Ok(mut guards) = guards.lock() {
            guards.clear();
        }
    }
}

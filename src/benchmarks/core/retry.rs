use std::time::{Duration, Instant};

use crate::client::{ProbeOutcome, TodoRestClient};
use crate::error::{BenchError, Result};

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            timeout: Duration::from_millis(10_000),
        }
    }
}

impl RetryConfig {
    pub fn new(poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            poll_interval,
            timeout,
        }
    }
}

/// Polls the list endpoint until the target answers successfully.
///
/// A refused connection or a 5xx is waited out until `config.timeout`. Any
/// other transport failure, a 4xx or an unreadable list fails immediately.
pub async fn wait_until_ready(client: &TodoRestClient, config: &RetryConfig) -> Result<()> {
    let start = Instant::now();
    let mut attempts = 0u32;

    loop {
        attempts += 1;

        match client.probe().await {
            ProbeOutcome::Ready => {
                if attempts > 1 {
                    tracing::info!("✓ Target ready after {} attempts", attempts);
                }
                return Ok(());
            }
            ProbeOutcome::Starting(reason) => {
                if start.elapsed() + config.poll_interval > config.timeout {
                    tracing::error!(
                        "✗ Target not ready after {} attempts in {:?}: {}",
                        attempts,
                        start.elapsed(),
                        reason
                    );
                    return Err(BenchError::Connection(format!(
                        "target at {} not ready after {:?}: {}",
                        client.config().url,
                        config.timeout,
                        reason
                    )));
                }

                tracing::debug!(
                    "Probe {}: target still starting, waiting {:?}",
                    attempts,
                    config.poll_interval
                );
                tokio::time::sleep(config.poll_interval).await;
            }
            ProbeOutcome::EnvironmentBroken(e) => {
                tracing::error!("Something went wrong with the target environment: {}", e);
                return Err(e);
            }
            ProbeOutcome::Misconfigured(e) => {
                tracing::error!("Something went wrong with the benchmark configuration: {}", e);
                return Err(BenchError::Configuration(format!(
                    "readiness probe failed, check url and paths: {}",
                    e
                )));
            }
        }
    }
}

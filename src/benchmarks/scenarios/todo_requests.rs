use std::time::Duration;

use async_trait::async_trait;

use crate::benchmarks::core::TrialContext;
use crate::benchmarks::test_cases::SendTodoBenchmark;
use crate::benchmarks::{BenchmarkConfig, BenchmarkScenario, BenchmarkTestCase};
use crate::client::TodoRestClient;
use crate::config::RestClientConfig;
use crate::error::Result;
use crate::todo::{IdGenerator, RequestBuilder};

/// Benchmark scenario for measuring how fast the todo API accepts requests.
///
/// Every iteration builds a new todo with the next id of the trial and sends
/// it with the configured method, `POST /todos` by default. Each trial gets
/// its own client and id generator, so ids restart at 1 per trial and never
/// repeat within one.
pub struct TodoRequestBenchmark {
    name: String,
    config: BenchmarkConfig,
    test_case: SendTodoBenchmark,
}

impl TodoRequestBenchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Self {
            name: format!("{}_todo", config.method.to_string().to_lowercase()),
            config,
            test_case: SendTodoBenchmark::new(),
        }
    }
}

#[async_trait]
impl BenchmarkScenario for TodoRequestBenchmark {
    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    async fn setup(&mut self, rest: &RestClientConfig) -> Result<TrialContext> {
        let client = TodoRestClient::new(rest)?;
        let path = self
            .config
            .target_path
            .clone()
            .unwrap_or_else(|| rest.path_for(self.config.method).to_string());

        tracing::info!("Benchmarking {} {}{}", self.config.method, rest.url, path);

        Ok(TrialContext::new(
            client,
            RequestBuilder::new(IdGenerator::new()),
            self.config.method,
            &path,
        ))
    }

    async fn single_iteration(&self, context: &mut TrialContext) -> Result<Duration> {
        self.test_case.run_iteration(context).await
    }
}

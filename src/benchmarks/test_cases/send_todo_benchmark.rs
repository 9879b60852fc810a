use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::benchmarks::BenchmarkTestCase;
use crate::benchmarks::core::TrialContext;
use crate::error::Result;

/// Benchmark test case for sending one freshly built todo to the API.
///
/// Each call takes the next id from the trial's request builder, so every
/// executed iteration (warmup or measured) consumes exactly one id. The timed
/// section covers the request and draining of the response body.
pub struct SendTodoBenchmark;

impl SendTodoBenchmark {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SendTodoBenchmark {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BenchmarkTestCase for SendTodoBenchmark {
    async fn run_iteration(&self, context: &mut TrialContext) -> Result<Duration> {
        let item = context.requests.next_item();

        let start = Instant::now();
        let outcome = context
            .client
            .send(&item, context.method, &context.path_template)
            .await;
        let duration = start.elapsed();

        context.requests_sent += 1;
        let summary = outcome?;
        context.record_response(std::hint::black_box(summary));

        Ok(duration)
    }
}

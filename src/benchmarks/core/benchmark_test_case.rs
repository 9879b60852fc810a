use std::time::Duration;

use async_trait::async_trait;

use super::context::TrialContext;
use crate::error::Result;

/// Trait for atomic benchmark operations
#[async_trait]
pub trait BenchmarkTestCase: Send + Sync {
    /// Run a single iteration of the benchmark operation and return the duration
    async fn run_iteration(&self, context: &mut TrialContext) -> Result<Duration>;
}

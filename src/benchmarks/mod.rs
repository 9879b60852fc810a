pub mod core;
pub mod registry;
pub mod scenarios;
pub mod stats;
pub mod test_cases;

// Re-export commonly used items for convenience
pub use self::core::{
    BenchmarkConfig, BenchmarkMode, BenchmarkResult, BenchmarkScenario, BenchmarkTestCase,
    OutputFormat, RetryConfig, TimeUnit, TrialPhase,
};

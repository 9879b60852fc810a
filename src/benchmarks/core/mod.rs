pub mod benchmark_config;
pub mod benchmark_result;
pub mod benchmark_scenario;
pub mod benchmark_test_case;
pub mod context;
pub mod phase;
pub mod retry;

pub use benchmark_config::*;
pub use benchmark_result::*;
pub use benchmark_scenario::*;
pub use benchmark_test_case::*;
pub use context::*;
pub use phase::*;
pub use retry::*;

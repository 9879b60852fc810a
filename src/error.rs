use thiserror::Error;

use crate::benchmarks::TrialPhase;

pub type Result<T> = core::result::Result<T, BenchError>;

#[derive(Error, Debug)]
pub enum BenchError {
    /// Target unreachable, timed out, or the transport failed mid-request.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Non-2xx status or a response that could not be read.
    #[error("Protocol error (status {status}): {message}")]
    Protocol { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error("Benchmark '{benchmark}' aborted during {phase} iteration {iteration}: {source}")]
    Aborted {
        benchmark: String,
        phase: TrialPhase,
        iteration: u32,
        #[source]
        source: Box<BenchError>,
    },

    #[error("Logging setup error: {0}")]
    LoggingSetup(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl BenchError {
    /// Errors raised by a single request. These are counted instead of
    /// propagated when the trial is not running fail-fast.
    pub fn is_request_failure(&self) -> bool {
        matches!(self, BenchError::Connection(_) | BenchError::Protocol { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            BenchError::Protocol { status, .. } => Some(*status),
            BenchError::Aborted { source, .. } => source.status(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BenchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return BenchError::Protocol {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }
        if err.is_builder() {
            return BenchError::Configuration(err.to_string());
        }
        if err.is_decode() {
            return BenchError::Protocol {
                status: 0,
                message: err.to_string(),
            };
        }
        BenchError::Connection(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failures() {
        assert!(BenchError::Connection("refused".to_string()).is_request_failure());
        assert!(
            BenchError::Protocol {
                status: 500,
                message: "boom".to_string()
            }
            .is_request_failure()
        );
        assert!(!BenchError::Configuration("bad url".to_string()).is_request_failure());
        assert!(!BenchError::Output("read-only".to_string()).is_request_failure());
    }

    #[test]
    fn test_aborted_exposes_inner_status() {
        let err = BenchError::Aborted {
            benchmark: "post_todo".to_string(),
            phase: TrialPhase::Measuring,
            iteration: 3,
            source: Box::new(BenchError::Protocol {
                status: 503,
                message: "unavailable".to_string(),
            }),
        };
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("post_todo"));
        assert!(err.to_string().contains("measuring"));
    }
}

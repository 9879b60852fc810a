use std::fmt;

use serde::Serialize;

use crate::error::{BenchError, Result};

/// Lifecycle of a single trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrialPhase {
    Idle,
    Warmup,
    Measuring,
    Reporting,
    Done,
}

impl TrialPhase {
    pub fn next(self) -> Option<TrialPhase> {
        match self {
            TrialPhase::Idle => Some(TrialPhase::Warmup),
            TrialPhase::Warmup => Some(TrialPhase::Measuring),
            TrialPhase::Measuring => Some(TrialPhase::Reporting),
            TrialPhase::Reporting => Some(TrialPhase::Done),
            TrialPhase::Done => None,
        }
    }
}

impl fmt::Display for TrialPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrialPhase::Idle => write!(f, "idle"),
            TrialPhase::Warmup => write!(f, "warmup"),
            TrialPhase::Measuring => write!(f, "measuring"),
            TrialPhase::Reporting => write!(f, "reporting"),
            TrialPhase::Done => write!(f, "done"),
        }
    }
}

/// Enforces the forward-only phase order of a trial.
#[derive(Debug)]
pub struct PhaseTracker {
    benchmark: String,
    phase: TrialPhase,
}

impl PhaseTracker {
    pub fn new(benchmark: &str) -> Self {
        Self {
            benchmark: benchmark.to_string(),
            phase: TrialPhase::Idle,
        }
    }

    pub fn current(&self) -> TrialPhase {
        self.phase
    }

    pub fn advance(&mut self, to: TrialPhase) -> Result<()> {
        if self.phase.next() != Some(to) {
            return Err(BenchError::Other(anyhow::anyhow!(
                "illegal phase transition for '{}': {} -> {}",
                self.benchmark,
                self.phase,
                to
            )));
        }
        tracing::debug!("{}: {} -> {}", self.benchmark, self.phase, to);
        self.phase = to;
        Ok(())
    }
}

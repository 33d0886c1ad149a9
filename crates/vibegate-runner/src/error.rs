//! Error types for the runner crate.

use thiserror::Error;

/// Runner execution errors for scanner subprocess invocation.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// The program could not be spawned at all.
    ///
    /// `tool_missing` is true when the OS reported that the executable does
    /// not exist, so callers can distinguish a missing scanner from a
    /// scanner that crashed.
    #[error("failed to spawn '{program}': {reason}")]
    SpawnFailed {
        program: String,
        reason: String,
        tool_missing: bool,
    },

    #[error("execution failed: {reason}")]
    ExecutionFailed { reason: String },

    #[error("execution timed out after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },
}

impl RunnerError {
    /// True when the underlying cause is a missing executable.
    #[must_use]
    pub fn is_tool_missing(&self) -> bool {
        matches!(self, Self::SpawnFailed { tool_missing: true, .. })
    }

    /// True when the underlying cause is an exceeded wall-clock bound.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

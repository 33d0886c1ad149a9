//! Result types for gate evaluation.

use serde::{Deserialize, Serialize};

/// Terminal status of a single check.
///
/// A check moves `Pending -> Running ->` one of these; there are no retries
/// within a gate invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// The tool ran and exited 0.
    Passed,
    /// The tool ran and reported a violation via its own non-zero exit.
    Failed,
    /// The tool could not run: missing binary, timeout, or abnormal
    /// termination. Treated like `Failed` for blocking purposes.
    Errored,
    /// The check's predicate required staged files and none matched.
    Skipped,
}

impl CheckStatus {
    /// String form used in reports and JSON output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Errored => "errored",
            Self::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one check invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Identifier of the check this result belongs to.
    pub check_id: String,

    /// Human-readable label of the check.
    pub label: String,

    /// Terminal status.
    pub status: CheckStatus,

    /// Exit code of the tool, when it produced one.
    pub exit_code: Option<i32>,

    /// Captured diagnostic text (stdout + stderr, or the runner error).
    pub output: String,

    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,

    /// Whether a Failed/Errored status blocks the commit.
    pub blocking: bool,
}

impl CheckResult {
    /// Whether this result flips the verdict to blocked.
    ///
    /// Errored blocks exactly like Failed: the gate fails closed when a
    /// scanner cannot run.
    #[must_use]
    pub fn blocks(&self) -> bool {
        self.blocking && matches!(self.status, CheckStatus::Failed | CheckStatus::Errored)
    }
}

/// Outcome of branch policy evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchOutcome {
    /// The branch the commit targets.
    pub branch: String,

    /// Whether the branch is in the protected set.
    pub protected: bool,

    /// Whether commits to this branch are allowed (`!protected`).
    pub allowed: bool,
}

/// The aggregated allow/block decision for one gate invocation.
///
/// Derived value, recomputed every invocation, never persisted. Invariant:
/// `allowed` is true iff the branch is allowed and every blocking check
/// result is Passed or Skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateVerdict {
    /// Whether the commit is allowed.
    pub allowed: bool,

    /// Human-readable summary of the decision.
    pub summary: String,

    /// Branch policy outcome.
    pub branch: BranchOutcome,

    /// All check results, sorted by check id for determinism.
    pub results: Vec<CheckResult>,

    /// One line per blocking cause.
    pub blocking_reasons: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(status: CheckStatus, blocking: bool) -> CheckResult {
        CheckResult {
            check_id: "test".to_string(),
            label: "Test".to_string(),
            status,
            exit_code: None,
            output: String::new(),
            duration_ms: 0,
            blocking,
        }
    }

    #[test]
    fn test_blocks_fails_closed_on_errored() {
        assert!(result(CheckStatus::Failed, true).blocks());
        assert!(result(CheckStatus::Errored, true).blocks());
        assert!(!result(CheckStatus::Passed, true).blocks());
        assert!(!result(CheckStatus::Skipped, true).blocks());
    }

    #[test]
    fn test_non_blocking_never_blocks() {
        assert!(!result(CheckStatus::Failed, false).blocks());
        assert!(!result(CheckStatus::Errored, false).blocks());
    }

    #[test]
    fn test_status_serde_is_lowercase() {
        let json = serde_json::to_string(&CheckStatus::Errored).unwrap();
        assert_eq!(json, "\"errored\"");
        assert_eq!(CheckStatus::Errored.to_string(), "errored");
    }
}

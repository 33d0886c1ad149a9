//! Result aggregation: combining the branch outcome and all check results
//! into one deterministic verdict.

use crate::types::{BranchOutcome, CheckResult, CheckStatus, GateVerdict};

/// Maximum length of the diagnostic excerpt carried in a blocking reason.
const EXCERPT_MAX_LEN: usize = 160;

/// Combine the branch outcome and all check results into a verdict.
///
/// The verdict is blocked if the branch is not allowed, or if any blocking
/// result is Failed or Errored. Errored blocks identically to Failed: the
/// gate never silently allows a commit because a scanner could not run.
/// Non-blocking failures contribute no reason and never flip `allowed`.
///
/// Results are re-sorted by check id regardless of completion order so the
/// rendered report is reproducible for identical inputs.
#[must_use]
pub fn aggregate(branch: BranchOutcome, mut results: Vec<CheckResult>) -> GateVerdict {
    results.sort_by(|a, b| a.check_id.cmp(&b.check_id));

    let mut blocking_reasons = Vec::new();

    if !branch.allowed {
        blocking_reasons.push(format!(
            "commit rejected: branch '{}' is protected",
            branch.branch
        ));
    }

    for result in &results {
        if !result.blocks() {
            continue;
        }
        // The reason text always distinguishes "found a violation" from
        // "could not run", even though both block identically.
        let cause = match result.status {
            CheckStatus::Failed => "found a violation",
            CheckStatus::Errored => "could not run",
            CheckStatus::Passed | CheckStatus::Skipped => unreachable!("blocks() excludes these"),
        };
        match excerpt(&result.output) {
            Some(detail) => {
                blocking_reasons.push(format!("{}: {cause}: {detail}", result.check_id));
            }
            None => blocking_reasons.push(format!("{}: {cause}", result.check_id)),
        }
    }

    let allowed = blocking_reasons.is_empty();
    let summary = if allowed {
        "all checks passed, commit allowed".to_string()
    } else {
        format!(
            "commit blocked ({} blocking reason{})",
            blocking_reasons.len(),
            if blocking_reasons.len() == 1 { "" } else { "s" }
        )
    };

    GateVerdict {
        allowed,
        summary,
        branch,
        results,
        blocking_reasons,
    }
}

/// First non-empty line of the diagnostic output, capped at
/// [`EXCERPT_MAX_LEN`] characters.
fn excerpt(output: &str) -> Option<String> {
    let line = output.lines().map(str::trim).find(|l| !l.is_empty())?;
    let mut line = line.to_string();
    if line.chars().count() > EXCERPT_MAX_LEN {
        line = line.chars().take(EXCERPT_MAX_LEN).collect::<String>() + "...";
    }
    Some(line)
}

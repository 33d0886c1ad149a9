//! Verdict rendering and exit-code selection.

use std::fmt::Write as _;
use vibegate_gate::{GateVerdict, exit_codes};

/// Select the process exit code for a verdict.
///
/// `0` iff the commit is allowed; a single fixed non-zero code otherwise.
/// The report text carries the individual reasons, so block causes are not
/// distinguished by exit code.
#[must_use]
pub fn exit_code(verdict: &GateVerdict) -> i32 {
    if verdict.allowed {
        exit_codes::SUCCESS
    } else {
        exit_codes::BLOCKED
    }
}

/// Render the plain-text report.
///
/// On allow: a single confirmation line. On block: every blocking reason,
/// followed by a per-check status table so "found a violation" and "could
/// not run" stay distinguishable at a glance.
#[must_use]
pub fn render_text(verdict: &GateVerdict) -> String {
    let mut out = String::new();

    if verdict.allowed {
        let _ = writeln!(out, "vibegate: {}", verdict.summary);
        return out;
    }

    let _ = writeln!(out, "vibegate: {}", verdict.summary);
    for reason in &verdict.blocking_reasons {
        let _ = writeln!(out, "  blocked: {reason}");
    }

    if !verdict.results.is_empty() {
        let _ = writeln!(out);
        let width = verdict
            .results
            .iter()
            .map(|r| r.check_id.len())
            .max()
            .unwrap_or(0);
        for result in &verdict.results {
            let _ = writeln!(
                out,
                "  {:width$}  {:7}  {:>6} ms",
                result.check_id,
                result.status.as_str(),
                result.duration_ms,
            );
        }
    }

    out
}

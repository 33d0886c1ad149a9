//! The gate state machine: toggle read, branch policy, applicability,
//! concurrent dispatch, aggregation.

use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use tracing::{debug, info};
use vibegate_config::Config;
use vibegate_gate::{BranchOutcome, GateVerdict, ToggleStore, aggregate, evaluate_branch};
use vibegate_runner::ProcessRunner;

use crate::registry;

/// Everything the gate needs to know about one commit attempt.
///
/// Built from git introspection by the CLI; tests construct it directly.
#[derive(Debug, Clone)]
pub struct GateContext {
    /// Repository root; checks run with this as their working directory.
    pub repo_root: Utf8PathBuf,

    /// Branch the commit targets.
    pub branch: String,

    /// Repo-relative staged file paths.
    pub staged: Vec<Utf8PathBuf>,
}

/// Resolve the toggle store location for a repository.
///
/// The configured path wins (relative paths resolve against the repo root);
/// the default lives inside `.git/`, which keeps the sentinel durable across
/// invocations but never part of the scanned content.
#[must_use]
pub fn toggle_store(config: &Config, repo_root: &Utf8Path) -> ToggleStore {
    match &config.toggle.path {
        Some(path) if path.is_absolute() => ToggleStore::new(path.clone()),
        Some(path) => ToggleStore::new(repo_root.as_std_path().join(path)),
        None => ToggleStore::new(
            repo_root
                .as_std_path()
                .join(".git")
                .join("vibegate-disabled.toml"),
        ),
    }
}

/// Decide whether the commit described by `ctx` is allowed.
///
/// Control flow: toggle read (disabled: allow with zero checks) -> branch
/// policy (violation: block with zero checks) -> applicability -> concurrent
/// dispatch -> aggregation. The branch check and the toggle are the only
/// early exits; once checks are dispatched they all run to a terminal
/// status.
pub fn evaluate(
    ctx: &GateContext,
    config: &Config,
    toggle: &ToggleStore,
    runner: &(dyn ProcessRunner + Sync),
) -> Result<GateVerdict> {
    let state = toggle.state(Utc::now())?;
    if !state.enabled {
        let actor = state
            .record
            .as_ref()
            .and_then(|r| r.disabled_by.as_deref())
            .unwrap_or("unknown");
        info!(disabled_by = %actor, "gate disabled, allowing commit without checks");
        return Ok(GateVerdict {
            allowed: true,
            summary: format!("gate disabled (by {actor}), commit allowed without checks"),
            branch: BranchOutcome {
                branch: ctx.branch.clone(),
                protected: false,
                allowed: true,
            },
            results: Vec::new(),
            blocking_reasons: Vec::new(),
        });
    }

    let branch = evaluate_branch(&ctx.branch, &config.protected_branches);
    if !branch.allowed {
        // Fail fast: no scanner subprocess is started at all.
        info!(branch = %branch.branch, "protected branch, blocking without running checks");
        return Ok(aggregate(branch, Vec::new()));
    }

    let applicable = registry::applicable_checks(&config.checks, &ctx.staged)?;
    let pool_size = config.worker_pool_size.unwrap_or(applicable.len().max(1));
    debug!(
        checks = applicable.len(),
        staged = ctx.staged.len(),
        pool_size,
        "dispatching applicable checks"
    );

    let results = crate::dispatch::run_all(applicable, &ctx.repo_root, runner, pool_size);
    Ok(aggregate(branch, results))
}

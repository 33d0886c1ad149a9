//! Check execution: subprocess invocation with status mapping, and the
//! bounded worker pool that runs independent checks concurrently.

use camino::{Utf8Path, Utf8PathBuf};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::mpsc;
use std::time::Instant;
use tracing::{debug, info, warn};
use vibegate_config::CheckSpec;
use vibegate_gate::{CheckResult, CheckStatus};
use vibegate_runner::{CommandSpec, ProcessRunner};

use crate::registry::ApplicableCheck;

/// Expand a check's argv template into a concrete command.
///
/// `{files}` splices the matched staged files, one argument each; `{repo}`
/// expands to the repository root. Everything else is passed literally.
fn expand_command(spec: &CheckSpec, matched: &[Utf8PathBuf], repo: &Utf8Path) -> CommandSpec {
    let mut cmd = CommandSpec::new(&spec.command[0]).cwd(repo.as_std_path());
    for arg in &spec.command[1..] {
        match arg.as_str() {
            "{files}" => {
                cmd = cmd.args(matched.iter().map(|p| p.as_str()));
            }
            "{repo}" => {
                cmd = cmd.arg(repo.as_str());
            }
            _ => {
                cmd = cmd.arg(arg);
            }
        }
    }
    cmd
}

fn errored(spec: &CheckSpec, output: String, started: Instant) -> CheckResult {
    CheckResult {
        check_id: spec.id.clone(),
        label: spec.label().to_string(),
        status: CheckStatus::Errored,
        exit_code: None,
        output,
        duration_ms: started.elapsed().as_millis() as u64,
        blocking: spec.blocking,
    }
}

/// Run one check to a terminal status.
///
/// Status mapping: exit 0 is Passed; any other exit code is the tool's own
/// "found a problem" signal and maps to Failed; a missing binary, an
/// exceeded timeout, or an abnormal termination maps to Errored; a
/// file-scoped check with no matched files maps to Skipped without
/// spawning anything. Errors never escape: a misbehaving scanner degrades
/// to an Errored result instead of crashing the gate.
pub fn run_check(
    spec: &CheckSpec,
    matched: &[Utf8PathBuf],
    repo: &Utf8Path,
    runner: &dyn ProcessRunner,
) -> CheckResult {
    let started = Instant::now();

    if !spec.files.is_always() && matched.is_empty() {
        debug!(check_id = %spec.id, "no staged files matched, skipping");
        return CheckResult {
            check_id: spec.id.clone(),
            label: spec.label().to_string(),
            status: CheckStatus::Skipped,
            exit_code: None,
            output: String::new(),
            duration_ms: 0,
            blocking: spec.blocking,
        };
    }

    let program = &spec.command[0];
    if which::which(program).is_err() {
        warn!(check_id = %spec.id, program = %program, "scanner not found on PATH");
        return errored(spec, format!("tool '{program}' not found on PATH"), started);
    }

    let cmd = expand_command(spec, matched, repo);
    debug!(check_id = %spec.id, program = %program, files = matched.len(), "dispatching check");

    let result = match runner.run(&cmd, spec.timeout_duration()) {
        Ok(output) => {
            let mut text = output.stdout_string();
            let stderr = output.stderr_string();
            if !stderr.is_empty() {
                if !text.is_empty() {
                    text.push('\n');
                }
                text.push_str(&stderr);
            }
            let status = match output.exit_code {
                Some(0) => CheckStatus::Passed,
                Some(_) => CheckStatus::Failed,
                // Killed by a signal: infrastructure failure, not a finding
                None => CheckStatus::Errored,
            };
            CheckResult {
                check_id: spec.id.clone(),
                label: spec.label().to_string(),
                status,
                exit_code: output.exit_code,
                output: text,
                duration_ms: started.elapsed().as_millis() as u64,
                blocking: spec.blocking,
            }
        }
        // Missing binary, timeout, malformed invocation: the check could
        // not run, which blocks exactly like a finding would.
        Err(e) => errored(spec, e.to_string(), started),
    };

    info!(
        check_id = %result.check_id,
        status = %result.status,
        duration_ms = result.duration_ms,
        "check finished"
    );
    result
}

/// Run all applicable checks on a bounded worker pool.
///
/// Each worker pulls the next check off a shared queue, blocks on its
/// subprocess (or timeout), and sends the result back over a channel. A
/// failing check never aborts its siblings; every check runs to a terminal
/// status so the operator sees the full picture. Total wall-clock time is
/// bounded by the slowest surviving check, not the sum of all checks.
///
/// The returned order is unspecified; the aggregator re-sorts by check id.
pub fn run_all(
    checks: Vec<ApplicableCheck>,
    repo: &Utf8Path,
    runner: &(dyn ProcessRunner + Sync),
    pool_size: usize,
) -> Vec<CheckResult> {
    if checks.is_empty() {
        return Vec::new();
    }

    let workers = pool_size.clamp(1, checks.len());
    let queue: Mutex<VecDeque<ApplicableCheck>> = Mutex::new(checks.into());
    let (tx, rx) = mpsc::channel();

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let tx = tx.clone();
            let queue = &queue;
            scope.spawn(move || {
                loop {
                    let job = queue
                        .lock()
                        .unwrap_or_else(std::sync::PoisonError::into_inner)
                        .pop_front();
                    let Some(job) = job else { break };
                    let result = run_check(&job.spec, &job.matched, repo, runner);
                    if tx.send(result).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);
    });

    rx.into_iter().collect()
}

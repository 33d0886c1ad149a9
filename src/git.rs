//! Git introspection: repository root, current branch, staged file set.
//!
//! The gate derives everything from the repository's own plumbing commands,
//! invoked through the same argv-style runner the scanners use.

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use std::path::Path;
use std::time::Duration;
use vibegate_runner::{CommandSpec, ProcessRunner};

/// Timeout for git plumbing commands. These are local metadata reads and
/// never legitimately take this long.
const GIT_TIMEOUT: Duration = Duration::from_secs(30);

fn run_git(runner: &dyn ProcessRunner, cwd: &Path, args: &[&str]) -> Result<String> {
    let cmd = CommandSpec::new("git").args(args.iter().copied()).cwd(cwd);
    let output = runner
        .run(&cmd, GIT_TIMEOUT)
        .with_context(|| format!("failed to run git {}", args.join(" ")))?;

    if !output.success() {
        return Err(anyhow!(
            "git {} failed with exit code {:?}: {}",
            args.join(" "),
            output.exit_code,
            output.stderr_string().trim()
        ));
    }

    Ok(output.stdout_string())
}

/// Resolve the repository root containing `cwd`.
pub fn repo_root(runner: &dyn ProcessRunner, cwd: &Path) -> Result<Utf8PathBuf> {
    let stdout = run_git(runner, cwd, &["rev-parse", "--show-toplevel"])?;
    let root = stdout.trim();
    if root.is_empty() {
        return Err(anyhow!("git rev-parse returned an empty repository root"));
    }
    Ok(Utf8PathBuf::from(root))
}

/// The branch name of HEAD.
///
/// `git branch --show-current` reads the symbolic ref without resolving a
/// commit, so it works on an unborn branch (a fresh repository before its
/// first commit, where `rev-parse HEAD` exits 128). A detached HEAD yields
/// no branch name; that maps to the literal `HEAD`, which never matches a
/// protected branch.
pub fn current_branch(runner: &dyn ProcessRunner, repo: &Utf8Path) -> Result<String> {
    let stdout = run_git(runner, repo.as_std_path(), &["branch", "--show-current"])?;
    let branch = stdout.trim();
    if branch.is_empty() {
        return Ok("HEAD".to_string());
    }
    Ok(branch.to_string())
}

/// Repo-relative paths of all files staged for commit.
///
/// Uses NUL-separated output so file names containing newlines or spaces
/// survive intact, and filters to added/copied/modified/renamed entries
/// (deletions have no content to scan). The result is sorted so downstream
/// matching never depends on git's iteration order.
pub fn staged_files(runner: &dyn ProcessRunner, repo: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let stdout = run_git(
        runner,
        repo.as_std_path(),
        &[
            "diff",
            "--cached",
            "--name-only",
            "-z",
            "--diff-filter=ACMR",
        ],
    )?;

    let mut files: Vec<Utf8PathBuf> = stdout
        .split('\0')
        .filter(|s| !s.is_empty())
        .map(Utf8PathBuf::from)
        .collect();
    files.sort();
    Ok(files)
}

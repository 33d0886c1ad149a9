//! Git introspection against a real throwaway repository.
//!
//! Skipped when git is not on PATH.

#![cfg(unix)]

use std::path::Path;
use std::process::Command;

use vibegate::orchestrator;
use vibegate::{Config, NativeRunner, git};
use camino::Utf8PathBuf;

fn git_available() -> bool {
    which::which("git").is_ok()
}

fn run_git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap_or_else(|e| panic!("git {args:?} failed to start: {e}"));
    assert!(
        status.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&status.stderr)
    );
}

fn init_repo(dir: &Path) {
    run_git(dir, &["init"]);
    run_git(dir, &["config", "user.email", "test@test.com"]);
    run_git(dir, &["config", "user.name", "Test"]);
    run_git(dir, &["checkout", "-b", "feature/test"]);
}

#[test]
fn introspection_reads_branch_and_staged_set() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }

    let dir = tempfile::TempDir::new().unwrap();
    init_repo(dir.path());

    std::fs::write(dir.path().join("zeta.py"), "x = 1\n").unwrap();
    std::fs::write(dir.path().join("alpha.py"), "y = 2\n").unwrap();
    std::fs::write(dir.path().join("unstaged.txt"), "not added\n").unwrap();
    run_git(dir.path(), &["add", "zeta.py", "alpha.py"]);

    let runner = NativeRunner::new();
    let root = git::repo_root(&runner, dir.path()).unwrap();
    assert!(root.as_std_path().join(".git").exists());

    // No commit exists yet: the branch is unborn, exactly the state of a
    // repository's very first commit, and must still resolve by name.
    let branch = git::current_branch(&runner, &root).unwrap();
    assert_eq!(branch, "feature/test");

    let staged = git::staged_files(&runner, &root).unwrap();
    assert_eq!(
        staged,
        vec![Utf8PathBuf::from("alpha.py"), Utf8PathBuf::from("zeta.py")]
    );
}

#[test]
fn default_toggle_sentinel_lives_inside_git_dir() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }

    let dir = tempfile::TempDir::new().unwrap();
    init_repo(dir.path());

    let runner = NativeRunner::new();
    let root = git::repo_root(&runner, dir.path()).unwrap();

    let config = Config::default();
    let toggle = orchestrator::toggle_store(&config, &root);
    toggle.disable(Some("ci"), chrono::Utc::now(), None).unwrap();

    // The sentinel must never be part of the scanned working tree
    assert!(toggle.path().starts_with(root.as_std_path().join(".git")));
    assert!(toggle.path().exists());

    // And git must not see it as an untracked file
    let out = Command::new("git")
        .args(["status", "--porcelain"])
        .current_dir(root.as_std_path())
        .output()
        .unwrap();
    let status = String::from_utf8_lossy(&out.stdout);
    assert!(
        !status.contains("vibegate-disabled"),
        "toggle sentinel leaked into the working tree: {status}"
    );
}

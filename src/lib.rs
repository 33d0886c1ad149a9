//! vibegate - commit-time security gate
//!
//! vibegate is installed as a git pre-commit hook. On every commit attempt
//! it reads the operator toggle, enforces branch policy, fans the staged
//! file set out to a configured registry of scanners (lint, secret
//! detection, vulnerability scan, file checks) running as time-bounded
//! subprocesses, and aggregates their outcomes into a single deterministic
//! allow/block verdict.
//!
//! The gate fails closed: a scanner that cannot run blocks the commit just
//! like a scanner that found a violation. The only fail-open element is the
//! operator toggle itself, so a misconfigured gate can always be recovered.
//!
//! # Quick start
//!
//! ```bash
//! # Run the gate the way the pre-commit hook does
//! vibegate run
//!
//! # Temporarily disable enforcement, then restore it
//! vibegate disable --actor alice --expires 2h
//! vibegate enable
//!
//! # Inspect toggle state and the registered checks
//! vibegate status
//! ```
//!
//! Exit codes: `0` commit allowed, `1` commit blocked, `2` configuration
//! error (detected before any check ran).

pub mod cli;
pub mod dispatch;
pub mod git;
pub mod logging;
pub mod orchestrator;
pub mod registry;
pub mod reporter;

// Stable re-exports for library consumers
pub use orchestrator::{GateContext, evaluate};
pub use vibegate_config::{CheckSpec, Config, ConfigError, FilePredicate};
pub use vibegate_gate::{BranchOutcome, CheckResult, CheckStatus, GateVerdict, ToggleStore};
pub use vibegate_runner::{CommandSpec, NativeRunner, ProcessRunner};

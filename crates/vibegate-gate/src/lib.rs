//! Gate decision logic for vibegate: branch policy, the operator toggle,
//! and deterministic aggregation of check results into a verdict.

pub mod aggregate;
pub mod branch;
pub mod exit_codes;
pub mod json;
pub mod toggle;
pub mod types;

// Re-exports for convenience
pub use aggregate::aggregate;
pub use branch::evaluate_branch;
pub use exit_codes::{BLOCKED, CONFIG, SUCCESS};
pub use json::emit_verdict_json;
pub use toggle::{ToggleRecord, ToggleState, ToggleStore};
pub use types::{BranchOutcome, CheckResult, CheckStatus, GateVerdict};

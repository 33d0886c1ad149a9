//! Exit code constants for the gate.

/// Success - commit allowed
pub const SUCCESS: i32 = 0;

/// Commit blocked - branch policy violation or a blocking check failed/errored
pub const BLOCKED: i32 = 1;

/// Configuration error - detected before any check ran
pub const CONFIG: i32 = 2;

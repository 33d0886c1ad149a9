//! Canonical JSON emission for gate verdicts.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::types::GateVerdict;

/// Emit a value as canonical JSON using JCS (RFC 8785).
fn emit_jcs<T: Serialize>(value: &T) -> Result<String> {
    let json_value = serde_json::to_value(value).context("failed to serialize value to JSON")?;
    let json_bytes = serde_json_canonicalizer::to_vec(&json_value)
        .context("failed to canonicalize JSON using JCS")?;
    String::from_utf8(json_bytes).context("JCS output contained invalid UTF-8")
}

/// Emit a gate verdict as canonical JSON for deterministic output and
/// stable diffs across invocations with identical inputs.
pub fn emit_verdict_json(verdict: &GateVerdict) -> Result<String> {
    emit_jcs(verdict).context("failed to emit verdict JSON")
}

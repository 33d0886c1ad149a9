//! Operator toggle: persisted enable/disable state for the entire gate.
//!
//! The toggle is a sentinel file. Presence means the gate is disabled;
//! absence means enabled. Absence-as-enabled is the one deliberately
//! fail-open flag in the system so an operator can always recover a
//! misconfigured gate. The sentinel lives outside the tracked working tree
//! (default: inside `.git/`) so toggling is never itself scanned content.
//!
//! Each gate invocation is a fresh process, so the state is durable on
//! disk and read exactly once at invocation start.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Metadata recorded by a disable operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToggleRecord {
    /// Who disabled the gate.
    #[serde(default)]
    pub disabled_by: Option<String>,

    /// When the gate was disabled.
    #[serde(default)]
    pub disabled_at: Option<DateTime<Utc>>,

    /// When the disable expires on its own. Absent means it never does and
    /// an explicit `enable` is required.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Toggle state as read at invocation start.
#[derive(Debug, Clone)]
pub struct ToggleState {
    /// Whether the gate is enforcing.
    pub enabled: bool,

    /// The sentinel record, when one exists.
    pub record: Option<ToggleRecord>,
}

/// Persisted on/off flag for the gate.
#[derive(Debug, Clone)]
pub struct ToggleStore {
    path: PathBuf,
}

impl ToggleStore {
    /// Create a store backed by the given sentinel path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The sentinel file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the toggle state.
    ///
    /// A sentinel with an `expires_at` in the past counts as enabled. A
    /// sentinel that exists but cannot be parsed still counts as disabled:
    /// presence/absence is the authoritative signal, the metadata is
    /// informational.
    pub fn state(&self, now: DateTime<Utc>) -> Result<ToggleState> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ToggleState {
                    enabled: true,
                    record: None,
                });
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("failed to read toggle sentinel {}", self.path.display())
                });
            }
        };

        let record: ToggleRecord = toml::from_str(&content).unwrap_or_default();

        let expired = record.expires_at.is_some_and(|expires| expires <= now);

        Ok(ToggleState {
            enabled: expired,
            record: Some(record),
        })
    }

    /// Whether the gate is currently enforcing.
    pub fn is_enabled(&self, now: DateTime<Utc>) -> Result<bool> {
        Ok(self.state(now)?.enabled)
    }

    /// Disable the gate by writing the sentinel.
    ///
    /// Idempotent: disabling an already-disabled gate is a no-op success
    /// and returns `false`, leaving the existing record in place.
    pub fn disable(
        &self,
        actor: Option<&str>,
        now: DateTime<Utc>,
        expires_after: Option<Duration>,
    ) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }

        let expires_at = match expires_after {
            Some(d) => {
                // An out-of-range duration must fail loudly rather than be
                // written as an already-expired sentinel.
                let delta = chrono::TimeDelta::from_std(d)
                    .with_context(|| format!("expiry duration {d:?} is out of range"))?;
                Some(now + delta)
            }
            None => None,
        };

        let record = ToggleRecord {
            disabled_by: actor.map(str::to_string),
            disabled_at: Some(now),
            expires_at,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create toggle directory {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(&record).context("failed to encode toggle record")?;
        std::fs::write(&self.path, content).with_context(|| {
            format!("failed to write toggle sentinel {}", self.path.display())
        })?;

        Ok(true)
    }

    /// Enable the gate by removing the sentinel.
    ///
    /// Idempotent: enabling an already-enabled gate is a no-op success and
    /// returns `false`.
    pub fn enable(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| {
                format!("failed to remove toggle sentinel {}", self.path.display())
            }),
        }
    }
}

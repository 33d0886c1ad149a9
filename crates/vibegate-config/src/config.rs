//! Configuration model for vibegate.
//!
//! Supports TOML configuration files with `[[checks]]`, `protected_branches`,
//! `worker_pool_size`, and a `[toggle]` section. Every field has a default;
//! an absent config file yields the built-in check registry.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default per-check timeout in seconds.
pub const DEFAULT_CHECK_TIMEOUT_SECS: u64 = 120;

/// Configuration errors.
///
/// These are detected before any check runs and abort the gate with a
/// configuration diagnostic, distinct from a scan failure.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read config file {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("failed to parse config file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("invalid config value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// File-applicability predicate for a check.
///
/// Serialized as a plain string: `"always"` (whole-tree check that runs
/// regardless of the staged set), `"any"` (any staged file), or a glob
/// pattern such as `"*.py"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilePredicate {
    /// The check always applies, independent of the staged file set.
    Always,
    /// The check applies when at least one file is staged.
    Any,
    /// The check applies to staged files matching the glob pattern.
    Glob(String),
}

impl From<String> for FilePredicate {
    fn from(s: String) -> Self {
        match s.as_str() {
            "always" => Self::Always,
            "any" => Self::Any,
            _ => Self::Glob(s),
        }
    }
}

impl From<FilePredicate> for String {
    fn from(p: FilePredicate) -> Self {
        match p {
            FilePredicate::Always => "always".to_string(),
            FilePredicate::Any => "any".to_string(),
            FilePredicate::Glob(pattern) => pattern,
        }
    }
}

impl FilePredicate {
    /// Whether the check runs on the whole tree rather than matched files.
    #[must_use]
    pub fn is_always(&self) -> bool {
        matches!(self, Self::Always)
    }
}

/// Definition of a single check: which tool to run, when it applies, and
/// whether its failure blocks the commit.
///
/// Immutable once loaded. The `command` is an argv template; the token
/// `{files}` expands to the matched staged files (one argument each) and
/// `{repo}` to the repository root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckSpec {
    /// Stable identifier; reports are sorted by it.
    pub id: String,

    /// Human-readable label (defaults to the id).
    #[serde(default)]
    pub label: Option<String>,

    /// Argv template: executable followed by arguments.
    pub command: Vec<String>,

    /// File-applicability predicate (default: any staged file).
    #[serde(default = "default_predicate")]
    pub files: FilePredicate,

    /// Whether a Failed/Errored result blocks the commit (default: true).
    #[serde(default = "default_blocking")]
    pub blocking: bool,

    /// Hard wall-clock timeout in seconds (default: 120).
    #[serde(default = "default_check_timeout")]
    pub timeout: u64,
}

fn default_predicate() -> FilePredicate {
    FilePredicate::Any
}

fn default_blocking() -> bool {
    true
}

fn default_check_timeout() -> u64 {
    DEFAULT_CHECK_TIMEOUT_SECS
}

impl CheckSpec {
    /// The label to display for this check, falling back to the id.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    /// The per-check timeout as a `Duration`.
    #[must_use]
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Toggle store configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToggleConfig {
    /// Sentinel file path. Defaults to `.git/vibegate-disabled.toml` inside
    /// the repository, which keeps the toggle outside the tracked tree.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Default expiry applied to `disable` operations (e.g. "24h").
    /// Absent means a disable never expires on its own.
    #[serde(default)]
    pub auto_expire: Option<String>,
}

/// Gate configuration: the check registry plus orchestration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Registered checks. Replaces the built-in registry wholesale when set.
    #[serde(default = "default_checks")]
    pub checks: Vec<CheckSpec>,

    /// Branch names on which commits are blocked outright.
    #[serde(default = "default_protected_branches")]
    pub protected_branches: Vec<String>,

    /// Upper bound on concurrently running checks.
    /// Defaults to the number of applicable checks.
    #[serde(default)]
    pub worker_pool_size: Option<usize>,

    /// Toggle store settings.
    #[serde(default)]
    pub toggle: ToggleConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            checks: default_checks(),
            protected_branches: default_protected_branches(),
            worker_pool_size: None,
            toggle: ToggleConfig::default(),
        }
    }
}

fn default_protected_branches() -> Vec<String> {
    vec!["master".to_string(), "main".to_string()]
}

/// The built-in check registry, mirroring the classic three-layer setup:
/// Python and JS/TS lint, secret detection, vulnerability scan, plus
/// private-key and large-file guards.
#[must_use]
pub fn default_checks() -> Vec<CheckSpec> {
    vec![
        CheckSpec {
            id: "ruff".to_string(),
            label: Some("Python lint (ruff)".to_string()),
            command: vec![
                "ruff".to_string(),
                "check".to_string(),
                "{files}".to_string(),
            ],
            files: FilePredicate::Glob("*.py".to_string()),
            blocking: true,
            timeout: DEFAULT_CHECK_TIMEOUT_SECS,
        },
        CheckSpec {
            id: "biome".to_string(),
            label: Some("JS/TS lint (biome)".to_string()),
            command: vec![
                "biome".to_string(),
                "check".to_string(),
                "{files}".to_string(),
            ],
            files: FilePredicate::Glob("*.{js,jsx,ts,tsx}".to_string()),
            blocking: true,
            timeout: DEFAULT_CHECK_TIMEOUT_SECS,
        },
        CheckSpec {
            id: "gitleaks".to_string(),
            label: Some("Secret detection (gitleaks)".to_string()),
            command: vec![
                "gitleaks".to_string(),
                "detect".to_string(),
                "--source".to_string(),
                "{repo}".to_string(),
                "--no-git".to_string(),
                "-v".to_string(),
            ],
            files: FilePredicate::Always,
            blocking: true,
            timeout: DEFAULT_CHECK_TIMEOUT_SECS,
        },
        CheckSpec {
            id: "trivy".to_string(),
            label: Some("Vulnerability scan (trivy)".to_string()),
            command: vec![
                "trivy".to_string(),
                "fs".to_string(),
                "{repo}".to_string(),
                "--scanners".to_string(),
                "secret".to_string(),
                "--severity".to_string(),
                "HIGH,CRITICAL".to_string(),
                "--exit-code".to_string(),
                "1".to_string(),
            ],
            files: FilePredicate::Always,
            blocking: true,
            timeout: 300,
        },
        CheckSpec {
            id: "private-key".to_string(),
            label: Some("Private key detection".to_string()),
            command: vec!["detect-private-key".to_string(), "{files}".to_string()],
            files: FilePredicate::Any,
            blocking: true,
            timeout: 60,
        },
        CheckSpec {
            id: "large-files".to_string(),
            label: Some("Large file check".to_string()),
            command: vec![
                "check-added-large-files".to_string(),
                "--maxkb=500".to_string(),
                "{files}".to_string(),
            ],
            files: FilePredicate::Any,
            blocking: true,
            timeout: 60,
        },
    ]
}

impl Config {
    /// Load configuration from an explicit TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Discover and load configuration.
    ///
    /// Search order: explicit path (must exist) > `.vibegate/config.toml`
    /// under the repository root > `~/.config/vibegate/config.toml` >
    /// built-in defaults. Returns the config together with the path it was
    /// loaded from, if any.
    pub fn discover(
        repo_root: &Path,
        explicit: Option<&Path>,
    ) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        let repo_config = repo_root.join(".vibegate").join("config.toml");
        if repo_config.exists() {
            return Ok((Self::load(&repo_config)?, Some(repo_config)));
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("vibegate").join("config.toml");
            if user_config.exists() {
                return Ok((Self::load(&user_config)?, Some(user_config)));
            }
        }

        Ok((Self::default(), None))
    }

    /// Validate the configuration before anything runs.
    ///
    /// Catches empty/duplicate check ids, empty commands, malformed glob
    /// patterns, a zero worker pool, and a malformed auto-expire duration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = std::collections::HashSet::new();
        for check in &self.checks {
            if check.id.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "checks.id".to_string(),
                    value: "check id must not be empty".to_string(),
                });
            }
            if !seen.insert(check.id.as_str()) {
                return Err(ConfigError::InvalidValue {
                    key: "checks.id".to_string(),
                    value: format!("duplicate check id '{}'", check.id),
                });
            }
            if check.command.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: format!("checks.{}.command", check.id),
                    value: "command must name an executable".to_string(),
                });
            }
            if check.timeout == 0 {
                return Err(ConfigError::InvalidValue {
                    key: format!("checks.{}.timeout", check.id),
                    value: "timeout must be at least 1 second".to_string(),
                });
            }
            if let FilePredicate::Glob(pattern) = &check.files {
                globset::Glob::new(pattern).map_err(|e| ConfigError::InvalidValue {
                    key: format!("checks.{}.files", check.id),
                    value: format!("invalid glob pattern '{pattern}': {e}"),
                })?;
            }
        }

        if self.protected_branches.iter().any(String::is_empty) {
            return Err(ConfigError::InvalidValue {
                key: "protected_branches".to_string(),
                value: "branch names must not be empty".to_string(),
            });
        }

        if self.worker_pool_size == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "worker_pool_size".to_string(),
                value: "worker pool size must be at least 1".to_string(),
            });
        }

        if let Some(expire) = &self.toggle.auto_expire {
            parse_duration(expire)?;
        }

        Ok(())
    }
}

/// Parse a duration string such as "90s", "30m", "24h", or "7d".
pub fn parse_duration(duration_str: &str) -> Result<Duration, ConfigError> {
    let duration_str = duration_str.trim().to_lowercase();

    let mut num_str = String::new();
    let mut unit_str = String::new();
    for c in duration_str.chars() {
        if c.is_ascii_digit() || c == '.' {
            num_str.push(c);
        } else {
            unit_str.push(c);
        }
    }

    let value: f64 = num_str.parse().map_err(|_| ConfigError::InvalidValue {
        key: "duration".to_string(),
        value: format!("invalid duration value '{duration_str}'"),
    })?;

    let duration = match unit_str.as_str() {
        "s" | "sec" | "second" | "seconds" => Duration::from_secs_f64(value),
        "m" | "min" | "minute" | "minutes" => Duration::from_secs_f64(value * 60.0),
        "h" | "hour" | "hours" => Duration::from_secs_f64(value * 3600.0),
        "d" | "day" | "days" => Duration::from_secs_f64(value * 86400.0),
        _ => {
            return Err(ConfigError::InvalidValue {
                key: "duration".to_string(),
                value: format!("unknown duration unit '{unit_str}' (valid: s/m/h/d)"),
            });
        }
    };

    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.protected_branches, vec!["master", "main"]);
        assert!(config.worker_pool_size.is_none());
        assert_eq!(config.checks.len(), 6);
    }

    #[test]
    fn test_default_checks_all_blocking() {
        for check in default_checks() {
            assert!(check.blocking, "default check '{}' must block", check.id);
            assert!(!check.command.is_empty());
        }
    }

    #[test]
    fn test_default_registry_covers_both_lint_layers() {
        let checks = default_checks();
        let lint = |id: &str| checks.iter().find(|c| c.id == id).unwrap();
        assert_eq!(lint("ruff").files, FilePredicate::Glob("*.py".to_string()));
        assert_eq!(
            lint("biome").files,
            FilePredicate::Glob("*.{js,jsx,ts,tsx}".to_string())
        );
        assert_eq!(lint("biome").command[..2], ["biome", "check"]);
    }

    #[test]
    fn test_file_predicate_from_string() {
        assert_eq!(FilePredicate::from("always".to_string()), FilePredicate::Always);
        assert_eq!(FilePredicate::from("any".to_string()), FilePredicate::Any);
        assert_eq!(
            FilePredicate::from("*.py".to_string()),
            FilePredicate::Glob("*.py".to_string())
        );
    }

    #[test]
    fn test_parse_toml_config() {
        let toml_str = r#"
            protected_branches = ["main", "release"]
            worker_pool_size = 2

            [[checks]]
            id = "lint"
            command = ["ruff", "check", "{files}"]
            files = "*.py"

            [[checks]]
            id = "secrets"
            command = ["gitleaks", "detect", "--source", "{repo}"]
            files = "always"
            timeout = 30

            [toggle]
            auto_expire = "24h"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        config.validate().unwrap();

        assert_eq!(config.checks.len(), 2);
        assert_eq!(config.checks[0].id, "lint");
        assert_eq!(config.checks[0].files, FilePredicate::Glob("*.py".to_string()));
        assert!(config.checks[0].blocking, "blocking defaults to true");
        assert_eq!(config.checks[0].timeout, DEFAULT_CHECK_TIMEOUT_SECS);
        assert_eq!(config.checks[1].files, FilePredicate::Always);
        assert_eq!(config.checks[1].timeout, 30);
        assert_eq!(config.worker_pool_size, Some(2));
        assert_eq!(config.toggle.auto_expire.as_deref(), Some("24h"));
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let mut config = Config::default();
        config.checks.push(config.checks[0].clone());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate check id"));
    }

    #[test]
    fn test_validate_rejects_empty_command() {
        let mut config = Config::default();
        config.checks[0].command.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_glob() {
        let mut config = Config::default();
        config.checks[0].files = FilePredicate::Glob("a{b".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("invalid glob pattern"));
    }

    #[test]
    fn test_validate_rejects_zero_pool() {
        let config = Config {
            worker_pool_size: Some(0),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_discover_prefers_repo_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let vibegate_dir = dir.path().join(".vibegate");
        std::fs::create_dir_all(&vibegate_dir).unwrap();
        std::fs::write(
            vibegate_dir.join("config.toml"),
            r#"protected_branches = ["trunk"]"#,
        )
        .unwrap();

        let (config, source) = Config::discover(dir.path(), None).unwrap();
        assert_eq!(config.protected_branches, vec!["trunk"]);
        assert_eq!(source.unwrap(), vibegate_dir.join("config.toml"));
    }

    #[test]
    fn test_discover_missing_explicit_path_is_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = Config::discover(dir.path(), Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_discover_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let (config, source) = Config::discover(dir.path(), None).unwrap();
        // No repo config; user config may exist on dev machines, so only
        // assert the no-source case yields defaults.
        if source.is_none() {
            assert_eq!(config.checks.len(), default_checks().len());
        }
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("90s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("30m").unwrap(), Duration::from_secs(30 * 60));
        assert_eq!(parse_duration("24h").unwrap(), Duration::from_secs(24 * 3600));
        assert_eq!(parse_duration("7d").unwrap(), Duration::from_secs(7 * 86400));
        assert!(parse_duration("7 fortnights").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "checks = 'not a table'").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}

//! Configuration for vibegate: the check registry, branch policy set,
//! worker pool sizing, and toggle store location.
//!
//! Configuration is loaded once per gate invocation with the precedence
//! explicit `--config` path > `.vibegate/config.toml` in the repository >
//! `~/.config/vibegate/config.toml` > built-in defaults.

pub mod config;

pub use config::{
    CheckSpec, Config, ConfigError, FilePredicate, ToggleConfig, default_checks, parse_duration,
};

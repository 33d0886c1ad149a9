//! Command-line interface for vibegate.
//!
//! `vibegate` with no subcommand behaves like `vibegate run`, which is how
//! the pre-commit hook invokes it: no required arguments, everything
//! derived from the repository itself.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::orchestrator::{self, GateContext};
use crate::{git, logging, reporter};
use vibegate_config::{Config, ConfigError, parse_duration};
use vibegate_gate::{ToggleStore, emit_verdict_json, exit_codes};
use vibegate_runner::NativeRunner;

/// vibegate - commit-time security gate
#[derive(Parser)]
#[command(name = "vibegate")]
#[command(about = "Blocks commits unless the configured security checks all pass")]
#[command(long_about = r#"
vibegate is invoked by the git pre-commit hook. It reads the operator
toggle, enforces branch policy, runs the configured scanners over the
staged file set as time-bounded subprocesses, and blocks the commit unless
every blocking check passes. A scanner that cannot run blocks the commit
just like a scanner that found a violation.

EXAMPLES:
  # Run the gate (what the hook does)
  vibegate run

  # Temporarily disable enforcement for two hours
  vibegate disable --actor alice --expires 2h

  # Restore enforcement
  vibegate enable

  # Show toggle state and the registered checks
  vibegate status

CONFIGURATION:
  Discovered at .vibegate/config.toml in the repository, then
  ~/.config/vibegate/config.toml, with built-in defaults otherwise.
  Use --config for an explicit path.

EXIT CODES:
  0  commit allowed
  1  commit blocked
  2  configuration error (detected before any check ran)
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate the gate for the current commit attempt (the default)
    Run {
        /// Emit the verdict as canonical JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Re-enable gate enforcement (removes the toggle sentinel)
    Enable,

    /// Temporarily disable gate enforcement (writes the toggle sentinel)
    Disable {
        /// Who is disabling the gate (defaults to $USER)
        #[arg(long)]
        actor: Option<String>,

        /// Auto-expire the disable after this duration (e.g. "30m", "2h")
        #[arg(long)]
        expires: Option<String>,
    },

    /// Show toggle state, configuration source, and registered checks
    Status,
}

/// Parse arguments, dispatch, and map failures to exit codes.
///
/// All output happens here (or below); main only exits with the code.
pub fn run() -> Result<(), i32> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let command = cli.command.unwrap_or(Command::Run { json: false });
    let result = match command {
        Command::Run { json } => cmd_run(cli.config.as_deref(), json),
        Command::Enable => cmd_enable(cli.config.as_deref()),
        Command::Disable { actor, expires } => {
            cmd_disable(cli.config.as_deref(), actor, expires)
        }
        Command::Status => cmd_status(cli.config.as_deref()),
    };

    match result {
        Ok(exit_codes::SUCCESS) => Ok(()),
        Ok(code) => Err(code),
        Err(e) => {
            eprintln!("vibegate: error: {e:#}");
            // Configuration problems get their own exit code; everything
            // else fails closed as a blocked commit.
            if e.downcast_ref::<ConfigError>().is_some() {
                Err(exit_codes::CONFIG)
            } else {
                Err(exit_codes::BLOCKED)
            }
        }
    }
}

/// Load config and resolve the toggle store for the current repository.
fn load_repo_state(
    config_path: Option<&Path>,
) -> Result<(Config, Option<PathBuf>, ToggleStore, GateContext)> {
    let runner = NativeRunner::new();
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    let repo_root = git::repo_root(&runner, &cwd)?;

    let (config, source) = Config::discover(repo_root.as_std_path(), config_path)?;
    let toggle = orchestrator::toggle_store(&config, &repo_root);

    let branch = git::current_branch(&runner, &repo_root)?;
    let staged = git::staged_files(&runner, &repo_root)?;

    let ctx = GateContext {
        repo_root,
        branch,
        staged,
    };
    Ok((config, source, toggle, ctx))
}

fn cmd_run(config_path: Option<&Path>, json: bool) -> Result<i32> {
    let (config, _, toggle, ctx) = load_repo_state(config_path)?;

    let runner = NativeRunner::new();
    let verdict = orchestrator::evaluate(&ctx, &config, &toggle, &runner)?;

    if json {
        println!("{}", emit_verdict_json(&verdict)?);
    } else if verdict.allowed {
        print!("{}", reporter::render_text(&verdict));
    } else {
        eprint!("{}", reporter::render_text(&verdict));
    }

    Ok(reporter::exit_code(&verdict))
}

fn cmd_enable(config_path: Option<&Path>) -> Result<i32> {
    let (_, _, toggle, _) = load_repo_state(config_path)?;

    if toggle.enable()? {
        println!("vibegate: gate enabled, enforcement restored");
    } else {
        println!("vibegate: gate already enabled");
    }
    Ok(exit_codes::SUCCESS)
}

fn cmd_disable(
    config_path: Option<&Path>,
    actor: Option<String>,
    expires: Option<String>,
) -> Result<i32> {
    let (config, _, toggle, _) = load_repo_state(config_path)?;

    let actor = actor.or_else(|| std::env::var("USER").ok());
    let expires_after: Option<Duration> = match expires.or(config.toggle.auto_expire) {
        Some(spec) => Some(parse_duration(&spec)?),
        None => None,
    };

    if toggle.disable(actor.as_deref(), chrono::Utc::now(), expires_after)? {
        match expires_after {
            Some(d) => println!(
                "vibegate: gate disabled for {}s, re-enable with 'vibegate enable'",
                d.as_secs()
            ),
            None => println!("vibegate: gate disabled, re-enable with 'vibegate enable'"),
        }
    } else {
        println!("vibegate: gate already disabled");
    }
    Ok(exit_codes::SUCCESS)
}

fn cmd_status(config_path: Option<&Path>) -> Result<i32> {
    let (config, source, toggle, ctx) = load_repo_state(config_path)?;

    let state = toggle.state(chrono::Utc::now())?;
    if state.enabled {
        println!("gate:    enabled");
    } else {
        let record = state.record.unwrap_or_default();
        let actor = record.disabled_by.as_deref().unwrap_or("unknown");
        match record.expires_at {
            Some(expires) => println!("gate:    disabled by {actor} (expires {expires})"),
            None => println!("gate:    disabled by {actor}"),
        }
    }

    match source {
        Some(path) => println!("config:  {}", path.display()),
        None => println!("config:  built-in defaults"),
    }
    println!("branch:  {}", ctx.branch);
    println!("protected branches: {}", config.protected_branches.join(", "));

    println!("checks:");
    for check in &config.checks {
        println!(
            "  {:16} files={:10} blocking={} timeout={}s",
            check.id,
            String::from(check.files.clone()),
            check.blocking,
            check.timeout,
        );
    }
    Ok(exit_codes::SUCCESS)
}

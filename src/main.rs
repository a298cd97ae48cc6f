//! projconf — project configuration normalizer CLI.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};
use clap::Parser;

use cli::args::{Cli, Command};
use projconf::builds::PresetRegistry;
use projconf::config::{self, ProjectConfig, RawOptions};
use projconf::constants;
use projconf::env::Env;
use projconf::lint::RuleRegistry;

#[tokio::main]
async fn main() {
    let env = Env::real();
    init_logging(&env);

    if let Err(err) = run(&env).await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

/// Install the stderr log subscriber, filtered by `PROJCONF_LOG`.
fn init_logging(env: &Env) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::new(env.log_filter()))
        .with_target(false)
        .try_init()
        .ok();
}

async fn run(env: &Env) -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Show => {
            let (_, config) = load_project(env, cli.config.as_deref()).await?;
            println!("{}", config.to_json()?);
            Ok(())
        }
        Command::Validate => run_validate(env, cli.config.as_deref()).await,
        Command::Classify(args) => {
            let (_, config) = load_project(env, cli.config.as_deref()).await?;
            print!("{}", cli::render_classification(&config, &args.files));
            Ok(())
        }
        Command::Presets => {
            print!("{}", cli::render_presets(&PresetRegistry::builtin()));
            Ok(())
        }
        Command::Rules => {
            print!("{}", cli::render_rules(&RuleRegistry::builtin()));
            Ok(())
        }
        Command::Version => {
            use colored::Colorize;
            println!("{} {}", constants::APP_NAME.bold(), constants::VERSION.green().bold());
            Ok(())
        }
    }
}

/// Load the project config, falling back to defaults when no file exists.
///
/// Returns the path that was consulted alongside the config.
async fn load_project(env: &Env, explicit: Option<&Path>) -> Result<(PathBuf, ProjectConfig)> {
    let cwd = std::env::current_dir().context("failed to determine the working directory")?;
    let path = env.config_path(explicit, &cwd);

    let config = match config::load_config_from_file_async(&path)
        .await
        .with_context(|| format!("failed to load {}", path.display()))?
    {
        Some(config) => config,
        None => {
            if explicit.is_some() {
                bail!("config file not found: {}", path.display());
            }
            tracing::info!(path = %path.display(), "no project config found, using defaults");
            ProjectConfig::new(RawOptions::default()).context("failed to build default config")?
        }
    };

    Ok((path, config))
}

/// Check the project config; fails when any invariant is broken.
async fn run_validate(env: &Env, explicit: Option<&Path>) -> Result<()> {
    let (path, config) = load_project(env, explicit).await?;
    let report = config.check();
    print!("{}", cli::render_report(&path, &report));

    if let Some(lint) = config.lint() {
        lint.resolve_rules(&RuleRegistry::builtin())
            .with_context(|| format!("invalid lint configuration in {}", path.display()))?;
    }

    if !report.is_valid() {
        bail!("{} violation(s) found", report.violations().len());
    }
    Ok(())
}

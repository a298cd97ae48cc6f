//! Clap argument types.

use clap::Parser;
use std::path::PathBuf;

/// Normalize and check app-shell project configuration.
#[derive(Parser, Debug)]
#[command(name = "projconf", version = projconf::constants::VERSION)]
pub struct Cli {
    /// Path to the project config file (default: ./project.json).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Print the normalized configuration as JSON.
    Show,

    /// Check the configuration and list every problem found.
    Validate,

    /// Report whether files are the shell, fragments or sources.
    Classify(ClassifyArgs),

    /// List the available build presets.
    Presets,

    /// List the known lint rules and rule collections.
    Rules,

    /// Print version information.
    Version,
}

/// Arguments for the `classify` subcommand.
#[derive(Parser, Debug)]
pub struct ClassifyArgs {
    /// Files to classify, absolute or relative to the project root.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

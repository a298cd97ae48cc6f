//! Project configuration: loading, normalization and validation.
//!
//! `project.json` is read into [`RawOptions`], normalized into an immutable
//! [`ProjectConfig`], and checked on demand with [`ProjectConfig::check`].

pub mod loader;
pub mod options;
pub mod project;
pub mod validate;

use std::path::PathBuf;

use thiserror::Error;

use crate::builds::BuildError;

pub use loader::{
    find_config_file, load_config_from_file, load_config_from_file_async, load_options_from_file,
    load_options_from_file_async, parse_options,
};
pub use options::RawOptions;
pub use project::{ProjectConfig, DEFAULT_ENTRYPOINT};
pub use validate::{ValidationReport, Violation};

/// Errors during config loading and normalization.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("failed to determine the working directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    #[error("invalid project configuration:\n{0}")]
    Invalid(ValidationReport),

    #[error("cannot serialize {field} {path}: path is not valid UTF-8")]
    NonUtf8Path { field: &'static str, path: PathBuf },

    #[error("failed to serialize project config: {0}")]
    Serialize(#[source] serde_json::Error),
}

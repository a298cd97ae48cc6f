//! Environment variable abstraction for testability.
//!
//! Production code uses [`Env::real()`] which delegates to [`std::env::var`].
//! Tests use [`Env::mock()`] backed by a `HashMap`, eliminating the need for
//! `unsafe` calls to [`std::env::set_var`] / [`std::env::remove_var`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::constants;

/// Environment variable reader.
#[derive(Clone, Debug)]
pub struct Env {
    overrides: Option<HashMap<String, String>>,
}

impl Env {
    /// Create an `Env` that reads from the real process environment.
    pub fn real() -> Self {
        Self { overrides: None }
    }

    /// Create an `Env` backed by explicit key-value pairs.
    #[cfg(test)]
    pub fn mock(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            overrides: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Look up an environment variable by name.
    pub fn var(&self, name: &str) -> Result<String, std::env::VarError> {
        match &self.overrides {
            Some(map) => map.get(name).cloned().ok_or(std::env::VarError::NotPresent),
            None => std::env::var(name),
        }
    }

    /// Returns `true` if the variable is present.
    pub fn is_set(&self, name: &str) -> bool {
        self.var(name).is_ok()
    }

    /// Pick the config file path.
    ///
    /// An explicit path wins, then `PROJCONF_CONFIG`, then `project.json`
    /// in `cwd`. Empty values are treated as unset.
    pub fn config_path(&self, explicit: Option<&Path>, cwd: &Path) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        match self.var(constants::ENV_CONFIG) {
            Ok(val) if !val.is_empty() => PathBuf::from(val),
            _ => cwd.join(constants::CONFIG_FILENAME),
        }
    }

    /// The `tracing` filter directive for log output.
    pub fn log_filter(&self) -> String {
        self.var(constants::ENV_LOG)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| constants::DEFAULT_LOG_FILTER.to_string())
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::real()
    }
}

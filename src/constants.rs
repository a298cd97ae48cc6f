//! App-wide constants.
//!
//! Centralises the tool name, config file name and environment variable
//! names so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "projconf";

/// Crate version, shown by `projconf version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Project config filename looked up in the working directory.
pub const CONFIG_FILENAME: &str = "project.json";

// ── Environment variable names ──────────────────────────────────────

/// Path to the config file, overriding `./project.json`.
pub const ENV_CONFIG: &str = "PROJCONF_CONFIG";

/// `tracing` filter directive for log output (e.g. `debug`, `projconf=trace`).
pub const ENV_LOG: &str = "PROJCONF_LOG";

/// Log level used when `PROJCONF_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";

//! Raw `project.json` schema.
//!
//! These types mirror the file directly and perform no validation. The
//! `project` module turns them into a normalized [`ProjectConfig`].
//!
//! [`ProjectConfig`]: super::ProjectConfig

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::builds::BuildEntry;
use crate::lint::LintOptions;

/// Root structure of `project.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawOptions {
    /// Project root, absolute or relative to the working directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Document served for every app route. Default: `index.html`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<PathBuf>,

    /// The always-loaded application shell.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shell: Option<PathBuf>,

    /// Lazily loaded pages or bundles.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fragments: Vec<PathBuf>,

    /// Globs for the project's own source files.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,

    /// Files copied into every build output as-is.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_dependencies: Vec<PathBuf>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub builds: Vec<BuildEntry>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lint: Option<LintOptions>,

    /// Where the bundle-to-sources mapping is written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_manifest: Option<PathBuf>,

    /// Deprecated spelling of `sources`.
    #[serde(skip_serializing)]
    pub source_globs: Option<Vec<String>>,

    /// Deprecated spelling of `extraDependencies`.
    #[serde(skip_serializing)]
    pub include_dependencies: Option<Vec<PathBuf>>,

    /// Top-level keys this schema does not know. Ignored with a warning.
    #[serde(flatten)]
    pub unknown: IndexMap<String, serde_json::Value>,
}

impl RawOptions {
    /// Messages for every deprecated field in use.
    pub fn deprecation_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.source_globs.is_some() {
            warnings.push("\"sourceGlobs\" is deprecated, use \"sources\" instead".to_string());
        }
        if self.include_dependencies.is_some() {
            warnings.push(
                "\"includeDependencies\" is deprecated, use \"extraDependencies\" instead"
                    .to_string(),
            );
        }
        warnings
    }

    /// Names of unrecognized top-level keys, in file order.
    pub fn unknown_fields(&self) -> impl Iterator<Item = &str> {
        self.unknown.keys().map(String::as_str)
    }

    /// Declared source globs, deprecated `sourceGlobs` appended.
    pub(crate) fn declared_sources(&self) -> impl Iterator<Item = &str> {
        self.sources
            .iter()
            .chain(self.source_globs.iter().flatten())
            .map(String::as_str)
    }

    /// Declared extra dependencies, deprecated `includeDependencies` appended.
    pub(crate) fn declared_extra_dependencies(&self) -> impl Iterator<Item = &PathBuf> {
        self.extra_dependencies
            .iter()
            .chain(self.include_dependencies.iter().flatten())
    }
}

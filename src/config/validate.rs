//! Invariant checks over a normalized project configuration.
//!
//! Checks never fail construction. They produce a [`ValidationReport`]
//! listing every violation so callers can decide whether to abort.
//!
//! Fragment ordering, fragment uniqueness and the build count are
//! guaranteed by construction; they are re-checked over the stored value.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::ProjectConfig;
use crate::paths;
use crate::sources;

/// A single broken invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("project root {0} is not an absolute path")]
    RootNotAbsolute(PathBuf),

    #[error("{field} {path} is outside the project root {root}")]
    OutsideRoot {
        field: &'static str,
        path: PathBuf,
        root: PathBuf,
    },

    #[error("{field} {path} is not valid UTF-8")]
    NonUtf8Path { field: &'static str, path: PathBuf },

    #[error("source glob '{0}' is outside the project root")]
    SourceOutsideRoot(String),

    #[error("source glob '{glob}' is invalid: {reason}")]
    InvalidSourceGlob { glob: String, reason: String },

    #[error("fragment {0} is listed more than once")]
    DuplicateFragment(PathBuf),

    #[error("the shell must come first among all fragments")]
    ShellNotFirst,

    #[error("no builds are configured")]
    NoBuilds,

    #[error("build #{index} needs a name when more than one build is configured")]
    UnnamedBuild { index: usize },

    #[error("build name '{0}' is used by more than one build")]
    DuplicateBuildName(String),
}

/// Outcome of validating a [`ProjectConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {violation}")?;
        }
        Ok(())
    }
}

/// Run every invariant check against `config`.
pub(super) fn check(config: &ProjectConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    let root = config.root();

    if !root.is_absolute() {
        report.push(Violation::RootNotAbsolute(root.to_path_buf()));
    }
    check_utf8(&mut report, "root", root);

    check_path(&mut report, root, "entrypoint", config.entrypoint());
    if let Some(shell) = config.shell() {
        check_path(&mut report, root, "shell", shell);
    }
    for fragment in config.fragments() {
        check_path(&mut report, root, "fragment", fragment);
    }
    for dependency in config.extra_dependencies() {
        check_path(&mut report, root, "extra dependency", dependency);
    }
    if let Some(manifest) = config.bundle_manifest() {
        check_path(&mut report, root, "bundle manifest", manifest);
    }

    for glob in config.sources() {
        if let Err(e) = sources::compile_glob(root, glob) {
            report.push(Violation::InvalidSourceGlob {
                glob: glob.clone(),
                reason: e.to_string(),
            });
        } else if sources::glob_escapes_root(root, glob) {
            report.push(Violation::SourceOutsideRoot(glob.clone()));
        }
    }

    check_fragments(&mut report, config);
    check_builds(&mut report, config);

    report
}

/// The path must lie under `root` and be writable back to JSON.
fn check_path(report: &mut ValidationReport, root: &Path, field: &'static str, path: &Path) {
    if !paths::is_contained_in(root, path) {
        report.push(Violation::OutsideRoot {
            field,
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        });
    }
    check_utf8(report, field, path);
}

fn check_utf8(report: &mut ValidationReport, field: &'static str, path: &Path) {
    if path.to_str().is_none() {
        report.push(Violation::NonUtf8Path {
            field,
            path: path.to_path_buf(),
        });
    }
}

fn check_fragments(report: &mut ValidationReport, config: &ProjectConfig) {
    let all = config.all_fragments();

    let mut seen = HashSet::new();
    for fragment in all {
        if !seen.insert(fragment) {
            report.push(Violation::DuplicateFragment(fragment.clone()));
        }
    }

    if let Some(shell) = config.shell() {
        if all.first().map(PathBuf::as_path) != Some(shell) {
            report.push(Violation::ShellNotFirst);
        }
    }
}

fn check_builds(report: &mut ValidationReport, config: &ProjectConfig) {
    let builds = config.builds();
    if builds.is_empty() {
        report.push(Violation::NoBuilds);
        return;
    }
    if builds.len() == 1 {
        return;
    }

    let mut names = HashSet::new();
    for (index, build) in builds.iter().enumerate() {
        match &build.name {
            None => report.push(Violation::UnnamedBuild { index }),
            Some(name) => {
                if !names.insert(name.as_str()) {
                    report.push(Violation::DuplicateBuildName(name.clone()));
                }
            }
        }
    }
}

//! Source glob normalization and matching.
//!
//! Globs are stored as root-relative text (the form written back to
//! `project.json`) and compiled into absolute patterns for matching.
//! A leading `!` marks an exclusion: a file is a source when it matches
//! at least one inclusion and no exclusion.

use std::path::Path;

use glob::{MatchOptions, Pattern, PatternError};

use crate::paths;

/// Globs every project gets for its own sources.
pub const DEFAULT_SOURCE_GLOBS: &[&str] = &["src/**/*"];

const NEGATION: char = '!';

/// `*` must not cross `/`, while `**` still spans directories.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Split a declared glob into its negation flag and pattern body.
pub fn split_negation(glob: &str) -> (bool, &str) {
    match glob.strip_prefix(NEGATION) {
        Some(body) => (true, body),
        None => (false, glob),
    }
}

/// Rewrite a declared glob into normalized root-relative text.
///
/// Absolute globs under `root` are made relative; absolute globs outside
/// it are kept absolute so validation can report them.
pub fn normalize_glob(root: &Path, glob: &str) -> String {
    let (negated, body) = split_negation(glob);
    let body_path = Path::new(body);

    let normalized = if body_path.is_absolute() {
        let absolute = paths::normalize(body_path);
        if paths::is_contained_in(root, &absolute) {
            paths::to_relative(root, &absolute)
        } else {
            absolute
        }
    } else {
        paths::normalize(body_path)
    };

    let text = glob_text(&normalized);
    if negated { format!("{NEGATION}{text}") } else { text }
}

/// Glob text matching exactly one file, with glob metacharacters escaped.
pub fn literal_glob(root: &Path, file: &Path) -> String {
    Pattern::escape(&glob_text(&paths::to_relative(root, file)))
}

/// Slash-separated glob text. Non-UTF-8 paths are reported by validation,
/// so a lossy rendering is enough to keep matching the rest.
fn glob_text(path: &Path) -> String {
    paths::to_slash(path).unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Returns `true` if the glob's body resolves outside `root`.
pub fn glob_escapes_root(root: &Path, glob: &str) -> bool {
    let (_, body) = split_negation(glob);
    !paths::is_contained_in(root, &paths::resolve_relative_to(root, body))
}

/// Compile a normalized glob into an absolute pattern.
///
/// Returns the pattern and whether it is an exclusion.
pub fn compile_glob(root: &Path, glob: &str) -> Result<(Pattern, bool), PatternError> {
    let (negated, body) = split_negation(glob);

    let absolute = if Path::new(body).is_absolute() {
        body.to_string()
    } else {
        let root_text = glob_text(root);
        format!("{}/{}", Pattern::escape(root_text.trim_end_matches('/')), body)
    };

    Ok((Pattern::new(&absolute)?, negated))
}

/// Compiled set of source globs for one project root.
#[derive(Debug, Clone, Default)]
pub struct SourceMatcher {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl SourceMatcher {
    /// Compile `globs` against `root`.
    ///
    /// Globs that fail to compile are skipped with a warning; validation
    /// reports them separately.
    pub fn new<'a>(root: &Path, globs: impl IntoIterator<Item = &'a str>) -> Self {
        let mut matcher = Self::default();

        for glob in globs {
            match compile_glob(root, glob) {
                Ok((pattern, true)) => matcher.exclude.push(pattern),
                Ok((pattern, false)) => matcher.include.push(pattern),
                Err(e) => tracing::warn!(glob, error = %e, "skipping invalid source glob"),
            }
        }

        matcher
    }

    /// Returns `true` if the absolute `file` is matched by an inclusion
    /// and by no exclusion.
    pub fn is_match(&self, file: &Path) -> bool {
        self.include.iter().any(|p| p.matches_path_with(file, MATCH_OPTIONS))
            && !self.exclude.iter().any(|p| p.matches_path_with(file, MATCH_OPTIONS))
    }
}

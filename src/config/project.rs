//! The normalized, immutable project configuration.
//!
//! Construction resolves the root, applies defaults, expands build presets
//! and derives `all_fragments` and `sources`. It does not reject invalid
//! configurations: call [`ProjectConfig::validate`] (or [`check`] for the
//! full list of problems) before trusting the paths, or use
//! [`ProjectConfig::new_validated`] to do both in one step.
//!
//! [`check`]: ProjectConfig::check

use std::path::{Path, PathBuf};

use indexmap::IndexSet;

use super::options::RawOptions;
use super::validate::{self, ValidationReport};
use super::ConfigError;
use crate::builds::{self, BuildEntry, BuildOptions, PresetRegistry};
use crate::lint::LintOptions;
use crate::paths;
use crate::sources::{self, SourceMatcher};

/// Entrypoint used when `project.json` names none.
pub const DEFAULT_ENTRYPOINT: &str = "index.html";

/// Normalized project configuration.
///
/// Every path field is absolute. Instances are immutable; consumers get
/// read-only access through the accessor methods.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    root: PathBuf,
    entrypoint: PathBuf,
    shell: Option<PathBuf>,
    fragments: Vec<PathBuf>,
    all_fragments: Vec<PathBuf>,
    sources: IndexSet<String>,
    extra_dependencies: Vec<PathBuf>,
    bundle_manifest: Option<PathBuf>,
    builds: Vec<BuildOptions>,
    lint: Option<LintOptions>,
    matcher: SourceMatcher,
}

impl ProjectConfig {
    /// Normalize `options` against the process working directory and the
    /// built-in build presets.
    pub fn new(options: RawOptions) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
        Self::from_options(options, &cwd, &PresetRegistry::builtin())
    }

    /// Like [`ProjectConfig::new`], but fails if any invariant is broken.
    pub fn new_validated(options: RawOptions) -> Result<Self, ConfigError> {
        let config = Self::new(options)?;
        let report = config.check();
        if report.is_valid() {
            Ok(config)
        } else {
            Err(ConfigError::Invalid(report))
        }
    }

    /// Normalize `options`, resolving a relative or missing root against
    /// `cwd` and build presets against `presets`.
    pub fn from_options(
        options: RawOptions,
        cwd: &Path,
        presets: &PresetRegistry,
    ) -> Result<Self, ConfigError> {
        for warning in options.deprecation_warnings() {
            tracing::warn!("{warning}");
        }
        for field in options.unknown_fields() {
            tracing::warn!(field, "ignoring unknown project option");
        }

        let root = match &options.root {
            Some(root) => paths::resolve_relative_to(cwd, root),
            None => paths::normalize(cwd),
        };
        let resolve = |p: &Path| paths::resolve_relative_to(&root, p);

        let entrypoint = resolve(
            options
                .entrypoint
                .as_deref()
                .unwrap_or_else(|| Path::new(DEFAULT_ENTRYPOINT)),
        );
        let shell = options.shell.as_deref().map(resolve);
        let fragments: Vec<PathBuf> = options.fragments.iter().map(|f| resolve(f)).collect();
        let extra_dependencies: Vec<PathBuf> = options
            .declared_extra_dependencies()
            .map(|d| resolve(d))
            .collect();
        let bundle_manifest = options.bundle_manifest.as_deref().map(resolve);

        let all_fragments = derive_all_fragments(shell.as_ref(), &fragments);

        let mut source_globs: IndexSet<String> = options
            .declared_sources()
            .map(|g| sources::normalize_glob(&root, g))
            .collect();
        source_globs.extend(sources::DEFAULT_SOURCE_GLOBS.iter().map(|g| g.to_string()));
        source_globs.insert(sources::literal_glob(&root, &entrypoint));
        source_globs.extend(all_fragments.iter().map(|f| sources::literal_glob(&root, f)));

        let builds = if options.builds.is_empty() {
            vec![builds::normalize_build(&BuildEntry::default(), presets)?]
        } else {
            options
                .builds
                .iter()
                .map(|entry| builds::normalize_build(entry, presets))
                .collect::<Result<Vec<_>, _>>()?
        };

        let matcher = SourceMatcher::new(&root, source_globs.iter().map(String::as_str));

        tracing::debug!(
            root = %root.display(),
            fragments = all_fragments.len(),
            sources = source_globs.len(),
            builds = builds.len(),
            "normalized project config"
        );

        Ok(Self {
            root,
            entrypoint,
            shell,
            fragments,
            all_fragments,
            sources: source_globs,
            extra_dependencies,
            bundle_manifest,
            builds,
            lint: options.lint,
            matcher,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entrypoint(&self) -> &Path {
        &self.entrypoint
    }

    pub fn shell(&self) -> Option<&Path> {
        self.shell.as_deref()
    }

    /// Declared fragments, in declaration order.
    pub fn fragments(&self) -> &[PathBuf] {
        &self.fragments
    }

    /// The shell (when set) followed by every distinct fragment.
    pub fn all_fragments(&self) -> &[PathBuf] {
        &self.all_fragments
    }

    /// Root-relative source globs, including the entrypoint and fragments.
    pub fn sources(&self) -> &IndexSet<String> {
        &self.sources
    }

    pub fn extra_dependencies(&self) -> &[PathBuf] {
        &self.extra_dependencies
    }

    pub fn bundle_manifest(&self) -> Option<&Path> {
        self.bundle_manifest.as_deref()
    }

    /// Normalized builds. Never empty.
    pub fn builds(&self) -> &[BuildOptions] {
        &self.builds
    }

    pub fn lint(&self) -> Option<&LintOptions> {
        self.lint.as_ref()
    }

    /// Returns `true` if `filepath` is a lazily loaded fragment.
    ///
    /// The shell is not a fragment even though it heads `all_fragments`.
    pub fn is_fragment(&self, filepath: impl AsRef<Path>) -> bool {
        let path = self.resolve(filepath.as_ref());
        self.shell.as_ref() != Some(&path) && self.all_fragments.contains(&path)
    }

    /// Returns `true` if `filepath` is the application shell.
    pub fn is_shell(&self, filepath: impl AsRef<Path>) -> bool {
        self.shell.as_ref() == Some(&self.resolve(filepath.as_ref()))
    }

    /// Returns `true` if `filepath` matches the project's source globs.
    pub fn is_source(&self, filepath: impl AsRef<Path>) -> bool {
        self.matcher.is_match(&self.resolve(filepath.as_ref()))
    }

    /// Returns `true` if every invariant holds.
    pub fn validate(&self) -> bool {
        self.check().is_valid()
    }

    /// Check every invariant and report all violations found.
    pub fn check(&self) -> ValidationReport {
        validate::check(self)
    }

    /// Convert back to the file schema with every path relative to root.
    ///
    /// The root itself is left out so the result can be written into the
    /// project directory and loaded from there. Fails on paths that are
    /// not valid UTF-8, which JSON cannot represent.
    pub fn to_options(&self) -> Result<RawOptions, ConfigError> {
        let relative = |field: &'static str, p: &Path| {
            paths::to_slash(&paths::to_relative(&self.root, p))
                .map(PathBuf::from)
                .ok_or_else(|| ConfigError::NonUtf8Path {
                    field,
                    path: p.to_path_buf(),
                })
        };

        Ok(RawOptions {
            entrypoint: Some(relative("entrypoint", &self.entrypoint)?),
            shell: self
                .shell
                .as_deref()
                .map(|s| relative("shell", s))
                .transpose()?,
            fragments: self
                .fragments
                .iter()
                .map(|f| relative("fragment", f))
                .collect::<Result<_, _>>()?,
            sources: self.sources.iter().cloned().collect(),
            extra_dependencies: self
                .extra_dependencies
                .iter()
                .map(|d| relative("extra dependency", d))
                .collect::<Result<_, _>>()?,
            builds: self.builds.iter().map(BuildOptions::to_entry).collect(),
            lint: self.lint.clone(),
            bundle_manifest: self
                .bundle_manifest
                .as_deref()
                .map(|m| relative("bundle manifest", m))
                .transpose()?,
            ..Default::default()
        })
    }

    /// Pretty-printed JSON form of [`ProjectConfig::to_options`].
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(&self.to_options()?).map_err(ConfigError::Serialize)
    }

    fn resolve(&self, filepath: &Path) -> PathBuf {
        paths::resolve_relative_to(&self.root, filepath)
    }

    /// Replace the derived fields, skipping the guarantees construction gives.
    #[cfg(test)]
    pub(crate) fn with_derived(
        mut self,
        all_fragments: Vec<PathBuf>,
        builds: Vec<BuildOptions>,
    ) -> Self {
        self.all_fragments = all_fragments;
        self.builds = builds;
        self
    }
}

fn derive_all_fragments(shell: Option<&PathBuf>, fragments: &[PathBuf]) -> Vec<PathBuf> {
    let mut all: IndexSet<PathBuf> = IndexSet::new();
    all.extend(shell.cloned());

    for fragment in fragments {
        if !all.insert(fragment.clone()) {
            tracing::warn!(fragment = %fragment.display(), "fragment declared more than once");
        }
    }

    all.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builds::BuildError;
    use crate::config::Violation;

    fn config(json: &str) -> ProjectConfig {
        let options: RawOptions = serde_json::from_str(json).unwrap();
        ProjectConfig::from_options(options, Path::new("/work"), &PresetRegistry::builtin())
            .unwrap()
    }

    #[test]
    fn defaults_for_empty_options() {
        let config = config("{}");
        assert_eq!(config.root(), Path::new("/work"));
        assert_eq!(config.entrypoint(), Path::new("/work/index.html"));
        assert!(config.shell().is_none());
        assert!(config.fragments().is_empty());
        assert!(config.all_fragments().is_empty());
        assert!(config.extra_dependencies().is_empty());
        assert!(config.bundle_manifest().is_none());
        assert!(config.lint().is_none());
        assert_eq!(config.builds(), &[BuildOptions::default()]);
        assert_eq!(
            config.sources().iter().collect::<Vec<_>>(),
            vec!["src/**/*", "index.html"]
        );
        assert!(config.validate());
    }

    #[test]
    fn relative_root_resolves_against_cwd() {
        let config = config(r#"{"root": "app/../site"}"#);
        assert_eq!(config.root(), Path::new("/work/site"));
        assert_eq!(config.entrypoint(), Path::new("/work/site/index.html"));
    }

    #[test]
    fn shell_heads_all_fragments() {
        let config = config(
            r#"{"root": "/proj", "shell": "shell.html", "fragments": ["a.html", "b.html"]}"#,
        );
        assert_eq!(
            config.all_fragments(),
            &[
                PathBuf::from("/proj/shell.html"),
                PathBuf::from("/proj/a.html"),
                PathBuf::from("/proj/b.html"),
            ]
        );
        assert!(config.is_shell("shell.html"));
        assert!(!config.is_fragment("shell.html"));
        assert!(config.is_fragment("a.html"));
        assert!(config.is_fragment("/proj/b.html"));
    }

    #[test]
    fn duplicate_fragments_are_collapsed() {
        let config = config(
            r#"{"root": "/proj", "shell": "s.html",
                "fragments": ["a.html", "s.html", "./a.html"]}"#,
        );
        assert_eq!(
            config.all_fragments(),
            &[PathBuf::from("/proj/s.html"), PathBuf::from("/proj/a.html")]
        );
        assert!(config.validate());
    }

    #[test]
    fn is_fragment_requires_exact_path() {
        let config = config(r#"{"root": "/proj", "fragments": ["src/view.html"]}"#);
        assert!(!config.is_fragment("src/view"));
        assert!(!config.is_fragment("src/view.html.bak"));
        assert!(!config.is_fragment("view.html"));
        assert!(config.is_fragment("src/../src/view.html"));
    }

    #[test]
    fn sources_include_entrypoint_fragments_and_defaults() {
        let config = config(
            r#"{"root": "/proj", "entrypoint": "main.html", "shell": "app/shell.html",
                "fragments": ["app/view.html"], "sources": ["images/**/*", "!src/legacy/**"]}"#,
        );
        assert_eq!(
            config.sources().iter().collect::<Vec<_>>(),
            vec![
                "images/**/*",
                "!src/legacy/**",
                "src/**/*",
                "main.html",
                "app/shell.html",
                "app/view.html",
            ]
        );
        assert!(config.is_source("images/logo.png"));
        assert!(config.is_source("src/my-app.html"));
        assert!(config.is_source("main.html"));
        assert!(config.is_source("/proj/app/view.html"));
        assert!(!config.is_source("src/legacy/old.html"));
        assert!(!config.is_source("README.md"));
    }

    #[test]
    fn builds_expand_presets() {
        let config = config(
            r#"{"builds": [{"preset": "es5-bundled"},
                           {"preset": "es6-unbundled", "name": "modern"}]}"#,
        );
        let names: Vec<_> = config.builds().iter().map(|b| b.name.as_deref()).collect();
        assert_eq!(names, vec![Some("es5-bundled"), Some("modern")]);
        assert!(config.validate());
    }

    #[test]
    fn unknown_preset_fails_construction() {
        let options: RawOptions =
            serde_json::from_str(r#"{"builds": [{"preset": "es5-bundled"}]}"#).unwrap();
        let err = ProjectConfig::from_options(options, Path::new("/work"), &PresetRegistry::empty())
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Build(BuildError::UnknownPreset { ref name, .. }) if name == "es5-bundled"
        ));
    }

    #[test]
    fn escaping_fragment_fails_validation_but_constructs() {
        let config = config(r#"{"fragments": ["../outside.html"]}"#);
        assert_eq!(config.fragments(), &[PathBuf::from("/outside.html")]);
        assert!(!config.validate());
        assert!(config.check().violations().contains(&Violation::OutsideRoot {
            field: "fragment",
            path: PathBuf::from("/outside.html"),
            root: PathBuf::from("/work"),
        }));
    }

    #[test]
    fn relative_cwd_yields_relative_root_violation() {
        let options = RawOptions::default();
        let config =
            ProjectConfig::from_options(options, Path::new("rel"), &PresetRegistry::builtin())
                .unwrap();
        let report = config.check();
        assert!(report
            .violations()
            .contains(&Violation::RootNotAbsolute(PathBuf::from("rel"))));
    }

    #[test]
    fn unnamed_builds_fail_validation_when_several() {
        let config = config(r#"{"builds": [{"bundle": true}, {"bundle": false}]}"#);
        let report = config.check();
        assert!(!report.is_valid());
        assert_eq!(
            report.violations(),
            &[Violation::UnnamedBuild { index: 0 }, Violation::UnnamedBuild { index: 1 }]
        );
    }

    #[test]
    fn duplicate_build_names_fail_validation() {
        let config =
            config(r#"{"builds": [{"preset": "es5-bundled"}, {"preset": "es5-bundled"}]}"#);
        assert_eq!(
            config.check().violations(),
            &[Violation::DuplicateBuildName("es5-bundled".into())]
        );
    }

    #[test]
    fn deprecated_fields_contribute() {
        let config =
            config(r#"{"sourceGlobs": ["lib/**/*.js"], "includeDependencies": ["vendor/x.js"]}"#);
        assert!(config.sources().contains("lib/**/*.js"));
        assert_eq!(config.extra_dependencies(), &[PathBuf::from("/work/vendor/x.js")]);
    }

    #[test]
    fn to_options_relativizes_paths() {
        let config = config(
            r#"{"root": "/proj", "shell": "/proj/src/app.html", "fragments": ["src/v1.html"],
                "extraDependencies": ["manifest.json"], "bundleManifest": "out/bundles.json",
                "lint": {"rules": ["polymer-2"]}}"#,
        );
        let options = config.to_options().unwrap();
        assert!(options.root.is_none());
        assert_eq!(options.entrypoint, Some(PathBuf::from("index.html")));
        assert_eq!(options.shell, Some(PathBuf::from("src/app.html")));
        assert_eq!(options.fragments, vec![PathBuf::from("src/v1.html")]);
        assert_eq!(options.extra_dependencies, vec![PathBuf::from("manifest.json")]);
        assert_eq!(options.bundle_manifest, Some(PathBuf::from("out/bundles.json")));
        assert_eq!(options.builds.len(), 1);
        assert_eq!(options.lint.unwrap().rules, vec!["polymer-2"]);
    }

    #[test]
    fn to_json_round_trips_through_options() {
        let original = config(
            r#"{"shell": "src/app.html", "fragments": ["src/v1.html", "src/v2.html"],
                "sources": ["images/**"],
                "builds": [{"preset": "es6-bundled", "js": {"minify": false}}]}"#,
        );
        let reloaded = config(&original.to_json().unwrap());

        assert_eq!(reloaded.root(), original.root());
        assert_eq!(reloaded.all_fragments(), original.all_fragments());
        assert_eq!(reloaded.sources(), original.sources());
        assert_eq!(reloaded.builds(), original.builds());
        assert_eq!(reloaded.to_json().unwrap(), original.to_json().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_fragment_fails_validation_and_serialization() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let fragment = PathBuf::from(OsStr::from_bytes(b"src/caf\xe9.html"));
        let options = RawOptions {
            root: Some(PathBuf::from("/proj")),
            fragments: vec![fragment.clone()],
            ..Default::default()
        };
        let config =
            ProjectConfig::from_options(options, Path::new("/"), &PresetRegistry::builtin())
                .unwrap();

        assert!(!config.validate());
        assert!(config.check().violations().contains(&Violation::NonUtf8Path {
            field: "fragment",
            path: Path::new("/proj").join(&fragment),
        }));
        assert!(matches!(
            config.to_json(),
            Err(ConfigError::NonUtf8Path { field: "fragment", .. })
        ));
    }

    #[test]
    fn config_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProjectConfig>();
    }
}

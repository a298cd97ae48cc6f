//! Build target options: raw entries, preset expansion, and defaulting.
//!
//! A build entry in `project.json` may name a preset. The preset's fields
//! are laid down first, then every field the user wrote on the entry is
//! overlaid on top (nested `js`/`css`/`html`/`bundle` records merge per
//! field), and finally anything still unset takes its default.

pub mod presets;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use presets::PresetRegistry;

/// Errors from build option normalization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("unknown build preset '{name}' (known presets: {known})")]
    UnknownPreset { name: String, known: String },
}

/// A build entry as written by the user. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle: Option<BundleSetting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub js: Option<JsEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css: Option<MinifyEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<MinifyEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_service_worker: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_push_manifest: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_prefetch_links: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<BasePath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_capabilities: Option<Vec<String>>,
}

/// `"basePath": true` serves the build under its own name; a string sets
/// the prefix explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BasePath {
    Enabled(bool),
    Path(String),
}

/// `"bundle": true` or a detailed bundler record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BundleSetting {
    Enabled(bool),
    Options(BundleEntry),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BundleEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_css: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_scripts: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strip_comments: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sourcemaps: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JsEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compile: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform_modules_to_amd: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinifyEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minify: Option<bool>,
}

impl BuildEntry {
    /// Overlay `over` onto `self`; fields set in `over` win.
    pub fn overlay(&self, over: &BuildEntry) -> BuildEntry {
        BuildEntry {
            name: over.name.clone().or_else(|| self.name.clone()),
            preset: over.preset.clone().or_else(|| self.preset.clone()),
            bundle: overlay_bundle(self.bundle.as_ref(), over.bundle.as_ref()),
            js: merge_nested(self.js.as_ref(), over.js.as_ref(), JsEntry::overlay),
            css: merge_nested(self.css.as_ref(), over.css.as_ref(), MinifyEntry::overlay),
            html: merge_nested(self.html.as_ref(), over.html.as_ref(), MinifyEntry::overlay),
            add_service_worker: over.add_service_worker.or(self.add_service_worker),
            add_push_manifest: over.add_push_manifest.or(self.add_push_manifest),
            insert_prefetch_links: over.insert_prefetch_links.or(self.insert_prefetch_links),
            base_path: over.base_path.clone().or_else(|| self.base_path.clone()),
            browser_capabilities: over
                .browser_capabilities
                .clone()
                .or_else(|| self.browser_capabilities.clone()),
        }
    }
}

impl BundleEntry {
    fn overlay(&self, over: &BundleEntry) -> BundleEntry {
        BundleEntry {
            exclude: over.exclude.clone().or_else(|| self.exclude.clone()),
            inline_css: over.inline_css.or(self.inline_css),
            inline_scripts: over.inline_scripts.or(self.inline_scripts),
            strip_comments: over.strip_comments.or(self.strip_comments),
            sourcemaps: over.sourcemaps.or(self.sourcemaps),
        }
    }
}

impl JsEntry {
    fn overlay(&self, over: &JsEntry) -> JsEntry {
        JsEntry {
            minify: over.minify.or(self.minify),
            compile: over.compile.or(self.compile),
            transform_modules_to_amd: over
                .transform_modules_to_amd
                .or(self.transform_modules_to_amd),
        }
    }
}

impl MinifyEntry {
    fn overlay(&self, over: &MinifyEntry) -> MinifyEntry {
        MinifyEntry {
            minify: over.minify.or(self.minify),
        }
    }
}

fn merge_nested<T: Clone>(
    base: Option<&T>,
    over: Option<&T>,
    merge: fn(&T, &T) -> T,
) -> Option<T> {
    match (base, over) {
        (Some(b), Some(o)) => Some(merge(b, o)),
        (None, Some(o)) => Some(o.clone()),
        (Some(b), None) => Some(b.clone()),
        (None, None) => None,
    }
}

/// A bare boolean replaces whatever the base had; two records merge.
fn overlay_bundle(
    base: Option<&BundleSetting>,
    over: Option<&BundleSetting>,
) -> Option<BundleSetting> {
    match (base, over) {
        (Some(BundleSetting::Options(b)), Some(BundleSetting::Options(o))) => {
            Some(BundleSetting::Options(b.overlay(o)))
        }
        (_, Some(o)) => Some(o.clone()),
        (b, None) => b.cloned(),
    }
}

/// Fully resolved options for one build target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub name: Option<String>,
    /// Preset the entry was expanded from, kept for provenance.
    pub preset: Option<String>,
    /// `None` when the build is not bundled.
    pub bundle: Option<BundleOptions>,
    pub js: JsOptions,
    pub css: MinifyOptions,
    pub html: MinifyOptions,
    pub add_service_worker: bool,
    pub add_push_manifest: bool,
    pub insert_prefetch_links: bool,
    pub base_path: Option<BasePath>,
    pub browser_capabilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleOptions {
    pub exclude: Vec<String>,
    pub inline_css: bool,
    pub inline_scripts: bool,
    pub strip_comments: bool,
    pub sourcemaps: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsOptions {
    pub minify: bool,
    pub compile: bool,
    pub transform_modules_to_amd: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinifyOptions {
    pub minify: bool,
}

impl BundleOptions {
    /// Defaults applied when bundling is switched on without details.
    fn from_entry(entry: &BundleEntry) -> Self {
        Self {
            exclude: entry.exclude.clone().unwrap_or_default(),
            inline_css: entry.inline_css.unwrap_or(true),
            inline_scripts: entry.inline_scripts.unwrap_or(true),
            strip_comments: entry.strip_comments.unwrap_or(true),
            sourcemaps: entry.sourcemaps.unwrap_or(false),
        }
    }

    fn to_entry(&self) -> BundleEntry {
        BundleEntry {
            exclude: Some(self.exclude.clone()),
            inline_css: Some(self.inline_css),
            inline_scripts: Some(self.inline_scripts),
            strip_comments: Some(self.strip_comments),
            sourcemaps: Some(self.sourcemaps),
        }
    }
}

impl BuildOptions {
    /// Fill every unset field of an (already preset-expanded) entry.
    pub fn from_entry(entry: &BuildEntry) -> Self {
        let js = entry.js.clone().unwrap_or_default();
        let minify = |e: &Option<MinifyEntry>| MinifyOptions {
            minify: e.as_ref().and_then(|m| m.minify).unwrap_or(false),
        };

        Self {
            name: entry.name.clone(),
            preset: entry.preset.clone(),
            bundle: match &entry.bundle {
                None | Some(BundleSetting::Enabled(false)) => None,
                Some(BundleSetting::Enabled(true)) => {
                    Some(BundleOptions::from_entry(&BundleEntry::default()))
                }
                Some(BundleSetting::Options(b)) => Some(BundleOptions::from_entry(b)),
            },
            js: JsOptions {
                minify: js.minify.unwrap_or(false),
                compile: js.compile.unwrap_or(false),
                transform_modules_to_amd: js.transform_modules_to_amd.unwrap_or(false),
            },
            css: minify(&entry.css),
            html: minify(&entry.html),
            add_service_worker: entry.add_service_worker.unwrap_or(false),
            add_push_manifest: entry.add_push_manifest.unwrap_or(false),
            insert_prefetch_links: entry.insert_prefetch_links.unwrap_or(false),
            base_path: entry.base_path.clone(),
            browser_capabilities: entry.browser_capabilities.clone().unwrap_or_default(),
        }
    }

    /// The URL prefix the build is served under, if any.
    ///
    /// `basePath: true` uses the build name; `false` means no prefix.
    pub fn effective_base_path(&self) -> Option<&str> {
        match self.base_path.as_ref()? {
            BasePath::Enabled(true) => self.name.as_deref(),
            BasePath::Enabled(false) => None,
            BasePath::Path(path) => Some(path),
        }
    }

    /// Write every resolved field back out explicitly.
    ///
    /// Normalizing the result again yields an equal value, whatever the
    /// preset contributes, since explicit fields always win.
    pub fn to_entry(&self) -> BuildEntry {
        BuildEntry {
            name: self.name.clone(),
            preset: self.preset.clone(),
            bundle: Some(match &self.bundle {
                Some(b) => BundleSetting::Options(b.to_entry()),
                None => BundleSetting::Enabled(false),
            }),
            js: Some(JsEntry {
                minify: Some(self.js.minify),
                compile: Some(self.js.compile),
                transform_modules_to_amd: Some(self.js.transform_modules_to_amd),
            }),
            css: Some(MinifyEntry { minify: Some(self.css.minify) }),
            html: Some(MinifyEntry { minify: Some(self.html.minify) }),
            add_service_worker: Some(self.add_service_worker),
            add_push_manifest: Some(self.add_push_manifest),
            insert_prefetch_links: Some(self.insert_prefetch_links),
            base_path: self.base_path.clone(),
            browser_capabilities: Some(self.browser_capabilities.clone()),
        }
    }
}

/// Expand `entry` through its preset (if any) and apply defaults.
pub fn normalize_build(
    entry: &BuildEntry,
    presets: &PresetRegistry,
) -> Result<BuildOptions, BuildError> {
    let expanded = match entry.preset.as_deref() {
        Some(name) => {
            let preset = presets.get(name).ok_or_else(|| BuildError::UnknownPreset {
                name: name.to_string(),
                known: presets.names().collect::<Vec<_>>().join(", "),
            })?;
            preset.overlay(entry)
        }
        None => entry.clone(),
    };

    Ok(BuildOptions::from_entry(&expanded))
}

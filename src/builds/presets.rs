//! Named build preset registry.
//!
//! The built-in table ships the standard targets for differential serving:
//! compiled/bundled ES5 for legacy browsers, and ES2015 variants with or
//! without bundling for modern ones.

use indexmap::IndexMap;

use super::{BuildEntry, BundleSetting, JsEntry, MinifyEntry};

/// One row of the built-in preset table.
struct BuiltinPreset {
    name: &'static str,
    compile: bool,
    bundle: bool,
    capabilities: &'static [&'static str],
    push_manifest: bool,
}

/// Built-in presets, in listing order.
const BUILTINS: &[BuiltinPreset] = &[
    BuiltinPreset {
        name: "es5-bundled",
        compile: true,
        bundle: true,
        capabilities: &[],
        push_manifest: false,
    },
    BuiltinPreset {
        name: "es6-bundled",
        compile: false,
        bundle: true,
        capabilities: &["es2015"],
        push_manifest: false,
    },
    BuiltinPreset {
        name: "es6-unbundled",
        compile: false,
        bundle: false,
        capabilities: &["es2015", "push"],
        push_manifest: true,
    },
    BuiltinPreset {
        name: "uncompiled-bundled",
        compile: false,
        bundle: true,
        capabilities: &[],
        push_manifest: false,
    },
    BuiltinPreset {
        name: "uncompiled-unbundled",
        compile: false,
        bundle: false,
        capabilities: &[],
        push_manifest: true,
    },
];

/// Mapping from preset name to the build entry it expands to.
#[derive(Debug, Clone, Default)]
pub struct PresetRegistry {
    presets: IndexMap<String, BuildEntry>,
}

impl PresetRegistry {
    /// A registry with no presets.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The registry used when none is supplied.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for preset in BUILTINS {
            registry.insert(preset.name, preset.entry());
        }
        registry
    }

    /// Register (or replace) a preset.
    ///
    /// The preset's `name` defaults to its registry key so builds expanded
    /// from it are named after it unless the user says otherwise.
    pub fn insert(&mut self, name: impl Into<String>, mut entry: BuildEntry) {
        let name = name.into();
        if entry.name.is_none() {
            entry.name = Some(name.clone());
        }
        entry.preset = None;
        self.presets.insert(name, entry);
    }

    pub fn get(&self, name: &str) -> Option<&BuildEntry> {
        self.presets.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }

    /// Preset names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BuildEntry)> {
        self.presets.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

fn minified() -> Option<MinifyEntry> {
    Some(MinifyEntry { minify: Some(true) })
}

impl BuiltinPreset {
    fn entry(&self) -> BuildEntry {
        BuildEntry {
            bundle: Some(BundleSetting::Enabled(self.bundle)),
            js: Some(JsEntry {
                minify: Some(true),
                compile: Some(self.compile),
                transform_modules_to_amd: Some(self.compile),
            }),
            css: minified(),
            html: minified(),
            add_service_worker: Some(true),
            add_push_manifest: Some(self.push_manifest),
            browser_capabilities: (!self.capabilities.is_empty())
                .then(|| self.capabilities.iter().map(|c| c.to_string()).collect()),
            ..Default::default()
        }
    }
}

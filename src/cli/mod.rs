//! CLI command definitions and terminal rendering.
//!
//! Uses clap derive macros for argument definitions. Rendering helpers
//! return strings so they can be tested without capturing stdout.

pub mod args;

use std::path::Path;

use colored::Colorize;

use projconf::builds::{BuildOptions, PresetRegistry};
use projconf::config::{ProjectConfig, ValidationReport};
use projconf::lint::{RuleCode, RuleRegistry};

/// Roles a file plays in the project, in display order.
pub fn classify(config: &ProjectConfig, file: &Path) -> Vec<&'static str> {
    let mut roles = Vec::new();
    if config.is_shell(file) {
        roles.push("shell");
    }
    if config.is_fragment(file) {
        roles.push("fragment");
    }
    if config.is_source(file) {
        roles.push("source");
    }
    roles
}

/// One line per file: the path and its roles.
pub fn render_classification(config: &ProjectConfig, files: &[impl AsRef<Path>]) -> String {
    let mut out = String::new();
    for file in files {
        let file = file.as_ref();
        let roles = classify(config, file);
        let label = if roles.is_empty() {
            "-".dimmed().to_string()
        } else {
            roles.join(", ").green().to_string()
        };
        out.push_str(&format!("{}  {}\n", file.display(), label));
    }
    out
}

/// Human-readable validation summary for `source` (the config file path).
pub fn render_report(source: &Path, report: &ValidationReport) -> String {
    if report.is_valid() {
        return format!("{} {} is valid\n", "✓".green().bold(), source.display());
    }

    let mut out = format!(
        "{} {} has {} problem(s):\n",
        "✗".red().bold(),
        source.display(),
        report.violations().len()
    );
    for violation in report.violations() {
        out.push_str(&format!("  {} {violation}\n", "-".red()));
    }
    out
}

fn describe_build(build: &BuildOptions) -> String {
    let mut traits = Vec::new();
    traits.push(if build.bundle.is_some() { "bundled" } else { "unbundled" });
    if build.js.compile {
        traits.push("compiled");
    }
    if build.js.minify {
        traits.push("minified js");
    }
    if build.add_service_worker {
        traits.push("service worker");
    }
    if build.add_push_manifest {
        traits.push("push manifest");
    }
    traits.join(", ")
}

/// List presets with a short description of what each one produces.
pub fn render_presets(presets: &PresetRegistry) -> String {
    let mut out = String::new();
    for (name, entry) in presets.iter() {
        let build = BuildOptions::from_entry(entry);
        out.push_str(&format!("  {}  {}\n", name.bold(), describe_build(&build).dimmed()));
        if !build.browser_capabilities.is_empty() {
            out.push_str(&format!(
                "         {}  {}\n",
                "requires:".cyan(),
                build.browser_capabilities.join(", ")
            ));
        }
    }
    out
}

/// List rules, then collections with their members.
pub fn render_rules(registry: &RuleRegistry) -> String {
    let mut rules = String::new();
    let mut collections = String::new();

    for (code, kind) in registry.iter() {
        match kind {
            RuleCode::Rule { description } => {
                rules.push_str(&format!("  {}  {}\n", code.bold(), description.dimmed()));
            }
            RuleCode::Collection { rules: members } => {
                collections.push_str(&format!("  {}\n", code.bold()));
                collections.push_str(&format!("         {}\n", members.join(", ").dimmed()));
            }
        }
    }

    format!("{}\n{rules}\n{}\n{collections}", "Rules".underline(), "Collections".underline())
}

//! Lint options and the rule code registry.
//!
//! `project.json` names lint rules by code. A code is either a single rule
//! or a collection that expands to several rules. The options are passed
//! through to the linter untouched; codes are only checked against the
//! registry when a consumer asks for the expanded rule list.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from lint rule lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LintError {
    #[error("unknown lint rule or collection '{0}'")]
    UnknownRule(String),
}

/// The `lint` section of `project.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintOptions {
    #[serde(default)]
    pub rules: Vec<String>,
    /// Warning codes suppressed project-wide after the rules run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore_warnings: Vec<String>,
}

impl LintOptions {
    /// Expand every configured code into individual rule codes.
    ///
    /// Collections are flattened; duplicates are dropped while keeping
    /// first-seen order.
    pub fn resolve_rules<'r>(&self, registry: &'r RuleRegistry) -> Result<Vec<&'r str>, LintError> {
        let mut resolved: IndexSet<&'r str> = IndexSet::new();
        for code in &self.rules {
            resolved.extend(registry.expand(code)?);
        }
        Ok(resolved.into_iter().collect())
    }

    /// Returns `true` if warnings with `code` are suppressed.
    pub fn is_ignored(&self, code: &str) -> bool {
        self.ignore_warnings.iter().any(|c| c == code)
    }
}

/// Individual rule codes known to the linter.
const RULES: &[(&str, &str)] = &[
    ("behaviors-spelling", "Warns on the British spelling of `behaviours`."),
    ("call-super-in-callbacks", "Lifecycle callbacks of subclasses must call super."),
    ("content-to-slot-usages", "Flags `<content>` selectors that must become `<slot>`."),
    ("databind-with-unknown-property", "Data bindings must refer to declared properties."),
    ("dom-module-invalid-attrs", "`<dom-module>` takes only an `id` attribute."),
    ("element-before-dom-module", "Element registration must follow its `<dom-module>`."),
    ("set-unknown-attribute", "Bindings must not set unknown attributes."),
    ("style-into-template", "`<style>` belongs inside the element template."),
    ("unbalanced-polymer-delimiters", "Binding delimiters must be balanced."),
    ("undefined-elements", "Custom elements used in templates must be defined."),
];

/// Collections of rules, addressable by one code.
const COLLECTIONS: &[(&str, &[&str])] = &[
    (
        "polymer-1",
        &[
            "behaviors-spelling",
            "databind-with-unknown-property",
            "dom-module-invalid-attrs",
            "element-before-dom-module",
            "set-unknown-attribute",
            "unbalanced-polymer-delimiters",
            "undefined-elements",
        ],
    ),
    (
        "polymer-2",
        &[
            "behaviors-spelling",
            "call-super-in-callbacks",
            "databind-with-unknown-property",
            "dom-module-invalid-attrs",
            "element-before-dom-module",
            "set-unknown-attribute",
            "style-into-template",
            "unbalanced-polymer-delimiters",
            "undefined-elements",
        ],
    ),
    (
        "polymer-2-hybrid",
        &[
            "behaviors-spelling",
            "content-to-slot-usages",
            "databind-with-unknown-property",
            "dom-module-invalid-attrs",
            "element-before-dom-module",
            "set-unknown-attribute",
            "style-into-template",
            "unbalanced-polymer-delimiters",
            "undefined-elements",
        ],
    ),
];

/// What a registry code stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleCode {
    Rule { description: String },
    Collection { rules: Vec<String> },
}

/// Mapping from stable rule codes to rules and collections.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    codes: IndexMap<String, RuleCode>,
}

impl RuleRegistry {
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        for (code, description) in RULES {
            registry.add_rule(*code, *description);
        }
        for (code, rules) in COLLECTIONS {
            registry.add_collection(*code, rules.iter().map(|r| r.to_string()).collect());
        }
        registry
    }

    pub fn add_rule(&mut self, code: impl Into<String>, description: impl Into<String>) {
        self.codes.insert(
            code.into(),
            RuleCode::Rule {
                description: description.into(),
            },
        );
    }

    pub fn add_collection(&mut self, code: impl Into<String>, rules: Vec<String>) {
        self.codes.insert(code.into(), RuleCode::Collection { rules });
    }

    pub fn get(&self, code: &str) -> Option<&RuleCode> {
        self.codes.get(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleCode)> {
        self.codes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Expand one code into the individual rules it stands for.
    pub fn expand(&self, code: &str) -> Result<Vec<&str>, LintError> {
        match self.codes.get_key_value(code) {
            Some((key, RuleCode::Rule { .. })) => Ok(vec![key.as_str()]),
            Some((_, RuleCode::Collection { rules })) => {
                let mut expanded = Vec::new();
                for rule in rules {
                    match self.codes.get_key_value(rule.as_str()) {
                        Some((key, RuleCode::Rule { .. })) => expanded.push(key.as_str()),
                        _ => return Err(LintError::UnknownRule(rule.clone())),
                    }
                }
                Ok(expanded)
            }
            None => Err(LintError::UnknownRule(code.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lint(rules: &[&str]) -> LintOptions {
        LintOptions {
            rules: rules.iter().map(|r| r.to_string()).collect(),
            ignore_warnings: Vec::new(),
        }
    }

    #[test]
    fn single_rule_resolves_to_itself() {
        let registry = RuleRegistry::builtin();
        let rules = lint(&["dom-module-invalid-attrs"]).resolve_rules(&registry).unwrap();
        assert_eq!(rules, vec!["dom-module-invalid-attrs"]);
    }

    #[test]
    fn collections_expand_without_duplicates() {
        let registry = RuleRegistry::builtin();
        let rules = lint(&["undefined-elements", "polymer-2"])
            .resolve_rules(&registry)
            .unwrap();
        assert_eq!(rules[0], "undefined-elements");
        assert!(rules.contains(&"call-super-in-callbacks"));
        assert_eq!(rules.iter().filter(|r| **r == "undefined-elements").count(), 1);
    }

    #[test]
    fn unknown_code_is_an_error() {
        let registry = RuleRegistry::builtin();
        let err = lint(&["polymer-2", "no-such-rule"])
            .resolve_rules(&registry)
            .unwrap_err();
        assert_eq!(err, LintError::UnknownRule("no-such-rule".into()));
    }

    #[test]
    fn collection_with_unregistered_member_is_an_error() {
        let mut registry = RuleRegistry::default();
        registry.add_collection("broken", vec!["missing".into()]);
        assert_eq!(
            registry.expand("broken").unwrap_err(),
            LintError::UnknownRule("missing".into())
        );
    }

    #[test]
    fn builtin_collections_reference_known_rules() {
        let registry = RuleRegistry::builtin();
        for (code, _) in COLLECTIONS {
            assert!(registry.expand(code).is_ok(), "collection {code}");
        }
    }

    #[test]
    fn ignore_warnings_lookup() {
        let options: LintOptions = serde_json::from_str(
            r#"{"rules": ["polymer-2"], "ignoreWarnings": ["undefined-elements"]}"#,
        )
        .unwrap();
        assert!(options.is_ignored("undefined-elements"));
        assert!(!options.is_ignored("set-unknown-attribute"));
    }
}

// debsolve-core/src/resolver/version.rs
//! Choosing how the version of a project artifact is rewritten for Debian.
use std::collections::HashMap;

use debsolve_common::error::Result;
use debsolve_common::model::rule::{ANY_PATTERN, CUSTOM_PATTERN};
use debsolve_common::model::Rule;
use once_cell::sync::Lazy;
use regex::Regex;

static MAJOR_VERSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)(\..*)$").unwrap());

const DEBIAN_PATTERN: &str = "s/.*/debian/";

/// The rules offered for a version, plus the choice made for every version
/// already seen in this run.
#[derive(Debug, Clone)]
pub struct VersionRules {
    defaults: Vec<Rule>,
    chosen: HashMap<String, Rule>,
}

impl Default for VersionRules {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionRules {
    pub fn new() -> Self {
        Self {
            defaults: builtin_rules().unwrap_or_default(),
            chosen: HashMap::new(),
        }
    }

    /// Rules to offer for `version`: the major-version collapse when the
    /// version starts with a number, then the defaults, custom rules, and
    /// the `CUSTOM` entry last.
    pub fn choices(&self, version: &str) -> Vec<Rule> {
        let mut choices = Vec::with_capacity(self.defaults.len() + 1);
        if let Some(captures) = MAJOR_VERSION.captures(version) {
            let major = &captures[1];
            let pattern = format!(r"s/{major}\..*/{major}.x/");
            let description = format!("Replace all versions starting by {major}. with {major}.x");
            if let Ok(rule) = Rule::new(&pattern, &description) {
                choices.push(rule);
            }
        }
        for rule in &self.defaults {
            if !choices.contains(rule) {
                choices.push(rule.clone());
            }
        }
        choices
    }

    /// Index of the symbolic `debian` version rule in `choices`.
    pub fn default_choice(choices: &[Rule]) -> usize {
        choices
            .iter()
            .position(|rule| rule.pattern() == DEBIAN_PATTERN)
            .unwrap_or(0)
    }

    pub fn remembered(&self, version: &str) -> Option<&Rule> {
        self.chosen.get(version)
    }

    pub fn remember(&mut self, version: &str, rule: Rule) {
        self.chosen.insert(version.to_string(), rule);
    }

    /// Offers a custom rule for later versions, ahead of the `CUSTOM` entry.
    pub fn add_custom(&mut self, rule: Rule) {
        if self.defaults.contains(&rule) {
            return;
        }
        let at = self
            .defaults
            .iter()
            .position(Rule::is_custom)
            .unwrap_or(self.defaults.len());
        self.defaults.insert(at, rule);
    }
}

fn builtin_rules() -> Result<Vec<Rule>> {
    Ok(vec![
        Rule::new(
            DEBIAN_PATTERN,
            "Change the version to the symbolic 'debian' version",
        )?,
        Rule::new(ANY_PATTERN, "Keep the version")?,
        Rule::new(CUSTOM_PATTERN, "Custom rule")?,
    ])
}

/// One line per rule: `pattern - description`.
pub fn describe(rule: &Rule) -> String {
    if rule.description().is_empty() {
        rule.pattern().to_string()
    } else {
        format!("{} - {}", rule.pattern(), rule.description())
    }
}

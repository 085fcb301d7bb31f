// debsolve-common/src/rules/set.rs
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::Result;
use crate::model::{Dependency, DependencyRule};

/// An ordered, duplicate-free collection of rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    name: String,
    description: String,
    rules: Vec<DependencyRule>,
}

impl RuleSet {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            rules: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn rules(&self) -> &[DependencyRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn contains(&self, rule: &DependencyRule) -> bool {
        self.rules.contains(rule)
    }

    /// Appends a rule unless an identical one is already present.
    pub fn add(&mut self, rule: DependencyRule) -> bool {
        if self.rules.contains(&rule) {
            return false;
        }
        debug!("[{}] add rule {}", self.name, rule);
        self.rules.push(rule);
        true
    }

    pub fn add_all<'a>(&mut self, rules: impl IntoIterator<Item = &'a DependencyRule>) {
        for rule in rules {
            self.add(rule.clone());
        }
    }

    pub fn find_matching_rules(&self, dependency: &Dependency) -> Vec<&DependencyRule> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(dependency))
            .collect()
    }

    pub fn first_match(&self, dependency: &Dependency) -> Option<&DependencyRule> {
        self.rules.iter().find(|rule| rule.matches(dependency))
    }

    pub fn matches(&self, dependency: &Dependency) -> bool {
        self.first_match(dependency).is_some()
    }

    /// Reads one rule per line. Comments, blank and malformed lines are skipped.
    pub fn read(path: &Path, name: &str, description: &str) -> Result<Self> {
        let mut set = Self::new(name, description);
        if !path.exists() {
            debug!("[{}] no rules file at {}", name, path.display());
            return Ok(set);
        }
        let content = fs::read_to_string(path)?;
        for (index, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            match DependencyRule::parse(trimmed) {
                Ok(rule) => {
                    set.add(rule);
                }
                Err(e) => warn!(
                    "{}:{}: skipping malformed rule: {}",
                    path.display(),
                    index + 1,
                    e
                ),
            }
        }
        debug!("[{}] read {} rules from {}", name, set.len(), path.display());
        Ok(set)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let mut out = String::new();
        for line in self.description.lines() {
            out.push_str("# ");
            out.push_str(line);
            out.push('\n');
        }
        for rule in &self.rules {
            out.push_str(&rule.to_line());
            out.push('\n');
        }
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, out)?;
        Ok(())
    }
}

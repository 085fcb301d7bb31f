// debsolve-common/src/model/rule.rs
//! Field rules and dependency rules.
//!
//! A [`Rule`] matches and rewrites one field of a coordinate. It is one of
//! `*` (anything, kept as is), a literal, a sed-style `s/regex/replacement/`
//! substitution, or the `CUSTOM` sentinel which stands for "ask the operator"
//! and must be replaced by a concrete rule before it is stored.
//!
//! A [`DependencyRule`] bundles four field rules in the textual order
//! `group artifact type version`, optionally followed by `# description`.
use std::fmt;
use std::hash::{Hash, Hasher};

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::dependency::Dependency;
use crate::error::{DebsolveError, Result};

pub const ANY_PATTERN: &str = "*";
pub const CUSTOM_PATTERN: &str = "CUSTOM";

#[derive(Debug, Clone)]
enum Matcher {
    Any,
    Literal(String),
    Substitute { regex: Regex, replacement: String },
    Custom,
}

#[derive(Debug, Clone)]
pub struct Rule {
    pattern: String,
    description: String,
    matcher: Matcher,
}

impl Rule {
    pub fn new(pattern: &str, description: &str) -> Result<Self> {
        let pattern = pattern.trim();
        let matcher = if pattern.is_empty() || pattern == ANY_PATTERN {
            Matcher::Any
        } else if pattern == CUSTOM_PATTERN {
            Matcher::Custom
        } else if let Some(body) = pattern.strip_prefix("s/") {
            let (expr, replacement) = split_substitution(body)
                .ok_or_else(|| invalid(pattern, "expected s/regex/replacement/"))?;
            let regex = Regex::new(&format!("^(?:{expr})$"))
                .map_err(|e| invalid(pattern, &e.to_string()))?;
            Matcher::Substitute {
                regex,
                replacement: convert_replacement(&replacement),
            }
        } else {
            Matcher::Literal(pattern.to_string())
        };

        Ok(Self {
            pattern: if pattern.is_empty() {
                ANY_PATTERN.to_string()
            } else {
                pattern.to_string()
            },
            description: description.to_string(),
            matcher,
        })
    }

    pub fn parse(pattern: &str) -> Result<Self> {
        Self::new(pattern, "")
    }

    pub fn any() -> Self {
        Self {
            pattern: ANY_PATTERN.to_string(),
            description: String::new(),
            matcher: Matcher::Any,
        }
    }

    pub fn literal(value: &str) -> Self {
        Self {
            pattern: value.to_string(),
            description: String::new(),
            matcher: Matcher::Literal(value.to_string()),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_any(&self) -> bool {
        matches!(self.matcher, Matcher::Any)
    }

    pub fn is_custom(&self) -> bool {
        matches!(self.matcher, Matcher::Custom)
    }

    pub fn literal_value(&self) -> Option<&str> {
        match &self.matcher {
            Matcher::Literal(value) => Some(value),
            _ => None,
        }
    }

    /// A missing value is only matched by `*`.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match (&self.matcher, value) {
            (Matcher::Any, _) => true,
            (Matcher::Literal(literal), Some(v)) => literal == v,
            (Matcher::Substitute { regex, .. }, Some(v)) => regex.is_match(v),
            _ => false,
        }
    }

    pub fn apply(&self, value: &str) -> String {
        match &self.matcher {
            Matcher::Any | Matcher::Custom => value.to_string(),
            Matcher::Literal(literal) => literal.clone(),
            Matcher::Substitute { regex, replacement } => {
                regex.replace(value, replacement.as_str()).into_owned()
            }
        }
    }

    pub fn apply_opt(&self, value: Option<&str>) -> Option<String> {
        match (value, &self.matcher) {
            (Some(v), _) => Some(self.apply(v)),
            (None, Matcher::Literal(literal)) => Some(literal.clone()),
            (None, _) => None,
        }
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for Rule {}

impl Hash for Rule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pattern.hash(state);
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

fn invalid(pattern: &str, reason: &str) -> DebsolveError {
    DebsolveError::InvalidRule(pattern.to_string(), reason.to_string())
}

/// Splits `regex/replacement/` on unescaped slashes. The trailing slash is optional.
fn split_substitution(body: &str) -> Option<(String, String)> {
    let mut parts = vec![String::new()];
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'/') => {
                chars.next();
                parts.last_mut()?.push('/');
            }
            '/' => parts.push(String::new()),
            _ => parts.last_mut()?.push(c),
        }
    }
    match parts.as_slice() {
        [expr, replacement] | [expr, replacement, _] if !expr.is_empty() => {
            if parts.len() == 3 && !parts[2].is_empty() {
                return None;
            }
            Some((expr.clone(), replacement.clone()))
        }
        _ => None,
    }
}

/// `$1` style references become `${1}` so that a following letter is not
/// read as part of a group name; `\x` escapes produce a literal `x`.
fn convert_replacement(replacement: &str) -> String {
    let mut out = String::with_capacity(replacement.len() + 4);
    let mut chars = replacement.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    if escaped == '$' {
                        out.push_str("$$");
                    } else {
                        out.push(escaped);
                    }
                }
            }
            '$' if chars.peek().is_some_and(|n| n.is_ascii_digit()) => {
                out.push_str("${");
                while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                    out.push(d);
                    chars.next();
                }
                out.push('}');
            }
            '$' => out.push_str("$$"),
            _ => out.push(c),
        }
    }
    out
}

/// Matches a coordinate by group, artifact and type, and rewrites it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DependencyRule {
    group_rule: Rule,
    artifact_rule: Rule,
    type_rule: Rule,
    version_rule: Rule,
    description: String,
}

impl DependencyRule {
    pub fn new(group: &str, artifact: &str, artifact_type: &str, version: &str) -> Result<Self> {
        Ok(Self {
            group_rule: Rule::parse(group)?,
            artifact_rule: Rule::parse(artifact)?,
            type_rule: Rule::parse(artifact_type)?,
            version_rule: Rule::parse(version)?,
            description: String::new(),
        })
    }

    pub fn with_version_rule(
        group: &str,
        artifact: &str,
        artifact_type: &str,
        version_rule: Rule,
    ) -> Result<Self> {
        let description = version_rule.description().to_string();
        Ok(Self {
            group_rule: Rule::parse(group)?,
            artifact_rule: Rule::parse(artifact)?,
            type_rule: Rule::parse(artifact_type)?,
            version_rule,
            description,
        })
    }

    /// Parses `group artifact type version [# description]`. Missing trailing
    /// fields default to `*`.
    pub fn parse(line: &str) -> Result<Self> {
        let (body, description) = match line.split_once('#') {
            Some((body, comment)) => (body, comment.trim()),
            None => (line, ""),
        };
        let fields: Vec<&str> = body.split_whitespace().collect();
        if fields.is_empty() || fields.len() > 4 {
            return Err(invalid(
                line.trim(),
                "expected 'group artifact type version'",
            ));
        }
        let field = |i: usize| fields.get(i).copied().unwrap_or(ANY_PATTERN);
        let mut rule = Self::new(field(0), field(1), field(2), field(3))?;
        if rule.version_rule.is_custom() {
            return Err(invalid(line.trim(), "CUSTOM cannot be stored as a rule"));
        }
        rule.description = description.to_string();
        Ok(rule)
    }

    /// A rule matching exactly the group, artifact and type of a coordinate, any version.
    pub fn to_match(dependency: &Dependency) -> Self {
        Self {
            group_rule: Rule::literal(&dependency.group_id),
            artifact_rule: Rule::literal(&dependency.artifact_id),
            type_rule: Rule::literal(&dependency.artifact_type),
            version_rule: Rule::any(),
            description: String::new(),
        }
    }

    /// `group artifact * *`: drops every type and version of an artifact.
    pub fn to_ignore(dependency: &Dependency) -> Self {
        Self {
            group_rule: Rule::literal(&dependency.group_id),
            artifact_rule: Rule::literal(&dependency.artifact_id),
            type_rule: Rule::any(),
            version_rule: Rule::any(),
            description: String::new(),
        }
    }

    pub fn group_rule(&self) -> &Rule {
        &self.group_rule
    }

    pub fn artifact_rule(&self) -> &Rule {
        &self.artifact_rule
    }

    pub fn type_rule(&self) -> &Rule {
        &self.type_rule
    }

    pub fn version_rule(&self) -> &Rule {
        &self.version_rule
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn matches(&self, dependency: &Dependency) -> bool {
        self.group_rule.matches(Some(&dependency.group_id))
            && self.artifact_rule.matches(Some(&dependency.artifact_id))
            && self.type_rule.matches(Some(&dependency.artifact_type))
            && self.version_rule.matches(dependency.version())
    }

    /// Rewrites the coordinate. Scope, classifier and the optional flag are kept.
    pub fn apply(&self, dependency: &Dependency) -> Dependency {
        let mut result = dependency.clone();
        result.group_id = self.group_rule.apply(&dependency.group_id);
        result.artifact_id = self.artifact_rule.apply(&dependency.artifact_id);
        result.artifact_type = self.type_rule.apply(&dependency.artifact_type);
        result.version = self.version_rule.apply_opt(dependency.version());
        result
    }

    pub fn explicitly_mentions(&self, dependency: &Dependency) -> bool {
        self.group_rule.literal_value() == Some(dependency.group_id.as_str())
            && self.artifact_rule.literal_value() == Some(dependency.artifact_id.as_str())
    }

    pub fn matches_and_preserves_group_artifact_and_type(&self, dependency: &Dependency) -> bool {
        if !self.matches(dependency) {
            return false;
        }
        let applied = self.apply(dependency);
        applied.group_id == dependency.group_id
            && applied.artifact_id == dependency.artifact_id
            && applied.artifact_type == dependency.artifact_type
    }

    /// The textual form plus the description as a trailing comment.
    pub fn to_line(&self) -> String {
        if self.description.is_empty() {
            self.to_string()
        } else {
            format!("{self} # {}", self.description)
        }
    }
}

impl PartialEq for DependencyRule {
    fn eq(&self, other: &Self) -> bool {
        self.group_rule == other.group_rule
            && self.artifact_rule == other.artifact_rule
            && self.type_rule == other.type_rule
            && self.version_rule == other.version_rule
    }
}

impl Eq for DependencyRule {}

impl Hash for DependencyRule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.group_rule.hash(state);
        self.artifact_rule.hash(state);
        self.type_rule.hash(state);
        self.version_rule.hash(state);
    }
}

impl fmt::Display for DependencyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.group_rule, self.artifact_rule, self.type_rule, self.version_rule
        )
    }
}

impl TryFrom<String> for DependencyRule {
    type Error = DebsolveError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<DependencyRule> for String {
    fn from(rule: DependencyRule) -> Self {
        rule.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_keeps_value_and_matches_missing() {
        let rule = Rule::parse("*").unwrap();
        assert!(rule.is_any());
        assert!(rule.matches(None));
        assert_eq!(rule.apply("1.2"), "1.2");
    }

    #[test]
    fn substitution_collapses_major_version() {
        let rule = Rule::new(r"s/1\..*/1.x/", "collapse").unwrap();
        assert!(rule.matches(Some("1.2.3")));
        assert!(!rule.matches(Some("11.2")));
        assert!(!rule.matches(None));
        assert_eq!(rule.apply("1.2.3"), "1.x");
        assert_eq!(rule.description(), "collapse");
    }

    #[test]
    fn substitution_keeps_group_references_apart_from_letters() {
        let rule = Rule::parse(r"s/(\d+)\..*/$1x/").unwrap();
        assert_eq!(rule.apply("3.1"), "3x");
    }

    #[test]
    fn literal_matches_exactly() {
        let rule = Rule::parse("jar").unwrap();
        assert!(rule.matches(Some("jar")));
        assert!(!rule.matches(Some("jars")));
        assert_eq!(rule.apply_opt(None), Some("jar".to_string()));
    }

    #[test]
    fn custom_sentinel_never_matches() {
        let rule = Rule::parse(CUSTOM_PATTERN).unwrap();
        assert!(rule.is_custom());
        assert!(!rule.matches(Some("1.0")));
        assert!(DependencyRule::parse("g a * CUSTOM").is_err());
    }

    #[test]
    fn malformed_substitution_is_rejected() {
        assert!(Rule::parse("s/(/x/").is_err());
        assert!(Rule::parse("s//x/").is_err());
        assert!(Rule::parse("s/a/b/c").is_err());
    }

    #[test]
    fn rules_compare_by_pattern() {
        let a = Rule::new("s/.*/debian/", "one").unwrap();
        let b = Rule::new("s/.*/debian/", "two").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parse_defaults_missing_fields_and_reads_description() {
        let rule = DependencyRule::parse("org.foo bar # drop it").unwrap();
        assert_eq!(rule.to_string(), "org.foo bar * *");
        assert_eq!(rule.description(), "drop it");
        assert_eq!(rule.to_line(), "org.foo bar * * # drop it");
        assert!(DependencyRule::parse("a b c d e").is_err());
        assert!(DependencyRule::parse("   ").is_err());
    }

    #[test]
    fn apply_rewrites_non_wildcard_fields() {
        let rule = DependencyRule::parse(r"org.foo * s/jar/bundle/ s/2\..*/2.x/").unwrap();
        let dep = Dependency::jar("org.foo", "bar", Some("2.4")).with_scope("test");
        assert!(rule.matches(&dep));

        let applied = rule.apply(&dep);
        assert_eq!(applied.group_id, "org.foo");
        assert_eq!(applied.artifact_id, "bar");
        assert!(applied.is_bundle());
        assert_eq!(applied.version(), Some("2.x"));
        assert!(applied.is_test_scoped());
    }

    #[test]
    fn rewriting_round_trips_on_literal_fields() {
        let rule = DependencyRule::new("g", "a", "bundle", "*").unwrap();
        let dep = Dependency::new("g", "a", "bundle", Some("1.0"));
        let applied = rule.apply(&dep);
        assert!(rule.group_rule().matches(Some(&applied.group_id)));
        assert!(rule.artifact_rule().matches(Some(&applied.artifact_id)));
        assert!(rule.type_rule().matches(Some(&applied.artifact_type)));
    }

    #[test]
    fn explicit_mentions_need_literal_group_and_artifact() {
        let dep = Dependency::jar("g", "a", Some("1"));
        assert!(DependencyRule::parse("g a * *").unwrap().explicitly_mentions(&dep));
        assert!(!DependencyRule::parse("g * * *").unwrap().explicitly_mentions(&dep));
    }

    #[test]
    fn jar_to_bundle_rule_does_not_preserve_type() {
        let dep = Dependency::jar("g", "d", Some("1.0"));
        let rule = DependencyRule::parse("g d s/jar/bundle/ *").unwrap();
        assert!(rule.matches(&dep));
        assert!(!rule.matches_and_preserves_group_artifact_and_type(&dep));
        let bundle = dep.clone().with_type("bundle");
        assert!(!rule.matches(&bundle));
        assert!(DependencyRule::parse("g d * *")
            .unwrap()
            .matches_and_preserves_group_artifact_and_type(&bundle));
    }

    #[test]
    fn serializes_as_text() {
        let rule: DependencyRule = serde_json::from_str(r#""g d s/jar/bundle/ *""#).unwrap();
        assert_eq!(serde_json::to_string(&rule).unwrap(), r#""g d s/jar/bundle/ *""#);
    }
}

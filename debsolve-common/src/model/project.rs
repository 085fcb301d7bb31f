// debsolve-common/src/model/project.rs
use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::dependency::{Dependency, TEST_JAR};
use super::rule::DependencyRule;

/// Name of the Debian package owning an artifact.
pub const PACKAGE_PROPERTY: &str = "debian.package";
/// Present when the artifact's version is the version of its Debian package.
pub const HAS_PACKAGE_VERSION_PROPERTY: &str = "debian.hasPackageVersion";

/// The lists a descriptor declares dependencies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyType {
    Dependencies,
    DependencyManagement,
    Plugins,
    PluginDependencies,
    PluginManagement,
    ReportingPlugins,
    Extensions,
}

impl DependencyType {
    pub const ALL: [DependencyType; 7] = [
        DependencyType::Dependencies,
        DependencyType::DependencyManagement,
        DependencyType::Plugins,
        DependencyType::PluginDependencies,
        DependencyType::PluginManagement,
        DependencyType::ReportingPlugins,
        DependencyType::Extensions,
    ];

    /// Management lists only pin versions for transitive use.
    pub fn is_management(self) -> bool {
        matches!(
            self,
            DependencyType::DependencyManagement | DependencyType::PluginManagement
        )
    }

    /// Everything but the plain dependency lists is only needed to build.
    pub fn is_build_time(self) -> bool {
        !matches!(
            self,
            DependencyType::Dependencies | DependencyType::DependencyManagement
        )
    }
}

/// What a descriptor says about one artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub this_pom: Dependency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Dependency>,
    /// Set once the parent reference has been resolved.
    #[serde(skip)]
    pub parent_pom: Option<Arc<ProjectInfo>>,
    #[serde(default)]
    pub dependencies: BTreeMap<DependencyType, Vec<Dependency>>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default)]
    pub published_rules: Vec<DependencyRule>,
    #[serde(default)]
    pub modules: Vec<String>,
    /// Upstream version before any rule rewrote `this_pom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_version: Option<String>,
}

impl ProjectInfo {
    pub fn new(this_pom: Dependency) -> Self {
        Self {
            this_pom,
            parent: None,
            parent_pom: None,
            dependencies: BTreeMap::new(),
            properties: BTreeMap::new(),
            published_rules: Vec::new(),
            modules: Vec::new(),
            original_version: None,
        }
    }

    pub fn with_parent(mut self, parent: Dependency) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_dependency(mut self, kind: DependencyType, dependency: Dependency) -> Self {
        self.dependencies.entry(kind).or_default().push(dependency);
        self
    }

    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        self.properties.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_published_rule(mut self, rule: DependencyRule) -> Self {
        self.published_rules.push(rule);
        self
    }

    pub fn with_module(mut self, module: &str) -> Self {
        self.modules.push(module.to_string());
        self
    }

    pub fn dependencies_of(&self, kind: DependencyType) -> &[Dependency] {
        self.dependencies
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn original_version(&self) -> Option<&str> {
        self.original_version
            .as_deref()
            .or_else(|| self.this_pom.version())
    }

    pub fn package_name(&self) -> Option<&str> {
        self.properties
            .get(PACKAGE_PROPERTY)
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }

    pub fn has_package_version(&self) -> bool {
        self.properties.contains_key(HAS_PACKAGE_VERSION_PROPERTY)
    }

    /// Version pinned for `dependency` by this descriptor's own management
    /// lists. Ancestors are followed by the repository index.
    pub fn managed_version(&self, dependency: &Dependency) -> Option<String> {
        let lists: &[DependencyType] = if dependency.is_plugin() {
            &[DependencyType::PluginManagement, DependencyType::Plugins]
        } else {
            &[DependencyType::DependencyManagement]
        };
        lists
            .iter()
            .flat_map(|kind| self.dependencies_of(*kind))
            .find(|managed| managed.equals_ignore_version(dependency) && managed.version.is_some())
            .and_then(|managed| managed.version.clone())
    }

    /// The descriptor as it reads once the first matching rule rewrote its
    /// coordinate and its parent reference.
    pub fn new_from_rules(&self, rules: &[DependencyRule]) -> ProjectInfo {
        let rewrite = |dependency: &Dependency| {
            rules
                .iter()
                .find(|rule| rule.matches(dependency))
                .map(|rule| rule.apply(dependency))
                .unwrap_or_else(|| dependency.clone())
        };
        let mut transformed = self.clone();
        transformed.original_version = self.original_version().map(str::to_string);
        transformed.this_pom = rewrite(&self.this_pom);
        transformed.parent = self.parent.as_ref().map(rewrite);
        transformed
    }

    /// Companion entry for the test jar built alongside a library.
    pub fn as_test_jar(&self) -> ProjectInfo {
        let mut test_pom = self.clone();
        test_pom.this_pom.artifact_type = TEST_JAR.to_string();
        test_pom
    }
}

// debsolve-common/src/model/dependency.rs
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

pub const JAR: &str = "jar";
pub const BUNDLE: &str = "bundle";
pub const TEST_JAR: &str = "test-jar";
pub const POM: &str = "pom";
pub const MAVEN_PLUGIN: &str = "maven-plugin";

/// Group and artifact of the implicit root descriptor every project inherits from.
pub const SUPER_POM_ID: &str = "__super__";

fn default_type() -> String {
    JAR.to_string()
}

/// An artifact coordinate together with the way it is used (scope, optional).
///
/// Equality and hashing cover the coordinate only: group, artifact, version,
/// type and classifier. Scope and the optional flag describe the edge, not the
/// artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "type", default = "default_type")]
    pub artifact_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

/// The version-agnostic part of a coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactKey {
    pub group_id: String,
    pub artifact_id: String,
    pub artifact_type: String,
    pub classifier: Option<String>,
}

impl Dependency {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        artifact_type: impl Into<String>,
        version: Option<&str>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.map(str::to_string),
            artifact_type: artifact_type.into(),
            classifier: None,
            scope: None,
            optional: false,
        }
    }

    pub fn jar(group_id: &str, artifact_id: &str, version: Option<&str>) -> Self {
        Self::new(group_id, artifact_id, JAR, version)
    }

    pub fn plugin(group_id: &str, artifact_id: &str, version: Option<&str>) -> Self {
        Self::new(group_id, artifact_id, MAVEN_PLUGIN, version)
    }

    pub fn super_pom() -> Self {
        Self::new(SUPER_POM_ID, SUPER_POM_ID, POM, None)
    }

    pub fn with_version(mut self, version: Option<&str>) -> Self {
        self.version = version.map(str::to_string);
        self
    }

    pub fn with_type(mut self, artifact_type: &str) -> Self {
        self.artifact_type = artifact_type.to_string();
        self
    }

    pub fn with_classifier(mut self, classifier: Option<&str>) -> Self {
        self.classifier = classifier.map(str::to_string);
        self
    }

    pub fn with_scope(mut self, scope: &str) -> Self {
        self.scope = Some(scope.to_string());
        self
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Versions may only be discovered after the coordinate was read.
    pub fn set_version(&mut self, version: Option<String>) {
        self.version = version;
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn key(&self) -> ArtifactKey {
        ArtifactKey {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            artifact_type: self.artifact_type.clone(),
            classifier: self.classifier.clone(),
        }
    }

    pub fn equals_ignore_version(&self, other: &Dependency) -> bool {
        self.group_id == other.group_id
            && self.artifact_id == other.artifact_id
            && self.artifact_type == other.artifact_type
            && self.classifier == other.classifier
    }

    pub fn is_jar(&self) -> bool {
        self.artifact_type == JAR
    }

    pub fn is_bundle(&self) -> bool {
        self.artifact_type == BUNDLE
    }

    pub fn is_plugin(&self) -> bool {
        self.artifact_type == MAVEN_PLUGIN
    }

    pub fn is_super_pom(&self) -> bool {
        self.group_id == SUPER_POM_ID && self.artifact_id == SUPER_POM_ID
    }

    pub fn is_test_scoped(&self) -> bool {
        self.scope() == Some("test")
    }

    pub fn is_provided(&self) -> bool {
        self.scope() == Some("provided")
    }

    /// `group:artifact`, used in operator messages.
    pub fn short_name(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

impl PartialEq for Dependency {
    fn eq(&self, other: &Self) -> bool {
        self.equals_ignore_version(other) && self.version == other.version
    }
}

impl Eq for Dependency {}

impl Hash for Dependency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.group_id.hash(state);
        self.artifact_id.hash(state);
        self.version.hash(state);
        self.artifact_type.hash(state);
        self.classifier.hash(state);
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.group_id,
            self.artifact_id,
            self.artifact_type,
            self.version().unwrap_or("?")
        )?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{classifier}")?;
        }
        Ok(())
    }
}

// debsolve-common/src/config.rs
use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{DebsolveError, Result};

// Fallbacks used when the environment does not say otherwise.
const DEFAULT_MAVEN_REPO: &str = "/usr/share/maven-repo";
const DEFAULT_DEBIAN_DIR: &str = "debian";

#[derive(Debug, Clone)]
pub struct Config {
    pub maven_repo: PathBuf,
    pub base_dir: PathBuf,
    pub debian_dir_name: String,
    pub package_name: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        debug!("Loading debsolve configuration");

        let maven_repo = env::var("DEBSOLVE_MAVEN_REPO")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                debug!(
                    "DEBSOLVE_MAVEN_REPO not set or empty, falling back to default: {}",
                    DEFAULT_MAVEN_REPO
                );
                DEFAULT_MAVEN_REPO.to_string()
            });

        let debian_dir_name = env::var("DEBSOLVE_DEBIAN_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_DEBIAN_DIR.to_string());
        if debian_dir_name.contains('/') {
            return Err(DebsolveError::Config(format!(
                "DEBSOLVE_DEBIAN_DIR must be a plain directory name, got '{debian_dir_name}'"
            )));
        }

        let base_dir = env::current_dir()?;
        debug!(
            "Configuration loaded: maven_repo={}, base_dir={}",
            maven_repo,
            base_dir.display()
        );

        Ok(Self {
            maven_repo: PathBuf::from(maven_repo),
            base_dir,
            debian_dir_name,
            package_name: String::new(),
        })
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn with_maven_repo(mut self, maven_repo: impl Into<PathBuf>) -> Self {
        self.maven_repo = maven_repo.into();
        self
    }

    pub fn with_package_name(mut self, package_name: impl Into<String>) -> Self {
        self.package_name = package_name.into();
        self
    }

    pub fn maven_repo(&self) -> &Path {
        &self.maven_repo
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory receiving the rules, the list of descriptors and the substvars.
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join(&self.debian_dir_name)
    }

    pub fn pom_list_path(&self) -> PathBuf {
        self.output_dir().join(format!("{}.poms", self.package_name))
    }

    pub fn substvars_path(&self) -> PathBuf {
        self.output_dir()
            .join(format!("{}.substvars", self.package_name))
    }

    /// Location of the descriptor installed for a coordinate in the repository.
    pub fn repository_descriptor_path(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: &str,
        extension: &str,
    ) -> PathBuf {
        self.maven_repo
            .join(group_id.replace('.', "/"))
            .join(artifact_id)
            .join(version)
            .join(format!("{artifact_id}-{version}.{extension}"))
    }

    /// Path relative to the base directory, for messages.
    pub fn relative_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.base_dir)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

pub fn load_config() -> Result<Config> {
    Config::load()
}

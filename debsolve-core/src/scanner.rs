// debsolve-core/src/scanner.rs
//! Queries against the system package database: which package ships a file,
//! which version of a package is installed, which package documents another.
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use debsolve_common::model::{DebianDependency, Dependency};
use tracing::debug;

use crate::process::query;

pub trait PackageScanner {
    /// Package shipping the given file.
    fn find_package_providing_file(&mut self, path: &Path) -> Option<DebianDependency>;

    /// Package shipping some descriptor for the dependency's group and artifact.
    fn find_package_with_descriptor(&mut self, dependency: &Dependency) -> Option<DebianDependency>;

    /// Package shipping a jar named after the dependency's artifact.
    fn find_package_with_jar(&mut self, dependency: &Dependency) -> Option<DebianDependency>;

    /// Installed version; with `installed_only` unset, the candidate version
    /// of an available package is also accepted.
    fn installed_version(&mut self, package: &DebianDependency, installed_only: bool)
        -> Option<String>;

    /// Documentation packages for the given library packages.
    fn doc_dependencies(
        &mut self,
        packages: &[DebianDependency],
        origins: &HashMap<DebianDependency, Dependency>,
    ) -> Vec<DebianDependency>;

    /// A scanner of the same kind with every cache dropped.
    fn fresh(&self) -> Box<dyn PackageScanner>;
}

/// Scanner backed by `dpkg`, `apt-cache` and, when online, `apt-file`.
#[derive(Debug, Clone)]
pub struct DpkgScanner {
    offline: bool,
    maven_repo: PathBuf,
    file_owners: HashMap<String, Option<String>>,
    versions: HashMap<(String, bool), Option<String>>,
}

impl DpkgScanner {
    pub fn new(offline: bool, maven_repo: impl Into<PathBuf>) -> Self {
        Self {
            offline,
            maven_repo: maven_repo.into(),
            file_owners: HashMap::new(),
            versions: HashMap::new(),
        }
    }

    fn search(&mut self, pattern: &str) -> Option<String> {
        if let Some(cached) = self.file_owners.get(pattern) {
            return cached.clone();
        }
        let mut owner = query("dpkg", &["--search", pattern])
            .and_then(|out| parse_owner(&out));
        if owner.is_none() && !self.offline {
            owner = query("apt-file", &["search", pattern]).and_then(|out| parse_owner(&out));
        }
        debug!("Package owning {}: {:?}", pattern, owner);
        self.file_owners.insert(pattern.to_string(), owner.clone());
        owner
    }

    fn artifact_dir(&self, dependency: &Dependency) -> PathBuf {
        self.maven_repo
            .join(dependency.group_id.replace('.', "/"))
            .join(&dependency.artifact_id)
    }
}

impl PackageScanner for DpkgScanner {
    fn find_package_providing_file(&mut self, path: &Path) -> Option<DebianDependency> {
        self.search(&path.to_string_lossy()).map(DebianDependency::new)
    }

    fn find_package_with_descriptor(&mut self, dependency: &Dependency) -> Option<DebianDependency> {
        let dir = self.artifact_dir(dependency);
        self.search(&format!("{}/", dir.display()))
            .map(DebianDependency::new)
    }

    fn find_package_with_jar(&mut self, dependency: &Dependency) -> Option<DebianDependency> {
        self.search(&format!("/{}.jar", dependency.artifact_id))
            .or_else(|| self.search(&format!("/{}-*.jar", dependency.artifact_id)))
            .map(DebianDependency::new)
    }

    fn installed_version(
        &mut self,
        package: &DebianDependency,
        installed_only: bool,
    ) -> Option<String> {
        let key = (package.package.clone(), installed_only);
        if let Some(cached) = self.versions.get(&key) {
            return cached.clone();
        }
        let mut version = query("dpkg", &["--status", &package.package])
            .and_then(|out| parse_installed_version(&out));
        if version.is_none() && !installed_only {
            version = query("apt-cache", &["show", &package.package])
                .and_then(|out| parse_field(&out, "Version"));
        }
        self.versions.insert(key, version.clone());
        version
    }

    fn doc_dependencies(
        &mut self,
        packages: &[DebianDependency],
        origins: &HashMap<DebianDependency, Dependency>,
    ) -> Vec<DebianDependency> {
        let mut docs = Vec::new();
        for package in packages {
            for candidate in doc_package_candidates(&package.package) {
                let doc = DebianDependency::new(candidate);
                if self.installed_version(&doc, false).is_some() {
                    if let Some(dependency) = origins.get(package) {
                        debug!("Documentation for {} is in {}", dependency, doc);
                    }
                    docs.push(doc);
                    break;
                }
            }
        }
        docs
    }

    fn fresh(&self) -> Box<dyn PackageScanner> {
        Box::new(DpkgScanner::new(self.offline, self.maven_repo.clone()))
    }
}

/// `libfoo-java` is documented by `libfoo-java-doc`, some packages drop the
/// `-java` suffix for their documentation.
fn doc_package_candidates(package: &str) -> Vec<String> {
    let mut candidates = vec![format!("{package}-doc")];
    if let Some(stem) = package.strip_suffix("-java") {
        candidates.push(format!("{stem}-doc"));
    }
    candidates
}

/// First package of `pkg[, pkg...]: path` output lines.
fn parse_owner(output: &str) -> Option<String> {
    output
        .lines()
        .filter(|line| !line.starts_with("diversion by"))
        .find_map(|line| {
            let (packages, _) = line.split_once(": ")?;
            let first = packages.split(',').next()?.trim();
            // `pkg:amd64` is reported for multi-arch packages
            let name = first.split(':').next()?.trim();
            (!name.is_empty()).then(|| name.to_string())
        })
}

fn parse_field(output: &str, field: &str) -> Option<String> {
    let prefix = format!("{field}:");
    output
        .lines()
        .find_map(|line| line.strip_prefix(&prefix))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_installed_version(status: &str) -> Option<String> {
    let installed = parse_field(status, "Status").is_some_and(|s| s.ends_with(" installed"));
    if installed {
        parse_field(status, "Version")
    } else {
        None
    }
}

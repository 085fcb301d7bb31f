// debsolve-core/src/repository.rs
//! Index of the descriptors installed in the local repository, plus the
//! descriptors of the project being packaged once they are registered.
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use debsolve_common::error::Result;
use debsolve_common::model::{ArtifactKey, Dependency, DependencyType, ProjectInfo};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::descriptor::DescriptorReader;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Origin {
    Installed,
    Project(PathBuf),
}

#[derive(Debug, Clone)]
struct IndexEntry {
    pom: Arc<ProjectInfo>,
    origin: Origin,
}

#[derive(Debug)]
pub struct RepositoryIndex {
    root: PathBuf,
    entries: HashMap<ArtifactKey, Vec<IndexEntry>>,
    super_pom: Option<Arc<ProjectInfo>>,
    scanned: bool,
}

impl RepositoryIndex {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: HashMap::new(),
            super_pom: None,
            scanned: false,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_scanned(&self) -> bool {
        self.scanned
    }

    /// Reads every installed descriptor under the root. Entries registered
    /// from the project survive a rescan; unreadable descriptors are skipped.
    pub fn scan(&mut self, reader: &dyn DescriptorReader) -> Result<usize> {
        for list in self.entries.values_mut() {
            list.retain(|entry| entry.origin != Origin::Installed);
        }
        self.entries.retain(|_, list| !list.is_empty());
        self.super_pom = None;

        let mut count = 0;
        if self.root.is_dir() {
            let walker = WalkDir::new(&self.root)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file());
            for entry in walker {
                let path = entry.path();
                if !reader.is_repository_descriptor(path) {
                    continue;
                }
                match reader.read(path) {
                    Ok(pom) => {
                        self.insert(pom, Origin::Installed);
                        count += 1;
                    }
                    Err(e) => warn!("Skipping unreadable descriptor: {}", e),
                }
            }
        } else {
            warn!("Repository {} does not exist", self.root.display());
        }

        debug!("Indexed {} descriptors under {}", count, self.root.display());
        self.scanned = true;
        Ok(count)
    }

    /// Makes a project descriptor visible to lookups.
    pub fn register_pom(&mut self, path: &Path, pom: ProjectInfo) -> Arc<ProjectInfo> {
        debug!("Registering {} from {}", pom.this_pom, path.display());
        self.insert(pom, Origin::Project(path.to_path_buf()))
    }

    fn insert(&mut self, pom: ProjectInfo, origin: Origin) -> Arc<ProjectInfo> {
        let pom = Arc::new(pom);
        if pom.this_pom.is_super_pom() {
            self.super_pom = Some(Arc::clone(&pom));
        }
        let list = self.entries.entry(pom.this_pom.key()).or_default();
        list.retain(|entry| entry.pom.this_pom != pom.this_pom);
        list.push(IndexEntry {
            pom: Arc::clone(&pom),
            origin,
        });
        pom
    }

    /// Exact coordinate lookup; a coordinate without a version never matches.
    pub fn search_matching_pom(&self, dependency: &Dependency) -> Option<Arc<ProjectInfo>> {
        dependency.version()?;
        self.entries
            .get(&dependency.key())?
            .iter()
            .find(|entry| entry.pom.this_pom == *dependency)
            .map(|entry| Arc::clone(&entry.pom))
    }

    /// Every entry with the same group, artifact, type and classifier.
    pub fn search_matching_poms_ignore_version(
        &self,
        dependency: &Dependency,
    ) -> Vec<Arc<ProjectInfo>> {
        self.entries
            .get(&dependency.key())
            .map(|list| list.iter().map(|entry| Arc::clone(&entry.pom)).collect())
            .unwrap_or_default()
    }

    /// Where a registered project descriptor was read from.
    pub fn project_path(&self, dependency: &Dependency) -> Option<&Path> {
        self.entries
            .get(&dependency.key())?
            .iter()
            .find_map(|entry| match &entry.origin {
                Origin::Project(path) => Some(path.as_path()),
                Origin::Installed => None,
            })
    }

    /// Version pinned for `dependency` by `pom` or the first ancestor that
    /// pins it. Ancestors come from the linked parent descriptor when there
    /// is one, otherwise from the index, so installed chains are followed to
    /// their root.
    pub fn version_from_management(
        &self,
        pom: &ProjectInfo,
        dependency: &Dependency,
    ) -> Option<String> {
        if let Some(version) = pom.managed_version(dependency) {
            return Some(version);
        }
        let mut visited = HashSet::from([pom.this_pom.clone()]);
        let mut next = self.parent_of(pom);
        while let Some(current) = next {
            if !visited.insert(current.this_pom.clone()) {
                warn!("Parent chain of {} loops at {}", pom.this_pom, current.this_pom);
                return None;
            }
            if let Some(version) = current.managed_version(dependency) {
                return Some(version);
            }
            next = self.parent_of(&current);
        }
        None
    }

    fn parent_of(&self, pom: &ProjectInfo) -> Option<Arc<ProjectInfo>> {
        pom.parent_pom.clone().or_else(|| {
            pom.parent
                .as_ref()
                .filter(|parent| !parent.is_super_pom())
                .and_then(|parent| self.search_matching_pom(parent))
        })
    }

    pub fn super_pom(&self) -> Option<&ProjectInfo> {
        self.super_pom.as_deref()
    }

    /// Plugins the implicit root descriptor configures for every build.
    pub fn is_default_plugin(&self, dependency: &Dependency) -> bool {
        self.super_pom.as_ref().is_some_and(|super_pom| {
            super_pom
                .dependencies_of(DependencyType::PluginManagement)
                .iter()
                .any(|plugin| plugin.equals_ignore_version(dependency))
        })
    }
}

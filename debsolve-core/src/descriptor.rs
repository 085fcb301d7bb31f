// debsolve-core/src/descriptor.rs
//! Reading project descriptors, and the per-run cache of what was read.
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use debsolve_common::error::{DebsolveError, Result};
use debsolve_common::model::ProjectInfo;
use debsolve_common::poms::PomOptions;
use tracing::debug;

/// Turns a descriptor file into a [`ProjectInfo`].
pub trait DescriptorReader {
    fn read(&self, path: &Path) -> Result<ProjectInfo>;

    /// File name of a project descriptor inside a module directory.
    fn project_file_name(&self) -> &str;

    /// Extension of descriptors installed in the repository.
    fn repository_extension(&self) -> &str;

    fn is_repository_descriptor(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.ends_with(&format!(".{}", self.repository_extension())))
    }
}

/// Reads descriptors stored as JSON `ProjectInfo` records.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDescriptorReader;

impl DescriptorReader for JsonDescriptorReader {
    fn read(&self, path: &Path) -> Result<ProjectInfo> {
        let raw = fs::read_to_string(path)
            .map_err(|e| DebsolveError::Descriptor(path.to_path_buf(), e.to_string()))?;
        serde_json::from_str(&raw)
            .map_err(|e| DebsolveError::Descriptor(path.to_path_buf(), e.to_string()))
    }

    fn project_file_name(&self) -> &str {
        "pom.json"
    }

    fn repository_extension(&self) -> &str {
        "pom.json"
    }
}

/// Descriptors read during one run, keyed by canonical path.
#[derive(Debug, Default)]
pub struct DescriptorCache {
    entries: HashMap<PathBuf, ProjectInfo>,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
    }

    /// Returns the cached descriptor, reading it on first use. A descriptor
    /// marked `--no-parent` is read without its parent reference.
    pub fn load(
        &mut self,
        path: &Path,
        reader: &dyn DescriptorReader,
        options: &PomOptions,
    ) -> Result<&mut ProjectInfo> {
        match self.entries.entry(Self::key(path)) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                debug!("Reading descriptor {}", path.display());
                let mut info = reader.read(path)?;
                if options.no_parent {
                    info.parent = None;
                }
                Ok(entry.insert(info))
            }
        }
    }

    pub fn get(&self, path: &Path) -> Option<&ProjectInfo> {
        self.entries.get(&Self::key(path))
    }

    pub fn get_mut(&mut self, path: &Path) -> Option<&mut ProjectInfo> {
        self.entries.get_mut(&Self::key(path))
    }

    /// Forgets a descriptor so that the next `load` reads it again with
    /// the options in effect at that time.
    pub fn invalidate(&mut self, path: &Path) {
        debug!("Invalidating cached descriptor {}", path.display());
        self.entries.remove(&Self::key(path));
    }
}

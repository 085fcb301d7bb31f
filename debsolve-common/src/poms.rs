// debsolve-common/src/poms.rs
//! The `<package>.poms` list: which descriptors belong to the package, and
//! how each of them is treated.
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomOptions {
    pub ignore: bool,
    pub no_parent: bool,
    pub has_package_version: bool,
}

impl PomOptions {
    fn parse<'a>(flags: impl Iterator<Item = &'a str>) -> Self {
        let mut options = Self::default();
        for flag in flags {
            match flag {
                "--ignore" => options.ignore = true,
                "--no-parent" => options.no_parent = true,
                "--has-package-version" => options.has_package_version = true,
                other => debug!("Ignoring unsupported descriptor option {}", other),
            }
        }
        options
    }

    fn to_flags(&self) -> String {
        let mut flags = String::new();
        if self.ignore {
            flags.push_str(" --ignore");
        }
        if self.no_parent {
            flags.push_str(" --no-parent");
        }
        if self.has_package_version {
            flags.push_str(" --has-package-version");
        }
        flags
    }
}

#[derive(Debug, Clone)]
pub struct PomList {
    path: PathBuf,
    base_dir: PathBuf,
    entries: Vec<(String, PomOptions)>,
}

impl PomList {
    pub fn new(path: impl Into<PathBuf>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            base_dir: base_dir.into(),
            entries: Vec::new(),
        }
    }

    /// Reads the list if it exists; a missing file is an empty list.
    pub fn load(path: impl Into<PathBuf>, base_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut list = Self::new(path, base_dir);
        if !list.path.exists() {
            debug!("No list of descriptors at {}", list.path.display());
            return Ok(list);
        }
        let content = fs::read_to_string(&list.path)?;
        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let mut fields = trimmed.split_whitespace();
            match fields.next() {
                Some(pom) if !pom.starts_with("--") => {
                    let options = PomOptions::parse(fields);
                    list.entries.push((pom.to_string(), options));
                }
                _ => warn!("Skipping malformed line in {}: {}", list.path.display(), line),
            }
        }
        Ok(list)
    }

    pub fn save(&self) -> Result<()> {
        let mut out = String::new();
        for (pom, options) in &self.entries {
            out.push_str(pom);
            out.push_str(&options.to_flags());
            out.push('\n');
        }
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        debug!("Writing list of descriptors to {}", self.path.display());
        fs::write(&self.path, out)?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn key(&self, pom: &Path) -> String {
        pom.strip_prefix(&self.base_dir)
            .unwrap_or(pom)
            .to_string_lossy()
            .into_owned()
    }

    pub fn contains(&self, pom: &Path) -> bool {
        let key = self.key(pom);
        self.entries.iter().any(|(p, _)| *p == key)
    }

    pub fn add_pom(&mut self, pom: &Path) {
        if !self.contains(pom) {
            let key = self.key(pom);
            self.entries.push((key, PomOptions::default()));
        }
    }

    pub fn first_pom(&self) -> Option<PathBuf> {
        self.entries.first().map(|(p, _)| self.base_dir.join(p))
    }

    /// Descriptors in list order, as absolute paths.
    pub fn poms(&self) -> Vec<PathBuf> {
        self.entries
            .iter()
            .map(|(p, _)| self.base_dir.join(p))
            .collect()
    }

    pub fn options(&self, pom: &Path) -> PomOptions {
        let key = self.key(pom);
        self.entries
            .iter()
            .find(|(p, _)| *p == key)
            .map(|(_, o)| o.clone())
            .unwrap_or_default()
    }

    /// Options for a descriptor, adding it to the list when unknown.
    pub fn options_mut(&mut self, pom: &Path) -> &mut PomOptions {
        let key = self.key(pom);
        let index = match self.entries.iter().position(|(p, _)| *p == key) {
            Some(index) => index,
            None => {
                self.entries.push((key, PomOptions::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }
}

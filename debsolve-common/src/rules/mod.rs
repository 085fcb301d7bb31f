// debsolve-common/src/rules/mod.rs
//! The four rule categories and their files in the packaging directory.
use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::error::Result;

pub mod set;

pub use set::RuleSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleKind {
    /// Rewrites a dependency to the coordinate its packaged artifact has.
    Resolution,
    /// Drops a dependency from the build entirely.
    Ignore,
    /// Rules a package publishes so that dependers inherit them.
    Published,
    /// Excluded only while cleaning, e.g. plugins built by the project itself.
    Clean,
}

impl RuleKind {
    pub const ALL: [RuleKind; 4] = [
        RuleKind::Resolution,
        RuleKind::Ignore,
        RuleKind::Published,
        RuleKind::Clean,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            RuleKind::Resolution => "maven.rules",
            RuleKind::Ignore => "maven.ignoreRules",
            RuleKind::Published => "maven.publishedRules",
            RuleKind::Clean => "maven.cleanIgnoreRules",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RuleKind::Resolution => {
                "Maven rules which transform Maven POM files and make them usable\n\
                 offline using the Debian Maven repository.\n\
                 Format: groupId artifactId type version [# description]\n\
                 where each element is '*', a literal or a s/regex/replacement/ pattern."
            }
            RuleKind::Ignore => {
                "Maven ignore rules - ignore some Maven dependencies and plugins\n\
                 Format: groupId artifactId type version [# description]"
            }
            RuleKind::Published => {
                "Maven published rules - additional rules to publish, to help\n\
                 the packaging work of Debian maintainers using this library.\n\
                 Format: groupId artifactId type version [# description]"
            }
            RuleKind::Clean => {
                "Maven clean ignore rules - ignore some Maven dependencies and\n\
                 plugins during the clean phase of a Maven build.\n\
                 Format: groupId artifactId type version [# description]"
            }
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleKind::Resolution => "resolution",
            RuleKind::Ignore => "ignore",
            RuleKind::Published => "published",
            RuleKind::Clean => "clean",
        };
        f.write_str(name)
    }
}

/// One [`RuleSet`] per category.
#[derive(Debug, Clone)]
pub struct RuleSetFiles {
    resolution: RuleSet,
    ignore: RuleSet,
    published: RuleSet,
    clean: RuleSet,
}

impl Default for RuleSetFiles {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSetFiles {
    pub fn new() -> Self {
        let empty = |kind: RuleKind| RuleSet::new(&kind.to_string(), kind.description());
        Self {
            resolution: empty(RuleKind::Resolution),
            ignore: empty(RuleKind::Ignore),
            published: empty(RuleKind::Published),
            clean: empty(RuleKind::Clean),
        }
    }

    pub fn load(dir: &Path) -> Result<Self> {
        debug!("Loading rule files from {}", dir.display());
        let read = |kind: RuleKind| {
            RuleSet::read(
                &dir.join(kind.file_name()),
                &kind.to_string(),
                kind.description(),
            )
        };
        Ok(Self {
            resolution: read(RuleKind::Resolution)?,
            ignore: read(RuleKind::Ignore)?,
            published: read(RuleKind::Published)?,
            clean: read(RuleKind::Clean)?,
        })
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        for kind in RuleKind::ALL {
            let path = dir.join(kind.file_name());
            debug!("Writing {} rules to {}", kind, path.display());
            self.get(kind).write(&path)?;
        }
        Ok(())
    }

    pub fn get(&self, kind: RuleKind) -> &RuleSet {
        match kind {
            RuleKind::Resolution => &self.resolution,
            RuleKind::Ignore => &self.ignore,
            RuleKind::Published => &self.published,
            RuleKind::Clean => &self.clean,
        }
    }

    pub fn get_mut(&mut self, kind: RuleKind) -> &mut RuleSet {
        match kind {
            RuleKind::Resolution => &mut self.resolution,
            RuleKind::Ignore => &mut self.ignore,
            RuleKind::Published => &mut self.published,
            RuleKind::Clean => &mut self.clean,
        }
    }
}

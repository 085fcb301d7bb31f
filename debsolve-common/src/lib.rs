// debsolve-common/src/lib.rs
pub mod config;
pub mod error;
pub mod model;
pub mod poms;
pub mod rules;
pub mod substvars;

// Re-export key types
pub use config::Config;
pub use error::{DebsolveError, Result};
pub use model::{DebianDependency, Dependency, DependencyRule, ProjectInfo, Rule};
pub use poms::{PomList, PomOptions};
pub use rules::{RuleKind, RuleSet, RuleSetFiles};

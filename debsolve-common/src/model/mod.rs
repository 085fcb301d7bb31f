// debsolve-common/src/model/mod.rs
pub mod debian;
pub mod dependency;
pub mod project;
pub mod rule;

// Re-export
pub use debian::{DebianDependencies, DebianDependency, DependencyBucket};
pub use dependency::{ArtifactKey, Dependency};
pub use project::{DependencyType, ProjectInfo};
pub use rule::{DependencyRule, Rule};

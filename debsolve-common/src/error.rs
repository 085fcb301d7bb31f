use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DebsolveError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Cannot read descriptor {0}: {1}")]
    Descriptor(PathBuf, String),

    #[error("Invalid rule '{0}': {1}")]
    InvalidRule(String, String),

    /// No package in the repository satisfies the dependency and nothing
    /// (rule, operator, rescan) could produce one.
    #[error("Dependency not found: {dependency} (required by {pom})")]
    DependencyNotFound { dependency: String, pom: String },

    #[error("Prompt Error: {0}")]
    Prompt(String),

    #[error("Failed to execute command: {0}")]
    CommandExecError(String),

    #[error("Generic Error: {0}")]
    Generic(String),
}

impl From<std::io::Error> for DebsolveError {
    fn from(err: std::io::Error) -> Self {
        DebsolveError::Io(Arc::new(err))
    }
}

impl From<serde_json::Error> for DebsolveError {
    fn from(err: serde_json::Error) -> Self {
        DebsolveError::Json(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, DebsolveError>;

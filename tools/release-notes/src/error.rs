//! Release notes errors

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReleaseError {
    /// A git invocation exited unsuccessfully
    #[error("git {command} failed: {stderr}")]
    Git { command: String, stderr: String },

    /// git could not be started at all
    #[error("failed to run git: {0}")]
    Spawn(#[source] std::io::Error),

    /// The pushed tag is not a version tag
    #[error("'{0}' is not a version tag (expected vX.Y.Z)")]
    InvalidTag(String),

    #[error("failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

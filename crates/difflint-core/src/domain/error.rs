//! Error taxonomy for difflint.

use std::path::PathBuf;

/// difflint errors.
///
/// Only `Environment` and `InvalidDepth` abort a run. `FileSystem` and
/// `LintExecution` are recovered per project by the caller.
#[derive(Debug, thiserror::Error)]
pub enum DiffLintError {
    #[error("environment error: {0}")]
    Environment(String),

    #[error("invalid diff depth {0}: must be a positive integer")]
    InvalidDepth(String),

    #[error("filesystem error at {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("lint execution failed for {alias}: {message}")]
    LintExecution { alias: String, message: String },

    #[error("task join error: {0}")]
    Join(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DiffLintError {
    /// Whether this error must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DiffLintError::Environment(_) | DiffLintError::InvalidDepth(_)
        )
    }
}

/// Result type for difflint operations.
pub type Result<T> = std::result::Result<T, DiffLintError>;

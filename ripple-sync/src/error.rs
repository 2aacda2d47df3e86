//! Error types for ripple-sync.

use std::path::PathBuf;

use thiserror::Error;

use ripple_core::error::ConfigError;
use ripple_core::types::ProjectName;
use ripple_git::GitError;

/// All errors that can arise from a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the config loader.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// A git read (status, branch) failed.
    #[error("git error: {0}")]
    Git(#[from] GitError),

    /// A pull failed for the named repo.
    #[error("pull failed for {project}: {source}")]
    Pull {
        project: ProjectName,
        #[source]
        source: GitError,
    },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}

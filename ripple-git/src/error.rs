//! Error types for ripple-git.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from git invocations.
#[derive(Debug, Error)]
pub enum GitError {
    /// The `git` binary could not be spawned at all.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A git command ran and exited nonzero.
    #[error("git {action} failed in {root}: {detail}")]
    Command {
        action: String,
        root: PathBuf,
        detail: String,
    },
}

/// Convenience constructor for [`GitError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> GitError {
    GitError::Io {
        path: path.into(),
        source,
    }
}

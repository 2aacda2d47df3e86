//! Domain types shared across the ripple crates.
//!
//! Filesystem paths are always `PathBuf`/`&Path`, never bare strings.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for a repository taking part in a sync run.
///
/// Derived from the final component of the repository's path, so the name a
/// user sees in messages matches the directory they have on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectName(pub String);

impl ProjectName {
    /// Name a repository after its directory.
    ///
    /// Falls back to the full path text when the path has no final component
    /// (for example `..`).
    pub fn from_dir(path: &Path) -> Self {
        Self(
            path.file_name()
                .unwrap_or_else(|| path.as_os_str())
                .to_string_lossy()
                .into_owned(),
        )
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProjectName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Run configuration.
//!
//! Configuration is optional: a repo may carry a `ripple.yaml` at its root to
//! override the defaults, and every field in that file is itself optional.
//! A missing or empty file yields [`SyncConfig::default`], which matches the
//! conventional layout (upstream checked out next to the consumer repo,
//! shared code under `app/shared`, `it/shared` and `test/shared`).
//!
//! # API pattern
//!
//! Loaders take an explicit repo root (`load_at(root)`); nothing in this
//! crate consults the process working directory. Tests always pass a
//! `TempDir` root.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::ProjectName;

/// File name of the optional per-repo config, relative to the repo root.
pub const CONFIG_FILE: &str = "ripple.yaml";

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_upstream_dir() -> PathBuf {
    PathBuf::from("../ledger-core-api")
}

fn default_primary_branch() -> String {
    "main".to_owned()
}

fn default_shared_folders() -> Vec<PathBuf> {
    vec![
        PathBuf::from("app/shared"),
        PathBuf::from("it/shared"),
        PathBuf::from("test/shared"),
    ]
}

// ---------------------------------------------------------------------------
// Config model
// ---------------------------------------------------------------------------

/// Settings for one sync run. Loaded once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Where the upstream repo sits, relative to the consumer repo root
    /// unless absolute.
    #[serde(default = "default_upstream_dir")]
    pub upstream_dir: PathBuf,

    /// Branch the upstream repo must be on before anything is pulled.
    #[serde(default = "default_primary_branch")]
    pub primary_branch: String,

    /// Folders replaced wholesale from upstream, relative to each repo root.
    #[serde(default = "default_shared_folders")]
    pub shared_folders: Vec<PathBuf>,

    /// Name of the checked-in copy of this tool, relative to each repo root.
    /// When unset, callers fall back to the running executable's file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_file: Option<PathBuf>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            upstream_dir: default_upstream_dir(),
            primary_branch: default_primary_branch(),
            shared_folders: default_shared_folders(),
            self_file: None,
        }
    }
}

impl SyncConfig {
    /// Load `<root>/ripple.yaml`.
    ///
    /// An absent or empty file is not an error; it yields the defaults.
    /// Malformed YAML is reported as [`ConfigError::Parse`] with the path.
    pub fn load_at(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path)?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse { path, source: e })
    }

    /// The upstream repo's display name, taken from its directory.
    pub fn upstream_name(&self) -> ProjectName {
        ProjectName::from_dir(&self.upstream_dir)
    }

    /// Absolute-or-joined location of the upstream repo for a consumer repo
    /// rooted at `local_root`. Pure path arithmetic, no I/O.
    pub fn upstream_root(&self, local_root: &Path) -> PathBuf {
        if self.upstream_dir.is_absolute() {
            self.upstream_dir.clone()
        } else {
            local_root.join(&self.upstream_dir)
        }
    }

    /// The self-file name to use for this run, preferring the configured one.
    pub fn self_file_or(&self, fallback: &Path) -> PathBuf {
        self.self_file.clone().unwrap_or_else(|| fallback.to_path_buf())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

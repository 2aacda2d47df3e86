//! Immutable per-run context.

use std::path::{Path, PathBuf};

use ripple_core::{ProjectName, SyncConfig};

use crate::error::{io_err, SyncError};

/// Everything one run needs to know, resolved once up front and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Canonicalized root of the repo being updated.
    pub local_root: PathBuf,
    /// Root of the repo updates come from. Kept as configured (possibly with
    /// `..` components); git and the filesystem both resolve those.
    pub upstream_root: PathBuf,
    pub local_name: ProjectName,
    pub upstream_name: ProjectName,
    pub primary_branch: String,
    /// Folders replaced wholesale, relative to each repo root.
    pub shared_folders: Vec<PathBuf>,
    /// Checked-in copy of this tool, relative to each repo root.
    pub self_file: PathBuf,
}

impl RunContext {
    /// Resolve a context for the repo at `local_root`.
    ///
    /// The local root is canonicalized so its directory name is well defined
    /// even when callers pass `.`.
    pub fn new(
        local_root: &Path,
        config: &SyncConfig,
        self_file: PathBuf,
    ) -> Result<Self, SyncError> {
        let local_root = local_root
            .canonicalize()
            .map_err(|e| io_err(local_root, e))?;
        Ok(Self {
            upstream_root: config.upstream_root(&local_root),
            local_name: ProjectName::from_dir(&local_root),
            upstream_name: config.upstream_name(),
            primary_branch: config.primary_branch.clone(),
            shared_folders: config.shared_folders.clone(),
            self_file,
            local_root,
        })
    }

    /// `<local_root>/<self_file>`.
    pub fn local_self_file(&self) -> PathBuf {
        self.local_root.join(&self.self_file)
    }

    /// `<upstream_root>/<self_file>`.
    pub fn upstream_self_file(&self) -> PathBuf {
        self.upstream_root.join(&self.self_file)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn resolves_names_and_roots() {
        let tree = TempDir::new().expect("tempdir");
        let local = tree.path().join("ledger-invoices-api");
        fs::create_dir_all(&local).expect("mkdir");

        let ctx = RunContext::new(&local, &SyncConfig::default(), PathBuf::from("ripple"))
            .expect("context");
        assert_eq!(ctx.local_name.to_string(), "ledger-invoices-api");
        assert_eq!(ctx.upstream_name.to_string(), "ledger-core-api");
        assert!(ctx.upstream_root.ends_with("../ledger-core-api"));
        assert_eq!(ctx.local_self_file(), ctx.local_root.join("ripple"));
        assert_eq!(
            ctx.upstream_self_file(),
            ctx.upstream_root.join("ripple")
        );
    }

    #[test]
    fn missing_local_root_is_an_io_error() {
        let tree = TempDir::new().expect("tempdir");
        let gone = tree.path().join("nope");
        let err = RunContext::new(&gone, &SyncConfig::default(), PathBuf::from("ripple"))
            .unwrap_err();
        assert!(matches!(err, SyncError::Io { .. }));
    }

    #[test]
    fn absolute_upstream_dir_is_used_verbatim() {
        let tree = TempDir::new().expect("tempdir");
        let local = tree.path().join("api");
        fs::create_dir_all(&local).expect("mkdir");

        let config = SyncConfig {
            upstream_dir: PathBuf::from("/opt/src/platform-core"),
            ..SyncConfig::default()
        };
        let ctx = RunContext::new(&local, &config, PathBuf::from("ripple")).expect("context");
        assert_eq!(ctx.upstream_root, PathBuf::from("/opt/src/platform-core"));
        assert_eq!(ctx.upstream_name.to_string(), "platform-core");
    }
}

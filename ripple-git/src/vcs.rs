//! The [`Vcs`] trait and its `git`-binary implementation.

use std::path::Path;
use std::process::Command;

use crate::error::{io_err, GitError};
use crate::status::{parse_file_state, parse_status, ChangedFile, FileState};

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// The version-control operations the sync workflow needs.
///
/// Kept narrow so tests can substitute a scripted implementation.
pub trait Vcs {
    /// All changed paths in the working tree at `root`, sorted by path.
    /// Includes untracked files, excludes ignored ones.
    fn status(&self, root: &Path) -> Result<Vec<ChangedFile>, GitError>;

    /// Name of the branch checked out at `root`.
    fn current_branch(&self, root: &Path) -> Result<String, GitError>;

    /// Fetch and integrate upstream commits at `root`. Returns git's own
    /// summary output for display.
    fn pull(&self, root: &Path) -> Result<String, GitError>;

    /// State of a single path at `root` (path relative to the repo root).
    fn file_status(&self, root: &Path, file: &Path) -> Result<FileState, GitError>;
}

// ---------------------------------------------------------------------------
// Git binary implementation
// ---------------------------------------------------------------------------

/// [`Vcs`] backed by the `git` binary on `$PATH`.
///
/// Every call names its repo with `git -C <root>`; nothing here changes the
/// process working directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli;

impl GitCli {
    pub fn new() -> Self {
        Self
    }
}

impl Vcs for GitCli {
    fn status(&self, root: &Path) -> Result<Vec<ChangedFile>, GitError> {
        let stdout = run_git(
            root,
            &["status", "--porcelain=v2", "--untracked-files=all", "--ignored=no"],
        )?;
        Ok(parse_status(&stdout))
    }

    fn current_branch(&self, root: &Path) -> Result<String, GitError> {
        run_git(root, &["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn pull(&self, root: &Path) -> Result<String, GitError> {
        run_git(root, &["pull"])
    }

    fn file_status(&self, root: &Path, file: &Path) -> Result<FileState, GitError> {
        let file_arg = file.to_string_lossy().into_owned();
        let stdout = run_git(
            root,
            &[
                "status",
                "--porcelain=v2",
                "--untracked-files=all",
                "--ignored=no",
                "--",
                &file_arg,
            ],
        )?;
        Ok(parse_file_state(&stdout))
    }
}

fn run_git(root: &Path, args: &[&str]) -> Result<String, GitError> {
    tracing::debug!("git -C {} {}", root.display(), args.join(" "));
    let output = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(args)
        .output()
        .map_err(|e| io_err("git", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        return Err(GitError::Command {
            action: args.first().copied().unwrap_or("?").to_string(),
            root: root.to_path_buf(),
            detail: format!("(status {}): {} {}", output.status, stdout, stderr),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

// ---------------------------------------------------------------------------
// Tests (skipped when no `git` on PATH)
// ---------------------------------------------------------------------------

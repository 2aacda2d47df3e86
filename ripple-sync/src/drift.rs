//! Read-only preview behind `--dry-run` and `--diff`.
//!
//! The preview evaluates every entry check (no early abort, so the checklist
//! is complete) and then scans for drift between the trees as they sit on
//! disk. Nothing is pulled and nothing is written; the scan reports what a
//! real run would change right now.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use ripple_core::ProjectName;
use ripple_git::Vcs;

use crate::context::RunContext;
use crate::digest::file_digest;
use crate::error::{io_err, SyncError};
use crate::preconditions::{classify_tree, is_upstream, TreeState};

// ---------------------------------------------------------------------------
// Checklist
// ---------------------------------------------------------------------------

/// One entry check's preview verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub label: String,
    pub verdict: CheckVerdict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckVerdict {
    Pass,
    /// Passes only through the self-file carve-out.
    PassWithSelfEdit,
    Fail(String),
}

impl CheckVerdict {
    pub fn is_fail(&self) -> bool {
        matches!(self, CheckVerdict::Fail(_))
    }
}

// ---------------------------------------------------------------------------
// Drift models
// ---------------------------------------------------------------------------

/// A file present on both sides with different bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedEntry {
    /// Path relative to the shared folder.
    pub path: PathBuf,
    /// Unified diff when requested and both sides are UTF-8 text.
    pub diff: Option<String>,
}

/// Drift of one shared folder between upstream and local.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderDrift {
    pub folder: PathBuf,
    /// Upstream only; a run would add these locally.
    pub added: Vec<PathBuf>,
    /// Local only; a run would delete these.
    pub removed: Vec<PathBuf>,
    /// Both sides, different content.
    pub changed: Vec<ChangedEntry>,
}

impl FolderDrift {
    pub fn is_clean(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// What was measured without pulling or writing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftScan {
    /// Whether the local self file matches the upstream copy.
    pub self_file_differs: bool,
    pub folders: Vec<FolderDrift>,
}

impl DriftScan {
    pub fn is_clean(&self) -> bool {
        !self.self_file_differs && self.folders.iter().all(FolderDrift::is_clean)
    }
}

/// Full preview result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preflight {
    /// All four entry checks, in run order.
    pub checks: Vec<CheckReport>,
    /// `None` when an entry check failed; a real run would not reach the
    /// sync stage, so there is nothing meaningful to scan.
    pub drift: Option<DriftScan>,
}

impl Preflight {
    pub fn checks_pass(&self) -> bool {
        self.checks.iter().all(|c| !c.verdict.is_fail())
    }
}

// ---------------------------------------------------------------------------
// Preview
// ---------------------------------------------------------------------------

/// Evaluate the entry checks and, if they all pass, scan for drift.
pub fn preflight(
    ctx: &RunContext,
    vcs: &dyn Vcs,
    with_diffs: bool,
) -> Result<Preflight, SyncError> {
    let checks = run_checks(ctx, vcs);
    if checks.iter().any(|c| c.verdict.is_fail()) {
        return Ok(Preflight {
            checks,
            drift: None,
        });
    }

    let self_file_differs =
        file_digest(&ctx.upstream_self_file())? != file_digest(&ctx.local_self_file())?;
    let mut folders = Vec::new();
    for folder in &ctx.shared_folders {
        folders.push(folder_drift(ctx, folder, with_diffs)?);
    }

    Ok(Preflight {
        checks,
        drift: Some(DriftScan {
            self_file_differs,
            folders,
        }),
    })
}

/// Evaluate all four entry checks. Git failures surface as failed checks
/// here rather than run errors; the preview exists to diagnose.
fn run_checks(ctx: &RunContext, vcs: &dyn Vcs) -> Vec<CheckReport> {
    let mut checks = Vec::new();

    checks.push(CheckReport {
        label: format!("target repo is not {}", ctx.upstream_name),
        verdict: if is_upstream(ctx) {
            CheckVerdict::Fail(format!("running inside {}", ctx.upstream_name))
        } else {
            CheckVerdict::Pass
        },
    });

    checks.push(CheckReport {
        label: format!("{} on branch '{}'", ctx.upstream_name, ctx.primary_branch),
        verdict: match vcs.current_branch(&ctx.upstream_root) {
            Ok(branch) if branch == ctx.primary_branch => CheckVerdict::Pass,
            Ok(branch) => CheckVerdict::Fail(format!("on '{branch}'")),
            Err(err) => CheckVerdict::Fail(err.to_string()),
        },
    });

    checks.push(tree_check(ctx, vcs, &ctx.upstream_root, &ctx.upstream_name));
    checks.push(tree_check(ctx, vcs, &ctx.local_root, &ctx.local_name));
    checks
}

fn tree_check(ctx: &RunContext, vcs: &dyn Vcs, root: &Path, name: &ProjectName) -> CheckReport {
    CheckReport {
        label: format!("{name} working tree clean"),
        verdict: match vcs.status(root) {
            Ok(changes) => match classify_tree(&changes, &ctx.self_file) {
                TreeState::Clean => CheckVerdict::Pass,
                TreeState::CleanWithSelfEdit => CheckVerdict::PassWithSelfEdit,
                TreeState::Dirty { files } => {
                    CheckVerdict::Fail(format!("{} uncommitted change(s)", files.len()))
                }
            },
            Err(err) => CheckVerdict::Fail(err.to_string()),
        },
    }
}

// ---------------------------------------------------------------------------
// Folder scanning
// ---------------------------------------------------------------------------

fn folder_drift(
    ctx: &RunContext,
    folder: &Path,
    with_diffs: bool,
) -> Result<FolderDrift, SyncError> {
    let src = ctx.upstream_root.join(folder);
    let dst = ctx.local_root.join(folder);

    let upstream_files = collect_files(&src)?;
    let local_files = if dst.exists() {
        collect_files(&dst)?
    } else {
        BTreeSet::new()
    };

    let added = upstream_files.difference(&local_files).cloned().collect();
    let removed = local_files.difference(&upstream_files).cloned().collect();

    let mut changed = Vec::new();
    for path in upstream_files.intersection(&local_files) {
        let up = src.join(path);
        let loc = dst.join(path);
        if file_digest(&up)? == file_digest(&loc)? {
            continue;
        }
        let diff = if with_diffs {
            unified_diff(&loc, &up, folder, path)?
        } else {
            None
        };
        changed.push(ChangedEntry {
            path: path.clone(),
            diff,
        });
    }

    Ok(FolderDrift {
        folder: folder.to_path_buf(),
        added,
        removed,
        changed,
    })
}

/// All file paths under `root`, relative to it, sorted.
fn collect_files(root: &Path) -> Result<BTreeSet<PathBuf>, SyncError> {
    let mut files = BTreeSet::new();
    walk(root, Path::new(""), &mut files)?;
    Ok(files)
}

fn walk(root: &Path, prefix: &Path, files: &mut BTreeSet<PathBuf>) -> Result<(), SyncError> {
    let dir = root.join(prefix);
    let entries = std::fs::read_dir(&dir).map_err(|e| io_err(&dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(&dir, e))?;
        let rel = prefix.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| io_err(entry.path(), e))?;
        if file_type.is_dir() {
            walk(root, &rel, files)?;
        } else {
            files.insert(rel);
        }
    }
    Ok(())
}

/// Local-to-upstream unified diff, or `None` when either side is not text.
fn unified_diff(
    local: &Path,
    upstream: &Path,
    folder: &Path,
    rel: &Path,
) -> Result<Option<String>, SyncError> {
    let Some(old) = read_text(local)? else {
        return Ok(None);
    };
    let Some(new) = read_text(upstream)? else {
        return Ok(None);
    };

    let display = folder.join(rel);
    let old_header = format!("a/{}", display.display());
    let new_header = format!("b/{}", display.display());
    Ok(Some(
        TextDiff::from_lines(&old, &new)
            .unified_diff()
            .header(&old_header, &new_header)
            .context_radius(3)
            .to_string(),
    ))
}

fn read_text(path: &Path) -> Result<Option<String>, SyncError> {
    let bytes = std::fs::read(path).map_err(|e| io_err(path, e))?;
    Ok(String::from_utf8(bytes).ok())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Entry checks that gate a run.
//!
//! Checks run in a fixed order and the first failure ends the run:
//! 1. the target repo must not be the upstream repo itself
//! 2. upstream must have the primary branch checked out
//! 3. upstream's working tree must be clean
//! 4. the local working tree must be clean
//!
//! "Clean" allows one exception on both sides: exactly one changed path that
//! is the tool's own checked-in file. The threshold is exact; two changed
//! paths where one is the self file still count as dirty.

use std::fmt;
use std::path::Path;

use ripple_core::ProjectName;
use ripple_git::{ChangedFile, Vcs};

use crate::context::RunContext;
use crate::error::SyncError;

// ---------------------------------------------------------------------------
// Tree classification
// ---------------------------------------------------------------------------

/// How a working tree looks to the entry checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeState {
    Clean,
    /// Exactly one changed path, and it is the self file.
    CleanWithSelfEdit,
    Dirty { files: Vec<ChangedFile> },
}

/// Classify a change list against the self-file rule.
pub fn classify_tree(changes: &[ChangedFile], self_file: &Path) -> TreeState {
    if changes.is_empty() {
        return TreeState::Clean;
    }
    if changes.len() == 1 && changes[0].path == self_file {
        return TreeState::CleanWithSelfEdit;
    }
    TreeState::Dirty {
        files: changes.to_vec(),
    }
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Why a run stopped before touching anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Abort {
    /// The target repo is the upstream repo.
    IsUpstream { upstream: ProjectName },
    /// Upstream has some other branch checked out.
    UpstreamNotOnPrimary {
        upstream: ProjectName,
        branch: String,
        primary: String,
    },
    /// Uncommitted changes in the upstream working tree.
    UpstreamDirty {
        upstream: ProjectName,
        files: Vec<ChangedFile>,
    },
    /// Uncommitted changes in the local working tree.
    LocalDirty {
        local: ProjectName,
        files: Vec<ChangedFile>,
    },
}

impl fmt::Display for Abort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Abort::IsUpstream { upstream } => write!(
                f,
                "This tool updates shared code from {upstream}; it can't run inside {upstream} itself."
            ),
            Abort::UpstreamNotOnPrimary {
                upstream,
                branch,
                primary,
            } => write!(
                f,
                "{upstream} is on '{branch}', not '{primary}'. Switch it to '{primary}' then try again..."
            ),
            Abort::UpstreamDirty { upstream, .. } => write!(
                f,
                "{upstream} has uncommitted changes. Stash or commit them, then try again..."
            ),
            Abort::LocalDirty { local, .. } => write!(
                f,
                "{local} has uncommitted changes. Stash or commit them, then try again..."
            ),
        }
    }
}

/// Outcome of the entry checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// All checks passed. Carries what check 4 learned about the local self
    /// file so the update guard doesn't have to re-derive it.
    Proceed { self_file_locally_edited: bool },
    Stop(Abort),
}

/// Whether the run is pointed at the upstream repo itself.
pub(crate) fn is_upstream(ctx: &RunContext) -> bool {
    ctx.local_name == ctx.upstream_name
}

/// Run all entry checks in order. The first failing check decides; later
/// checks are not evaluated after a failure.
pub fn check(ctx: &RunContext, vcs: &dyn Vcs) -> Result<Verdict, SyncError> {
    if is_upstream(ctx) {
        return Ok(Verdict::Stop(Abort::IsUpstream {
            upstream: ctx.upstream_name.clone(),
        }));
    }

    let branch = vcs.current_branch(&ctx.upstream_root)?;
    if branch != ctx.primary_branch {
        return Ok(Verdict::Stop(Abort::UpstreamNotOnPrimary {
            upstream: ctx.upstream_name.clone(),
            branch,
            primary: ctx.primary_branch.clone(),
        }));
    }

    let upstream_changes = vcs.status(&ctx.upstream_root)?;
    if let TreeState::Dirty { files } = classify_tree(&upstream_changes, &ctx.self_file) {
        return Ok(Verdict::Stop(Abort::UpstreamDirty {
            upstream: ctx.upstream_name.clone(),
            files,
        }));
    }

    // Only the local tree's carve-out marks the self file as edited; an
    // upstream-side self edit passes the clean check but must not shield
    // the local copy from replacement.
    let local_changes = vcs.status(&ctx.local_root)?;
    match classify_tree(&local_changes, &ctx.self_file) {
        TreeState::Dirty { files } => Ok(Verdict::Stop(Abort::LocalDirty {
            local: ctx.local_name.clone(),
            files,
        })),
        TreeState::CleanWithSelfEdit => Ok(Verdict::Proceed {
            self_file_locally_edited: true,
        }),
        TreeState::Clean => Ok(Verdict::Proceed {
            self_file_locally_edited: false,
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! The self-update guard.
//!
//! After both repos are pulled, the checked-in copy of this tool in the
//! local repo is compared byte-for-byte against the upstream copy. A stale
//! local copy is replaced from upstream and the run halts there; a locally
//! edited copy is kept as-is with a warning.

use crate::context::RunContext;
use crate::digest::file_digest;
use crate::error::{io_err, SyncError};

/// What the guard did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfUpdate {
    /// Both copies already match.
    UpToDate,
    /// The copies differ but the local one has uncommitted edits, so it was
    /// left alone.
    KeptLocalEdits,
    /// The local copy was replaced from upstream. The run must halt so the
    /// refreshed copy handles the rest.
    Updated,
}

/// Compare the two checked-in copies and update the local one if it is
/// stale. `locally_edited` comes from the entry checks' carve-out.
pub fn apply(ctx: &RunContext, locally_edited: bool) -> Result<SelfUpdate, SyncError> {
    let upstream = ctx.upstream_self_file();
    let local = ctx.local_self_file();

    if file_digest(&upstream)? == file_digest(&local)? {
        return Ok(SelfUpdate::UpToDate);
    }

    if locally_edited {
        tracing::warn!(
            "{} differs from the {} copy but has local edits; keeping it",
            ctx.self_file.display(),
            ctx.upstream_name
        );
        return Ok(SelfUpdate::KeptLocalEdits);
    }

    tracing::info!("copying {} from {}", ctx.self_file.display(), ctx.upstream_name);
    std::fs::copy(&upstream, &local).map_err(|e| io_err(&local, e))?;
    Ok(SelfUpdate::Updated)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

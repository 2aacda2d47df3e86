//! Terminal outcome classification.
//!
//! Runs after folder replacement, from fresh queries rather than the
//! precondition-time snapshot: folder replacement changes exactly the state
//! being classified.

use ripple_git::{ChangedFile, Vcs};

use crate::context::RunContext;
use crate::error::SyncError;
use crate::preconditions::{classify_tree, TreeState};

/// The three ways a completed run can end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The replace produced local differences to review and commit.
    ChangesDetected { files: Vec<ChangedFile> },
    /// Shared code already matched; only the tool's own copy carries edits.
    SelfFileOnly,
    /// Nothing differs at all.
    UpToDate,
}

/// Classify the local tree after folder replacement.
///
/// The change list gets the same self-file carve-out as the entry checks, so
/// a lone self-file change never reads as a shared-code difference. An
/// untracked self file does not count as edited either; only real edits to a
/// tracked copy produce [`Outcome::SelfFileOnly`].
pub fn classify(ctx: &RunContext, vcs: &dyn Vcs) -> Result<Outcome, SyncError> {
    let changes = vcs.status(&ctx.local_root)?;
    if let TreeState::Dirty { files } = classify_tree(&changes, &ctx.self_file) {
        return Ok(Outcome::ChangesDetected { files });
    }

    let self_state = vcs.file_status(&ctx.local_root, &ctx.self_file)?;
    if self_state.is_locally_edited() {
        return Ok(Outcome::SelfFileOnly);
    }
    Ok(Outcome::UpToDate)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Git access for the ripple workspace.
//!
//! Everything the sync workflow knows about version control goes through the
//! [`Vcs`] trait. [`GitCli`] is the production implementation, shelling out
//! to the `git` binary with explicit repo roots.

pub mod error;
pub mod status;
pub mod vcs;

pub use error::GitError;
pub use status::{ChangeKind, ChangedFile, FileState};
pub use vcs::{GitCli, Vcs};

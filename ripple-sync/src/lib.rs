//! # ripple-sync
//!
//! Entry checks, self-update guard, folder replacement and the closing
//! report for one shared-code update run.
//!
//! Call [`pipeline::run`] for the real thing, or [`drift::preflight`] for
//! the read-only preview.

pub mod context;
mod digest;
pub mod drift;
pub mod error;
pub mod folders;
pub mod pipeline;
pub mod preconditions;
pub mod report;
pub mod self_update;

pub use context::RunContext;
pub use drift::{preflight, CheckReport, CheckVerdict, DriftScan, FolderDrift, Preflight};
pub use error::SyncError;
pub use pipeline::{run, PullReport, RunReport};
pub use preconditions::{Abort, TreeState, Verdict};
pub use report::Outcome;
pub use self_update::SelfUpdate;

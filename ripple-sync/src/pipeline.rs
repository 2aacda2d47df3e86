//! The full update run, stage by stage.
//!
//! Order matters and mirrors how a careful human does this by hand: check
//! both repos, bring both up to date, make sure the tool itself is current,
//! then replace the shared folders and look at what actually changed.

use std::path::Path;

use ripple_core::ProjectName;
use ripple_git::Vcs;

use crate::context::RunContext;
use crate::error::SyncError;
use crate::folders;
use crate::preconditions::{self, Abort, Verdict};
use crate::report::{self, Outcome};
use crate::self_update::{self, SelfUpdate};

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// One `git pull` that ran, with whatever git printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullReport {
    pub project: ProjectName,
    pub output: String,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunReport {
    /// An entry check failed; nothing was pulled or written.
    Aborted(Abort),
    /// The tool replaced its own checked-in copy and stopped so the caller
    /// can re-run the fresh version.
    SelfUpdated { pulls: Vec<PullReport> },
    /// The sync ran to completion.
    Completed {
        pulls: Vec<PullReport>,
        self_update: SelfUpdate,
        outcome: Outcome,
    },
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// Execute a full update run against the repos in `ctx`.
///
/// Aborts and the self-update halt are ordinary outcomes, reported in the
/// [`RunReport`]; `Err` means the run itself broke (a failed pull, an
/// unreadable tree) and the local repo may need a look.
pub fn run(ctx: &RunContext, vcs: &dyn Vcs) -> Result<RunReport, SyncError> {
    let self_file_locally_edited = match preconditions::check(ctx, vcs)? {
        Verdict::Stop(abort) => return Ok(RunReport::Aborted(abort)),
        Verdict::Proceed {
            self_file_locally_edited,
        } => self_file_locally_edited,
    };

    let pulls = vec![
        pull(vcs, &ctx.upstream_root, &ctx.upstream_name)?,
        pull(vcs, &ctx.local_root, &ctx.local_name)?,
    ];

    let self_update = self_update::apply(ctx, self_file_locally_edited)?;
    if self_update == SelfUpdate::Updated {
        return Ok(RunReport::SelfUpdated { pulls });
    }

    folders::replace_all(ctx)?;
    let outcome = report::classify(ctx, vcs)?;

    Ok(RunReport::Completed {
        pulls,
        self_update,
        outcome,
    })
}

fn pull(vcs: &dyn Vcs, root: &Path, project: &ProjectName) -> Result<PullReport, SyncError> {
    let output = vcs.pull(root).map_err(|source| SyncError::Pull {
        project: project.clone(),
        source,
    })?;
    Ok(PullReport {
        project: project.clone(),
        output,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_core::SyncConfig;
    use ripple_git::{ChangeKind, ChangedFile, FileState, GitError};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Scripted stand-in for git. Local statuses are consumed as a queue so
    /// the entry check and the closing report can see different trees.
    struct FakeVcs {
        upstream_root: PathBuf,
        branch: String,
        fail_pull: bool,
        upstream_changes: Vec<ChangedFile>,
        local_statuses: RefCell<VecDeque<Vec<ChangedFile>>>,
        self_state: FileState,
        calls: RefCell<Vec<String>>,
    }

    impl FakeVcs {
        fn new(ctx: &RunContext) -> Self {
            Self {
                upstream_root: ctx.upstream_root.clone(),
                branch: "main".into(),
                fail_pull: false,
                upstream_changes: vec![],
                local_statuses: RefCell::new(VecDeque::from([vec![], vec![]])),
                self_state: FileState::Current,
                calls: RefCell::new(vec![]),
            }
        }

        fn side(&self, root: &Path) -> &'static str {
            if root == self.upstream_root {
                "up"
            } else {
                "local"
            }
        }

        fn log(&self, what: &str, root: &Path) {
            self.calls.borrow_mut().push(format!("{what}:{}", self.side(root)));
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl Vcs for FakeVcs {
        fn status(&self, root: &Path) -> Result<Vec<ChangedFile>, GitError> {
            self.log("status", root);
            if root == self.upstream_root {
                Ok(self.upstream_changes.clone())
            } else {
                Ok(self
                    .local_statuses
                    .borrow_mut()
                    .pop_front()
                    .expect("a scripted local status"))
            }
        }

        fn current_branch(&self, root: &Path) -> Result<String, GitError> {
            self.log("branch", root);
            Ok(self.branch.clone())
        }

        fn pull(&self, root: &Path) -> Result<String, GitError> {
            self.log("pull", root);
            if self.fail_pull {
                return Err(GitError::Command {
                    action: "pull".into(),
                    root: root.to_path_buf(),
                    detail: "(status 1): no remote".into(),
                });
            }
            Ok("Already up to date.".into())
        }

        fn file_status(&self, root: &Path, _file: &Path) -> Result<FileState, GitError> {
            self.log("file_status", root);
            Ok(self.self_state)
        }
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(path, content).expect("write");
    }

    fn read(root: &Path, rel: &str) -> String {
        fs::read_to_string(root.join(rel)).expect("read")
    }

    /// Sibling `up`/`local` trees, identical self files, one shared folder.
    fn make_pair() -> (TempDir, RunContext) {
        let tree = TempDir::new().expect("tempdir");
        let up = tree.path().join("up");
        let local = tree.path().join("local");
        write(&up, "ripple", "self v1\n");
        write(&local, "ripple", "self v1\n");
        write(&up, "app/shared/lib.scala", "shared v1\n");
        write(&local, "app/shared/lib.scala", "shared v1\n");

        let config = SyncConfig {
            upstream_dir: PathBuf::from("../up"),
            shared_folders: vec![PathBuf::from("app/shared")],
            ..SyncConfig::default()
        };
        let ctx = RunContext::new(&local, &config, PathBuf::from("ripple")).expect("context");
        (tree, ctx)
    }

    fn self_change() -> ChangedFile {
        ChangedFile {
            path: PathBuf::from("ripple"),
            kind: ChangeKind::Modified,
        }
    }

    #[test]
    fn full_run_touches_repos_in_order() {
        let (_tree, ctx) = make_pair();
        let vcs = FakeVcs::new(&ctx);

        let report = run(&ctx, &vcs).expect("run");
        assert_eq!(
            vcs.calls(),
            vec![
                "branch:up",
                "status:up",
                "status:local",
                "pull:up",
                "pull:local",
                "status:local",
                "file_status:local",
            ]
        );
        let RunReport::Completed {
            pulls,
            self_update,
            outcome,
        } = report
        else {
            panic!("expected a completed run");
        };
        assert_eq!(pulls.len(), 2);
        assert_eq!(pulls[0].project.to_string(), "up");
        assert_eq!(pulls[1].project.to_string(), "local");
        assert_eq!(pulls[0].output, "Already up to date.");
        assert_eq!(self_update, SelfUpdate::UpToDate);
        assert_eq!(outcome, Outcome::UpToDate);
    }

    #[test]
    fn wrong_upstream_branch_aborts_before_any_pull() {
        let (_tree, ctx) = make_pair();
        let mut vcs = FakeVcs::new(&ctx);
        vcs.branch = "develop".into();

        let report = run(&ctx, &vcs).expect("run");
        assert!(matches!(
            report,
            RunReport::Aborted(Abort::UpstreamNotOnPrimary { .. })
        ));
        assert_eq!(vcs.calls(), vec!["branch:up"]);
    }

    #[test]
    fn dirty_local_tree_aborts_before_any_pull() {
        let (_tree, ctx) = make_pair();
        let vcs = FakeVcs::new(&ctx);
        vcs.local_statuses.borrow_mut()[0] = vec![
            self_change(),
            ChangedFile {
                path: PathBuf::from("app/other.scala"),
                kind: ChangeKind::Modified,
            },
        ];

        let report = run(&ctx, &vcs).expect("run");
        assert!(matches!(report, RunReport::Aborted(Abort::LocalDirty { .. })));
        assert_eq!(
            vcs.calls(),
            vec!["branch:up", "status:up", "status:local"]
        );
    }

    #[test]
    fn stale_self_file_is_replaced_and_halts_the_run() {
        let (_tree, ctx) = make_pair();
        write(&ctx.upstream_root, "ripple", "self v2\n");
        write(&ctx.upstream_root, "app/shared/new.scala", "new\n");
        let vcs = FakeVcs::new(&ctx);

        let report = run(&ctx, &vcs).expect("run");
        let RunReport::SelfUpdated { pulls } = report else {
            panic!("expected a self-update halt");
        };
        assert_eq!(pulls.len(), 2);
        assert_eq!(read(&ctx.local_root, "ripple"), "self v2\n");
        // Folders stay untouched until the fresh copy runs.
        assert!(!ctx.local_root.join("app/shared/new.scala").exists());
        assert_eq!(
            vcs.calls(),
            vec!["branch:up", "status:up", "status:local", "pull:up", "pull:local"]
        );
    }

    #[test]
    fn locally_edited_self_file_is_kept() {
        let (_tree, ctx) = make_pair();
        write(&ctx.upstream_root, "ripple", "self v2\n");
        let mut vcs = FakeVcs::new(&ctx);
        vcs.self_state = FileState::Modified;
        *vcs.local_statuses.borrow_mut() =
            VecDeque::from([vec![self_change()], vec![self_change()]]);

        let report = run(&ctx, &vcs).expect("run");
        let RunReport::Completed {
            self_update,
            outcome,
            ..
        } = report
        else {
            panic!("expected a completed run");
        };
        assert_eq!(self_update, SelfUpdate::KeptLocalEdits);
        assert_eq!(outcome, Outcome::SelfFileOnly);
        assert_eq!(read(&ctx.local_root, "ripple"), "self v1\n");
    }

    #[test]
    fn shared_changes_surface_in_the_outcome() {
        let (_tree, ctx) = make_pair();
        let vcs = FakeVcs::new(&ctx);
        *vcs.local_statuses.borrow_mut() = VecDeque::from([
            vec![],
            vec![ChangedFile {
                path: PathBuf::from("app/shared/lib.scala"),
                kind: ChangeKind::Modified,
            }],
        ]);

        let report = run(&ctx, &vcs).expect("run");
        let RunReport::Completed { outcome, .. } = report else {
            panic!("expected a completed run");
        };
        let Outcome::ChangesDetected { files } = outcome else {
            panic!("expected detected changes");
        };
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, PathBuf::from("app/shared/lib.scala"));
    }

    #[test]
    fn pull_failure_names_the_repo_that_broke() {
        let (_tree, ctx) = make_pair();
        let mut vcs = FakeVcs::new(&ctx);
        vcs.fail_pull = true;

        let err = run(&ctx, &vcs).unwrap_err();
        let SyncError::Pull { project, .. } = err else {
            panic!("expected a pull error");
        };
        assert_eq!(project, ctx.upstream_name);
        assert_eq!(vcs.calls().last().map(String::as_str), Some("pull:up"));
    }
}

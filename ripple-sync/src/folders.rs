//! Wholesale shared-folder replacement.
//!
//! Replacement is delete-then-copy, not a merge: the local folder is removed
//! and the upstream folder copied recursively in its place, so upstream
//! deletions and renames arrive on the next run.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::context::RunContext;
use crate::error::{io_err, SyncError};

/// Replace every configured shared folder, in configured order.
pub fn replace_all(ctx: &RunContext) -> Result<(), SyncError> {
    for folder in &ctx.shared_folders {
        replace(&ctx.upstream_root, &ctx.local_root, folder)?;
    }
    Ok(())
}

/// Replace `<local_root>/<folder>` with a copy of `<upstream_root>/<folder>`.
///
/// The upstream folder is stat'ed before the local delete, so a missing
/// upstream folder fails without destroying the local copy. A missing local
/// folder is fine; the first sync into a fresh checkout just copies.
pub fn replace(upstream_root: &Path, local_root: &Path, folder: &Path) -> Result<(), SyncError> {
    let src = upstream_root.join(folder);
    let dst = local_root.join(folder);

    fs::metadata(&src).map_err(|e| io_err(&src, e))?;

    tracing::debug!("replacing {} from {}", dst.display(), src.display());
    match fs::remove_dir_all(&dst) {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => return Err(io_err(&dst, err)),
    }
    copy_dir_all(&src, &dst)
}

fn copy_dir_all(src: &Path, dst: &Path) -> Result<(), SyncError> {
    fs::create_dir_all(dst).map_err(|e| io_err(dst, e))?;
    let entries = fs::read_dir(src).map_err(|e| io_err(src, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(src, e))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| io_err(&from, e))?;
        if file_type.is_dir() {
            copy_dir_all(&from, &to)?;
        } else {
            fs::copy(&from, &to).map_err(|e| io_err(&from, e))?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

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

    #[test]
    fn copies_nested_content_over() {
        let tree = TempDir::new().expect("tempdir");
        let up = tree.path().join("up");
        let local = tree.path().join("local");
        write(&up, "app/shared/model.scala", "case class A()\n");
        write(&up, "app/shared/deep/util.scala", "object U\n");
        fs::create_dir_all(&local).expect("mkdir local");

        replace(&up, &local, Path::new("app/shared")).expect("replace");
        assert_eq!(read(&local, "app/shared/model.scala"), "case class A()\n");
        assert_eq!(read(&local, "app/shared/deep/util.scala"), "object U\n");
    }

    #[test]
    fn local_only_files_are_deleted() {
        let tree = TempDir::new().expect("tempdir");
        let up = tree.path().join("up");
        let local = tree.path().join("local");
        write(&up, "app/shared/kept.scala", "kept\n");
        write(&local, "app/shared/stale.scala", "stale\n");
        write(&local, "app/shared/nested/old.scala", "old\n");

        replace(&up, &local, Path::new("app/shared")).expect("replace");
        assert!(local.join("app/shared/kept.scala").exists());
        assert!(!local.join("app/shared/stale.scala").exists());
        assert!(!local.join("app/shared/nested").exists());
    }

    #[test]
    fn missing_local_folder_is_fine() {
        let tree = TempDir::new().expect("tempdir");
        let up = tree.path().join("up");
        let local = tree.path().join("local");
        write(&up, "it/shared/harness.scala", "trait Harness\n");
        fs::create_dir_all(&local).expect("mkdir local");

        replace(&up, &local, Path::new("it/shared")).expect("replace");
        assert_eq!(read(&local, "it/shared/harness.scala"), "trait Harness\n");
    }

    #[test]
    fn missing_upstream_folder_fails_and_keeps_local() {
        let tree = TempDir::new().expect("tempdir");
        let up = tree.path().join("up");
        let local = tree.path().join("local");
        fs::create_dir_all(&up).expect("mkdir up");
        write(&local, "app/shared/precious.scala", "precious\n");

        let err = replace(&up, &local, Path::new("app/shared")).unwrap_err();
        assert!(matches!(err, SyncError::Io { .. }));
        assert_eq!(read(&local, "app/shared/precious.scala"), "precious\n");
    }

    #[test]
    fn replace_is_idempotent() {
        let tree = TempDir::new().expect("tempdir");
        let up = tree.path().join("up");
        let local = tree.path().join("local");
        write(&up, "test/shared/base.scala", "base\n");
        fs::create_dir_all(&local).expect("mkdir local");

        replace(&up, &local, Path::new("test/shared")).expect("first");
        replace(&up, &local, Path::new("test/shared")).expect("second");
        assert_eq!(read(&local, "test/shared/base.scala"), "base\n");
    }

    #[test]
    fn replace_all_walks_every_configured_folder() {
        let tree = TempDir::new().expect("tempdir");
        let up = tree.path().join("up");
        let local = tree.path().join("local");
        write(&up, "ripple", "self\n");
        write(&local, "ripple", "self\n");
        write(&up, "app/shared/a.scala", "a\n");
        write(&up, "it/shared/b.scala", "b\n");
        write(&up, "test/shared/c.scala", "c\n");

        let config = ripple_core::SyncConfig {
            upstream_dir: PathBuf::from("../up"),
            ..ripple_core::SyncConfig::default()
        };
        let ctx = RunContext::new(&local, &config, PathBuf::from("ripple")).expect("context");
        replace_all(&ctx).expect("replace_all");
        assert_eq!(read(&local, "app/shared/a.scala"), "a\n");
        assert_eq!(read(&local, "it/shared/b.scala"), "b\n");
        assert_eq!(read(&local, "test/shared/c.scala"), "c\n");
    }
}

//! SHA-256 content digests.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{io_err, SyncError};

/// Hex SHA-256 over a file's raw bytes. No newline normalization, so binary
/// content digests the same as text.
pub(crate) fn file_digest(path: &Path) -> Result<String, SyncError> {
    let content = std::fs::read(path).map_err(|e| io_err(path, e))?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn equal_content_digests_equal() {
        let dir = TempDir::new().expect("tempdir");
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::write(&a, b"same bytes\x00\x01").expect("write a");
        fs::write(&b, b"same bytes\x00\x01").expect("write b");
        assert_eq!(
            file_digest(&a).expect("digest a"),
            file_digest(&b).expect("digest b")
        );
    }

    #[test]
    fn different_content_digests_differ() {
        let dir = TempDir::new().expect("tempdir");
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::write(&a, "one\n").expect("write a");
        fs::write(&b, "two\n").expect("write b");
        assert_ne!(
            file_digest(&a).expect("digest a"),
            file_digest(&b).expect("digest b")
        );
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = TempDir::new().expect("tempdir");
        let gone = dir.path().join("gone");
        let err = file_digest(&gone).unwrap_err();
        match err {
            SyncError::Io { path, source } => {
                assert_eq!(path, gone);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected Io, got {other:?}"),
        }
    }
}

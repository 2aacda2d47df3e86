//! Working-tree status models and porcelain v2 parsing.
//!
//! The sync workflow only needs the set of changed paths plus a coarse kind
//! per path, so branch headers are skipped and malformed lines are dropped
//! rather than failing the whole status read.

use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

/// Coarse classification of one changed path in a working tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Modified,
    Added,
    Deleted,
    Renamed,
    Untracked,
    Unmerged,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Modified => write!(f, "modified"),
            ChangeKind::Added => write!(f, "added"),
            ChangeKind::Deleted => write!(f, "deleted"),
            ChangeKind::Renamed => write!(f, "renamed"),
            ChangeKind::Untracked => write!(f, "untracked"),
            ChangeKind::Unmerged => write!(f, "unmerged"),
        }
    }
}

/// One changed path reported by [`crate::Vcs::status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    /// Path relative to the repo root, with `/` separators.
    pub path: PathBuf,
    pub kind: ChangeKind,
}

/// State of a single path, as reported by [`crate::Vcs::file_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// Matches HEAD, nothing staged.
    Current,
    /// Present on disk but unknown to the index.
    New,
    /// Unstaged content change.
    Modified,
    /// Staged change of any sort.
    Staged,
    /// Deleted on disk or in the index.
    Deleted,
}

impl FileState {
    /// Whether the path carries local edits. `Current` and `New` count as
    /// unedited; a file that merely has not been committed yet is not an
    /// edit in progress.
    pub fn is_locally_edited(&self) -> bool {
        !matches!(self, FileState::Current | FileState::New)
    }
}

// ---------------------------------------------------------------------------
// Porcelain v2 parsing
// ---------------------------------------------------------------------------

/// Parse full `status --porcelain=v2` output into a path-sorted change list.
pub(crate) fn parse_status(stdout: &str) -> Vec<ChangedFile> {
    let mut entries = Vec::new();
    for line in stdout.lines() {
        parse_status_line(line, &mut entries);
    }
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    entries
}

fn parse_status_line(line: &str, entries: &mut Vec<ChangedFile>) {
    if line.starts_with('#') {
        return;
    }
    if let Some(path) = line.strip_prefix("? ") {
        entries.push(ChangedFile {
            path: normalize_status_path(path),
            kind: ChangeKind::Untracked,
        });
        return;
    }
    if let Some(rest) = line.strip_prefix("1 ") {
        parse_ordinary(rest, entries);
        return;
    }
    if let Some(rest) = line.strip_prefix("2 ") {
        parse_renamed(rest, entries);
        return;
    }
    if let Some(rest) = line.strip_prefix("u ") {
        parse_unmerged(rest, entries);
    }
}

/// `1 <XY> <sub> <mH> <mI> <mW> <hH> <hI> <path>`
fn parse_ordinary(rest: &str, entries: &mut Vec<ChangedFile>) {
    let mut parts = rest.splitn(8, ' ');
    let xy = match parts.next() {
        Some(v) => v,
        None => return,
    };
    for _ in 0..6 {
        if parts.next().is_none() {
            return;
        }
    }
    let path = match parts.next() {
        Some(v) => normalize_status_path(v),
        None => return,
    };
    entries.push(ChangedFile {
        path,
        kind: kind_from_xy(xy),
    });
}

/// `2 <XY> <sub> <mH> <mI> <mW> <hH> <hI> <Xscore> <path>\t<origPath>`
fn parse_renamed(rest: &str, entries: &mut Vec<ChangedFile>) {
    let mut parts = rest.splitn(9, ' ');
    if parts.next().is_none() {
        return;
    }
    for _ in 0..7 {
        if parts.next().is_none() {
            return;
        }
    }
    let path_pair = match parts.next() {
        Some(v) => v,
        None => return,
    };
    let path_raw = match path_pair.split_once('\t') {
        Some((new_path, _old_path)) => new_path,
        None => path_pair,
    };
    entries.push(ChangedFile {
        path: normalize_status_path(path_raw),
        kind: ChangeKind::Renamed,
    });
}

fn parse_unmerged(rest: &str, entries: &mut Vec<ChangedFile>) {
    let path = match rest.split_whitespace().last() {
        Some(v) => normalize_status_path(v),
        None => return,
    };
    entries.push(ChangedFile {
        path,
        kind: ChangeKind::Unmerged,
    });
}

fn kind_from_xy(xy: &str) -> ChangeKind {
    if xy.contains('D') {
        ChangeKind::Deleted
    } else if xy.contains('A') {
        ChangeKind::Added
    } else {
        ChangeKind::Modified
    }
}

/// Parse single-path `status --porcelain=v2 -- <path>` output.
///
/// No entries means the path matches HEAD.
pub(crate) fn parse_file_state(stdout: &str) -> FileState {
    for line in stdout.lines() {
        if line.starts_with("? ") {
            return FileState::New;
        }
        if line.starts_with("1 ") || line.starts_with("2 ") || line.starts_with("u ") {
            let xy = line.split(' ').nth(1).unwrap_or(".");
            return state_from_xy(xy);
        }
    }
    FileState::Current
}

fn state_from_xy(xy: &str) -> FileState {
    let index = xy.chars().next().unwrap_or('.');
    let worktree = xy.chars().nth(1).unwrap_or('.');
    if index == 'D' || worktree == 'D' {
        FileState::Deleted
    } else if index != '.' {
        FileState::Staged
    } else {
        FileState::Modified
    }
}

/// Strip optional double quotes and use `/` separators throughout.
fn normalize_status_path(path: &str) -> PathBuf {
    let trimmed = path.trim();
    let unquoted = if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].replace("\\\\", "\\")
    } else {
        trimmed.to_string()
    };
    PathBuf::from(unquoted.replace('\\', "/"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Shadow-to-workspace change detection.
//!
//! Only the shadow tree is walked. Files that exist in the workspace but not
//! in the shadow are never reported, and upstream deletions are not
//! propagated: workspaces carry user content (cloned repos, drafts) that the
//! shadow does not track.

use serde::Serialize;
use std::fmt;
use std::io;
use std::path::Path;
use tracing::debug;

use super::error::{FsError, FsResultExt};
use super::ignore::IgnoreMatcher;
use super::walker::walk_files;

/// How a shadow file differs from its workspace counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Present in the shadow, absent from the workspace.
    Added,
    /// Present in both with different bytes.
    Modified,
}

impl ChangeKind {
    /// One-character marker used in listings.
    pub fn symbol(&self) -> char {
        match self {
            ChangeKind::Added => '+',
            ChangeKind::Modified => '~',
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Added => write!(f, "added"),
            ChangeKind::Modified => write!(f, "modified"),
        }
    }
}

/// A single diff entry, keyed by a path relative to both tree roots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FileChange {
    pub path: String,
    pub kind: ChangeKind,
}

impl FileChange {
    pub fn new(path: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Read a workspace file, returning `None` when no regular file sits at
/// `path`.
///
/// That covers a missing file, a missing or non-directory ancestor, and a
/// directory in the file's place. A read that fails on an existing regular
/// file (permissions, I/O) is an error.
async fn read_if_present(path: &Path) -> Result<Option<Vec<u8>>, FsError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() => Err(FsError::new("read", path, e)),
            _ => {
                debug!("No regular file at {}: {}", path.display(), e);
                Ok(None)
            }
        },
    }
}

/// Compare `shadow_root` against `workspace_root`.
///
/// Ignored paths are filtered out before any file is read. Comparison is
/// exact and binary-safe. Entries come back sorted by path.
pub async fn diff_trees(
    shadow_root: &Path,
    workspace_root: &Path,
    ignore: &IgnoreMatcher,
) -> Result<Vec<FileChange>, FsError> {
    let candidates = walk_files(shadow_root)?;
    let mut changes = Vec::new();

    for rel in candidates {
        if ignore.is_ignored(&rel) {
            debug!("Ignored by pattern: {}", rel);
            continue;
        }

        let workspace_file = workspace_root.join(&rel);
        let Some(workspace_bytes) = read_if_present(&workspace_file).await? else {
            debug!("Added: {}", rel);
            changes.push(FileChange::new(rel, ChangeKind::Added));
            continue;
        };

        let shadow_file = shadow_root.join(&rel);
        let shadow_bytes = tokio::fs::read(&shadow_file)
            .await
            .fs_context("read", &shadow_file)?;

        if shadow_bytes != workspace_bytes {
            debug!("Modified: {}", rel);
            changes.push(FileChange::new(rel, ChangeKind::Modified));
        }
    }

    Ok(changes)
}

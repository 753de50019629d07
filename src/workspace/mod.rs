//! Workspace tree operations.
//!
//! This module holds the reconciliation core used by `dunelin update`:
//! - Directory walking that never enters `.git`
//! - Glob ignore matching over relative paths
//! - One-directional diff of the shadow against the workspace
//! - Selective copy of shadow files into the workspace
//!
//! It also carries the read-only project queries, the built-in template and
//! the managed context-file block.

pub mod block;
mod copy;
mod diff;
mod error;
mod ignore;
pub mod projects;
pub mod template;
mod walker;

use std::path::{Path, PathBuf};

// Re-exports
pub use copy::{copy_from_shadow, CopyReport};
#[cfg(test)]
pub use diff::ChangeKind;
pub use diff::{diff_trees, FileChange};
pub use error::FsError;
pub use ignore::IgnoreMatcher;
use walker::VCS_DIR;

/// Shadow repository location, relative to the workspace root.
pub const SHADOW_DIR: &str = ".dunelin/shadow";

/// Absolute path of the shadow repository for `workspace`.
pub fn shadow_path(workspace: &Path) -> PathBuf {
    workspace.join(SHADOW_DIR)
}

/// Whether the shadow exists as a git working copy.
///
/// Checks for the shadow's own `.git`, not just the directory.
pub fn has_shadow(workspace: &Path) -> bool {
    shadow_path(workspace).join(VCS_DIR).exists()
}

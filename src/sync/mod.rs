//! Shadow sync: pull upstream context and merge it into the workspace.
//!
//! The flow is `Idle -> Pulling -> Diffing -> AwaitingSelection -> Copying
//! -> Done`. An empty change set goes straight from `Diffing` to `Done`.
//! Pull and copy failures end in `Error` and are reported through
//! [`SyncError`] so remote and local failures stay distinguishable.

mod orchestrator;

pub use orchestrator::{ChangeSelector, Selection, ShadowSync, SyncOutcome};

use thiserror::Error;

use crate::git::GitError;
use crate::workspace::FsError;

/// Terminal failure of a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Fetching upstream history failed (network, auth, missing ref).
    #[error("Git pull failed: {0}")]
    Remote(#[source] GitError),
    /// Walking, reading, or writing local files failed.
    #[error(transparent)]
    Filesystem(#[from] FsError),
    /// The selection collaborator itself failed (not a user cancel).
    #[error("Selection prompt failed: {0}")]
    Prompt(String),
}

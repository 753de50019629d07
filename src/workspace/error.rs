//! Local filesystem errors raised while walking, diffing, or copying.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A filesystem operation that failed on a specific path.
#[derive(Debug, Error)]
#[error("failed to {action} {}: {source}", .path.display())]
pub struct FsError {
    pub action: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl FsError {
    pub fn new(action: &'static str, path: impl AsRef<Path>, source: io::Error) -> Self {
        Self {
            action,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Attach an action and a path to an `io::Result`.
pub(crate) trait FsResultExt<T> {
    fn fs_context(self, action: &'static str, path: &Path) -> Result<T, FsError>;
}

impl<T> FsResultExt<T> for io::Result<T> {
    fn fs_context(self, action: &'static str, path: &Path) -> Result<T, FsError> {
        self.map_err(|e| FsError::new(action, path, e))
    }
}

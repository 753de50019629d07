//! Recursive file enumeration for shadow and workspace trees.

use std::io;
use std::path::Path;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use super::error::FsError;

/// Version-control metadata directory that is never walked.
pub const VCS_DIR: &str = ".git";

fn is_vcs_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name() == VCS_DIR
}

/// Convert a path relative to the walk root into forward-slash form.
pub fn to_relative_posix(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// List every regular file below `root` as a POSIX relative path.
///
/// Any directory named `.git` is pruned before it is entered. Symlinks are
/// followed so a link to a file is reported like a file. A missing root
/// yields an empty list; any other walk error is returned. The result is
/// sorted so callers get stable output.
pub fn walk_files(root: &Path) -> Result<Vec<String>, FsError> {
    if !root.exists() {
        debug!("Walk root does not exist: {}", root.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !is_vcs_dir(e));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "filesystem loop detected"));
            FsError::new("walk", path, source)
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| {
                FsError::new(
                    "relativize",
                    entry.path(),
                    io::Error::new(io::ErrorKind::InvalidInput, "path escapes walk root"),
                )
            })?;
        files.push(to_relative_posix(relative));
    }

    files.sort();
    debug!("Walked {} files under {}", files.len(), root.display());
    Ok(files)
}

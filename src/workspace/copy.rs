//! Selective copy from the shadow into a target tree.

use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

use super::error::{FsError, FsResultExt};
use super::ignore::IgnoreMatcher;
use super::walker::walk_files;

/// Which paths a copy wrote and which it passed over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CopyReport {
    /// Paths actually written, in walk order.
    pub copied: Vec<String>,
    /// Paths excluded by an ignore pattern or by the selection.
    pub skipped: Vec<String>,
}

/// Copy files from `shadow_root` into `target_root`.
///
/// With `selection == None` every non-ignored file is copied. With a
/// selection only the listed paths are copied; ignored paths are never
/// copied even when selected. Parent directories are created as needed and
/// existing files are overwritten. The first I/O failure aborts the whole
/// operation.
pub async fn copy_from_shadow(
    shadow_root: &Path,
    target_root: &Path,
    ignore: &IgnoreMatcher,
    selection: Option<&[String]>,
) -> Result<CopyReport, FsError> {
    let selected: Option<HashSet<&str>> =
        selection.map(|paths| paths.iter().map(String::as_str).collect());

    let mut report = CopyReport::default();

    for rel in walk_files(shadow_root)? {
        let wanted = selected
            .as_ref()
            .map_or(true, |set| set.contains(rel.as_str()));

        if ignore.is_ignored(&rel) || !wanted {
            report.skipped.push(rel);
            continue;
        }

        let src = shadow_root.join(&rel);
        let dst = target_root.join(&rel);
        if let Some(parent) = dst.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .fs_context("create directory", parent)?;
        }
        tokio::fs::copy(&src, &dst).await.fs_context("copy", &src)?;

        debug!("Copied {}", rel);
        report.copied.push(rel);
    }

    debug!(
        "Copy complete: {} copied, {} skipped",
        report.copied.len(),
        report.skipped.len()
    );
    Ok(report)
}

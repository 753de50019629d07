use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Resolve the workspace root: the explicit path if given, else the
/// current directory.
pub fn resolve_workspace(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => path
            .canonicalize()
            .with_context(|| format!("Failed to resolve workspace path: {}", path.display())),
        None => std::env::current_dir().context("Failed to get current directory"),
    }
}

/// Directory `init` writes into: `cwd/NAME`, or `cwd` itself.
pub fn resolve_target_dir(cwd: &Path, name: Option<&str>) -> PathBuf {
    match name {
        Some(name) => cwd.join(name),
        None => cwd.to_path_buf(),
    }
}

/// Display name for a new workspace: `NAME`, or the basename of `cwd`.
pub fn workspace_name(cwd: &Path, name: Option<&str>) -> String {
    match name {
        Some(name) => name.to_string(),
        None => cwd
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "workspace".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_dir_and_name() {
        let cwd = Path::new("/home/ada/work");
        assert_eq!(resolve_target_dir(cwd, None), cwd);
        assert_eq!(
            resolve_target_dir(cwd, Some("acme")),
            PathBuf::from("/home/ada/work/acme")
        );
        assert_eq!(workspace_name(cwd, None), "work");
        assert_eq!(workspace_name(cwd, Some("acme")), "acme");
        assert_eq!(workspace_name(Path::new("/"), None), "workspace");
    }

    #[test]
    fn test_resolve_missing_workspace_fails() {
        let err = resolve_workspace(Some(PathBuf::from("/definitely/not/here"))).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here"));
    }
}

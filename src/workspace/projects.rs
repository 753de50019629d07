//! Read-only queries over a workspace's projects and context files.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{
    read_project_config, read_workspace_config, ProjectConfig, RepoConfig, DEFAULT_CONTEXT_FILE,
};

/// Directory holding one sub-directory per project.
pub const PROJECTS_DIR: &str = "projects";

/// Team file that sits next to each project's context file.
pub const HUMANS_FILE: &str = "HUMANS.md";

/// A project directory with a valid `dunelin.json`.
#[derive(Debug, Clone)]
pub struct ProjectEntry {
    /// Directory name under `projects/`.
    pub name: String,
    pub path: PathBuf,
    pub config: ProjectConfig,
}

/// Projects that declare at least one repository.
#[derive(Debug, Clone)]
pub struct ProjectRepos {
    pub project_name: String,
    pub project_path: PathBuf,
    pub repos: Vec<RepoConfig>,
}

/// Read a text file, returning `None` if it is missing or unreadable.
pub async fn read_text_file(path: &Path) -> Option<String> {
    tokio::fs::read_to_string(path).await.ok()
}

/// Context file name configured for the workspace.
pub async fn context_filename(workspace: &Path) -> String {
    read_workspace_config(workspace)
        .await
        .map(|c| c.context_file)
        .unwrap_or_else(|| DEFAULT_CONTEXT_FILE.to_string())
}

/// Whether `dir` holds a readable workspace config.
pub async fn is_workspace(dir: &Path) -> bool {
    read_workspace_config(dir).await.is_some()
}

/// List projects under `projects/`, sorted by directory name.
///
/// Directories without a valid `dunelin.json` are skipped. A missing
/// `projects/` directory yields an empty list.
pub async fn list_projects(workspace: &Path) -> Vec<ProjectEntry> {
    let projects_dir = workspace.join(PROJECTS_DIR);
    let mut entries = match tokio::fs::read_dir(&projects_dir).await {
        Ok(e) => e,
        Err(e) => {
            debug!("No projects directory at {}: {}", projects_dir.display(), e);
            return Vec::new();
        }
    };

    let mut dirs = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let is_dir = entry
            .file_type()
            .await
            .map(|t| t.is_dir())
            .unwrap_or(false);
        if is_dir {
            dirs.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
        }
    }
    dirs.sort_by(|a, b| a.0.cmp(&b.0));

    let mut projects = Vec::new();
    for (name, path) in dirs {
        if let Some(config) = read_project_config(&path).await {
            projects.push(ProjectEntry { name, path, config });
        }
    }
    projects
}

/// Projects that declare repositories in their metadata.
pub async fn list_projects_with_repos(workspace: &Path) -> Vec<ProjectRepos> {
    list_projects(workspace)
        .await
        .into_iter()
        .filter(|p| !p.config.repos.is_empty())
        .map(|p| ProjectRepos {
            project_name: p.name,
            project_path: p.path,
            repos: p.config.repos,
        })
        .collect()
}

//! Workspace-level queries.

use serde::Serialize;
use std::path::Path;

use crate::config::RepoConfig;
use crate::workspace::projects::{context_filename, list_projects, read_text_file};

#[derive(Debug, Serialize)]
pub struct ProjectSummary {
    pub name: String,
    pub description: String,
    pub status: String,
}

/// Root context plus a summary of every project.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceOverview {
    pub context_file: String,
    /// `None` (JSON `null`) when the root context file is missing.
    pub context: Option<String>,
    pub projects: Vec<ProjectSummary>,
}

#[derive(Debug, Serialize)]
pub struct ProjectListing {
    pub name: String,
    pub description: String,
    pub status: String,
    pub repos: Vec<RepoConfig>,
}

#[derive(Debug, Serialize)]
pub struct ProjectList {
    pub projects: Vec<ProjectListing>,
}

pub async fn workspace_overview(workspace: &Path) -> WorkspaceOverview {
    let context_file = context_filename(workspace).await;
    let context = read_text_file(&workspace.join(&context_file)).await;
    let projects = list_projects(workspace)
        .await
        .into_iter()
        .map(|p| ProjectSummary {
            name: p.config.name,
            description: p.config.description,
            status: p.config.status,
        })
        .collect();

    WorkspaceOverview {
        context_file,
        context,
        projects,
    }
}

pub async fn project_list(workspace: &Path) -> ProjectList {
    let projects = list_projects(workspace)
        .await
        .into_iter()
        .map(|p| ProjectListing {
            name: p.config.name,
            description: p.config.description,
            status: p.config.status,
            repos: p.config.repos,
        })
        .collect();

    ProjectList { projects }
}

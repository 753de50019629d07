//! Single-project query.

use serde::Serialize;
use std::path::Path;

use crate::config::{read_project_config, ProjectConfig};
use crate::workspace::projects::{context_filename, read_text_file, HUMANS_FILE, PROJECTS_DIR};

#[derive(Debug, Serialize)]
pub struct ProjectDetails {
    pub project: String,
    pub context: Option<String>,
    pub humans: Option<String>,
    pub metadata: Option<ProjectConfig>,
}

#[derive(Debug)]
pub enum ProjectLookup {
    Found(ProjectDetails),
    /// Carries the user-facing message.
    NotFound(String),
}

/// Look up `name` under `projects/`.
///
/// A project exists if it has either a valid `dunelin.json` or a context
/// file. Names that would escape `projects/` are never found.
pub async fn project_details(workspace: &Path, name: &str) -> ProjectLookup {
    let not_found = || ProjectLookup::NotFound(format!("Project \"{}\" not found.", name));

    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return not_found();
    }

    let project_dir = workspace.join(PROJECTS_DIR).join(name);
    let context_file = context_filename(workspace).await;
    let context = read_text_file(&project_dir.join(&context_file)).await;
    let humans = read_text_file(&project_dir.join(HUMANS_FILE)).await;
    let metadata = read_project_config(&project_dir).await;

    if metadata.is_none() && context.is_none() {
        return not_found();
    }

    ProjectLookup::Found(ProjectDetails {
        project: name.to_string(),
        context,
        humans,
        metadata,
    })
}

//! Workspace and project configuration records.
//!
//! Both records are persisted as camelCase JSON. Parsing goes through a
//! pure validation step so that defaults are applied explicitly and a
//! malformed file can be reported as a value instead of a panic or a
//! deserializer error deep inside serde.

mod store;
mod validation;

pub use store::{
    read_project_config, read_workspace_config, update_workspace_config, ConfigPatch,
};

use serde::Serialize;

/// Default context file name.
pub const DEFAULT_CONTEXT_FILE: &str = "CLAUDE.md";

/// Default config schema version.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Ignore patterns used when a workspace does not override `updateIgnore`.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &["**/repos"];

/// Workspace-level configuration (`.dunelin/config.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    pub version: String,
    pub context_file: String,
    pub template: Option<String>,
    pub template_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_ignore: Option<Vec<String>>,
}

impl WorkspaceConfig {
    /// Whether the workspace was created with a shadow repository.
    pub fn has_shadow_flag(&self) -> bool {
        self.shadow.unwrap_or(false)
    }

    /// Ignore patterns for diff/copy, falling back to [`DEFAULT_IGNORE_PATTERNS`].
    pub fn ignore_patterns(&self) -> Vec<String> {
        match &self.update_ignore {
            Some(patterns) => patterns.clone(),
            None => DEFAULT_IGNORE_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

/// A code repository attached to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoConfig {
    pub name: String,
    pub url: String,
}

/// Project-level metadata (`projects/<name>/dunelin.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectConfig {
    pub name: String,
    pub description: String,
    pub status: String,
    pub repos: Vec<RepoConfig>,
    pub tags: Vec<String>,
}

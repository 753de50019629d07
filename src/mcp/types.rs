//! MCP tool parameter types.
//!
//! These types are used with rmcp's `Parameters<T>` wrapper for automatic
//! deserialization and JSON schema generation.

use schemars::JsonSchema;
use serde::Deserialize;

/// Parameters for the dunelin_get_workspace tool (no arguments needed)
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetWorkspaceArgs {}

/// Parameters for the dunelin_get_project tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetProjectArgs {
    /// Project name (folder name under projects/)
    pub project: String,
}

/// Parameters for the dunelin_list_projects tool (no arguments needed)
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListProjectsArgs {}

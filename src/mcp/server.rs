//! MCP server implementation.
//!
//! This module contains the DunelinMcpServer struct and its tool routing.

use rmcp::{
    handler::server::router::tool::ToolRouter, handler::server::wrapper::Parameters, model::*,
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::tools::{self, ProjectLookup};
use super::types::*;

/// Dunelin MCP Server
#[derive(Clone)]
pub struct DunelinMcpServer {
    workspace: PathBuf,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl DunelinMcpServer {
    pub fn new(workspace: PathBuf) -> Self {
        Self {
            workspace,
            tool_router: Self::tool_router(),
        }
    }

    #[cfg(test)]
    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Root context and project summaries
    #[tool(
        name = "dunelin_get_workspace",
        description = "Returns the root workspace context file content and a list of all projects with their name, description, and status."
    )]
    async fn get_workspace(
        &self,
        Parameters(_): Parameters<GetWorkspaceArgs>,
    ) -> Result<CallToolResult, McpError> {
        debug!("dunelin_get_workspace");
        tools::json_result(&tools::workspace_overview(&self.workspace).await)
    }

    /// One project's context, team file and metadata
    #[tool(
        name = "dunelin_get_project",
        description = "Returns a specific project's context file content, HUMANS.md content, and dunelin.json metadata including repos, status, and tags."
    )]
    async fn get_project(
        &self,
        Parameters(args): Parameters<GetProjectArgs>,
    ) -> Result<CallToolResult, McpError> {
        debug!("dunelin_get_project: {}", args.project);
        match tools::project_details(&self.workspace, &args.project).await {
            ProjectLookup::Found(details) => tools::json_result(&details),
            ProjectLookup::NotFound(message) => {
                let body = serde_json::json!({ "error": message });
                Ok(CallToolResult::success(vec![Content::text(body.to_string())]))
            }
        }
    }

    /// All projects with their repos
    #[tool(
        name = "dunelin_list_projects",
        description = "Lists all projects in the workspace with their name, description, status, and repos."
    )]
    async fn list_projects(
        &self,
        Parameters(_): Parameters<ListProjectsArgs>,
    ) -> Result<CallToolResult, McpError> {
        debug!("dunelin_list_projects");
        tools::json_result(&tools::project_list(&self.workspace).await)
    }
}

#[tool_handler]
impl ServerHandler for DunelinMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "dunelin".to_string(),
                title: None,
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Dunelin MCP Server provides read-only access to workspace and project context."
                    .to_string(),
            ),
        }
    }
}

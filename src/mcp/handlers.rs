//! MCP server handlers.
//!
//! This module contains only the MCP server startup logic.

use anyhow::Result;
use std::path::PathBuf;
use tracing::{error, info};

use super::server::DunelinMcpServer;

/// Run the MCP server over stdio for `workspace`.
///
/// The workspace path is resolved by the CLI before the server starts and
/// stays fixed for the life of the process.
pub async fn run_mcp_server(workspace: PathBuf) -> Result<()> {
    info!("Starting Dunelin MCP server for {}", workspace.display());

    let server = DunelinMcpServer::new(workspace);

    run_server(server).await
}

/// Run the MCP server with the given server instance.
async fn run_server(server: DunelinMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    let service = server.serve(stdio()).await.map_err(|e| {
        error!("Failed to start MCP service: {:?}", e);
        anyhow::anyhow!("Failed to start MCP service: {:?}", e)
    })?;
    info!("MCP server ready on stdio");

    service.waiting().await.map_err(|e| {
        error!("MCP service error: {:?}", e);
        anyhow::anyhow!("MCP service error: {:?}", e)
    })?;

    info!("MCP server shutting down");
    Ok(())
}

use anyhow::Result;
use std::path::Path;
use tracing::warn;

use crate::mcp::run_mcp_server;
use crate::workspace::projects::is_workspace;

/// `dunelin mcp`: serve read-only workspace queries over stdio.
pub async fn run_mcp(workspace: &Path) -> Result<()> {
    if !is_workspace(workspace).await {
        // Still serve; every query degrades to empty results.
        warn!("{} has no Dunelin config", workspace.display());
    }
    run_mcp_server(workspace.to_path_buf()).await
}

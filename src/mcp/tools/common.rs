//! Common utilities for MCP tools.

use rmcp::{model::*, ErrorData as McpError};
use serde::Serialize;

/// Render `value` as a pretty-printed JSON text result.
pub fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Failed to encode result: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

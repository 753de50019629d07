//! MCP tool implementations.
//!
//! Each query returns a plain serde value; the server renders it to text
//! content. Keeping the queries free of rmcp types lets them be tested
//! directly against a temporary workspace.

mod common;
mod project;
mod workspace;

pub use common::json_result;
pub use project::{project_details, ProjectLookup};
pub use workspace::{project_list, workspace_overview};

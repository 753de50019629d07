//! MCP (Model Context Protocol) server implementation using rmcp.
//!
//! The server exposes read-only queries over a Dunelin workspace: the root
//! context, a single project, and the project list. It never writes.

mod handlers;
mod server;
mod tools;
pub mod types;

pub use handlers::run_mcp_server;

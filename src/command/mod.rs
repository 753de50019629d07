mod init;
mod mcp;
mod prompt;
mod update;

pub use init::{run_init, InitOptions};
pub use mcp::run_mcp;
pub use update::run_update;

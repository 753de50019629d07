mod args;
mod paths;

pub use args::{Cli, Commands};
pub use paths::{resolve_target_dir, resolve_workspace, workspace_name};

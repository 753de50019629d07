use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Dunelin - scaffold and manage agentic workspaces
#[derive(Parser)]
#[command(name = "dunelin")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Workspace root (defaults to the current directory)
    #[arg(short = 'w', long, global = true, env = "DUNELIN_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up a new workspace (interactive)
    Init {
        /// Create the workspace in ./NAME instead of the current directory
        name: Option<String>,

        /// Git URL of a workspace template
        #[arg(long, conflicts_with = "builtin")]
        template_url: Option<String>,

        /// Use the built-in base template
        #[arg(long)]
        builtin: bool,

        /// Your name (built-in template)
        #[arg(long)]
        user_name: Option<String>,

        /// Your role (built-in template)
        #[arg(long)]
        role: Option<String>,

        /// Context file name, e.g. CLAUDE.md or .cursorrules (built-in template)
        #[arg(long)]
        context_file: Option<String>,
    },
    /// Pull latest context from the shadow repo
    Update {
        /// Apply all changes without prompting
        #[arg(short, long)]
        yes: bool,
    },
    /// Start the MCP server (stdio)
    Mcp,
}

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod command;
mod config;
mod git;
mod mcp;
mod sync;
mod workspace;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the MCP transport.
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Init {
            name,
            template_url,
            builtin,
            user_name,
            role,
            context_file,
        }) => {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            let options = command::InitOptions {
                name,
                template_url,
                builtin,
                user_name,
                role,
                context_file,
            };
            command::run_init(&cwd, options).await?;
        }
        Some(Commands::Update { yes }) => {
            let workspace = cli::resolve_workspace(cli.workspace)?;
            command::run_update(&workspace, yes).await?;
        }
        Some(Commands::Mcp) => {
            let workspace = cli::resolve_workspace(cli.workspace)?;
            command::run_mcp(&workspace).await?;
        }
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            eprintln!("Use 'dunelin init' to set up a workspace or 'dunelin mcp' to start the MCP server.");
        }
    }

    Ok(())
}

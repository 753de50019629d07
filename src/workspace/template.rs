//! Built-in workspace template.
//!
//! The files are compiled into the binary so scaffolding never needs network
//! or filesystem lookups.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use super::projects::PROJECTS_DIR;
use crate::config::DEFAULT_CONTEXT_FILE;

/// A file to write, relative to the workspace root.
#[derive(Debug, Clone, Copy)]
pub struct TemplateFile {
    pub path: &'static str,
    pub content: &'static str,
}

/// Values substituted into template placeholders.
#[derive(Debug, Clone)]
pub struct TemplateVars {
    pub workspace_name: String,
    pub user_name: String,
    pub user_role: String,
}

pub const BASE_TEMPLATE: &[TemplateFile] = &[
    TemplateFile {
        path: "CLAUDE.md",
        content: r#"# {Workspace Name}

## Me
{Name}, {Role}.

## Projects
| Name | Description | Status |
|------|-------------|--------|

> Each project has its own context file in projects/{name}/

## Terms
| Term | Meaning |
|------|---------|

## Tools & Integrations
| Tool | Used for |
|------|----------|
| Dunelin | Workspace scaffolding and context management |
"#,
    },
    TemplateFile {
        path: ".mcp.json",
        content: r#"{
  "mcpServers": {
    "dunelin": {
      "command": "dunelin",
      "args": ["mcp"],
      "env": {
        "DUNELIN_WORKSPACE": "."
      }
    }
  }
}
"#,
    },
    TemplateFile {
        path: "projects/example/CLAUDE.md",
        content: r#"# Example Project

## Overview
This is an example project showing the dunelin workspace structure. Replace or delete this folder and create your own projects.

**Status:** Active
**Repo(s):** See [dunelin.json](./dunelin.json) for repository metadata.

## Architecture
[To be filled]

## Tech Stack
[To be filled]

## Key Concepts
| Term | Meaning |
|------|---------|

## Project Files
- [HUMANS.md](./HUMANS.md) — team members working on this project
- [dunelin.json](./dunelin.json) — project metadata (repos, status, tags)
- [changelog/](./changelog/) — decision log and session summaries
"#,
    },
    TemplateFile {
        path: "projects/example/HUMANS.md",
        content: r#"# Example Project — Team

## Members
| Name | Role | Email |
|------|------|-------|

## Working Preferences
- [To be filled]
"#,
    },
    TemplateFile {
        path: "projects/example/dunelin.json",
        content: r#"{
  "name": "example",
  "description": "Example project showing the dunelin structure",
  "status": "active",
  "repos": [],
  "tags": []
}
"#,
    },
    TemplateFile {
        path: "projects/example/changelog/.gitkeep",
        content: "",
    },
];

/// Substitute `{Workspace Name}`, `{Name}` and `{Role}`.
pub fn render(content: &str, vars: &TemplateVars) -> String {
    content
        .replace("{Workspace Name}", &vars.workspace_name)
        .replace("{Name}", &vars.user_name)
        .replace("{Role}", &vars.user_role)
}

fn should_render(path: &str) -> bool {
    path.ends_with(".md") || path.ends_with(".json")
}

/// Write `files` under `dest`, rendering markdown and JSON files.
pub async fn write_template(files: &[TemplateFile], dest: &Path, vars: &TemplateVars) -> Result<()> {
    tokio::fs::create_dir_all(dest)
        .await
        .with_context(|| format!("Failed to create {}", dest.display()))?;

    for file in files {
        let target = dest.join(file.path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = if should_render(file.path) {
            render(file.content, vars)
        } else {
            file.content.to_string()
        };
        tokio::fs::write(&target, content)
            .await
            .with_context(|| format!("Failed to write {}", target.display()))?;
        debug!("Wrote template file {}", file.path);
    }
    Ok(())
}

async fn rename_if_present(from: &Path, to: &Path) -> Result<()> {
    if tokio::fs::try_exists(from).await.unwrap_or(false) {
        tokio::fs::rename(from, to)
            .await
            .with_context(|| format!("Failed to rename {} to {}", from.display(), to.display()))?;
    }
    Ok(())
}

/// Rename the root and per-project `CLAUDE.md` files to `new_name`.
pub async fn rename_context_files(workspace: &Path, new_name: &str) -> Result<()> {
    if new_name == DEFAULT_CONTEXT_FILE {
        return Ok(());
    }
    rename_if_present(
        &workspace.join(DEFAULT_CONTEXT_FILE),
        &workspace.join(new_name),
    )
    .await?;

    let Ok(mut entries) = tokio::fs::read_dir(workspace.join(PROJECTS_DIR)).await else {
        return Ok(());
    };
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            let dir = entry.path();
            rename_if_present(&dir.join(DEFAULT_CONTEXT_FILE), &dir.join(new_name)).await?;
        }
    }
    Ok(())
}

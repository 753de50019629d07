//! Managed block inside a workspace context file.
//!
//! The block sits between two HTML comment markers so it can be refreshed
//! in place without touching user-authored content around it.

use std::io;
use std::path::Path;

pub const START_MARKER: &str = "<!-- dunelin:start -->";
pub const END_MARKER: &str = "<!-- dunelin:end -->";

/// Build the block text for a workspace with or without a shadow repo.
pub fn generate_block(shadow: bool) -> String {
    let version = env!("CARGO_PKG_VERSION");
    let mut block = format!(
        "{START_MARKER}
> **Dunelin v{version}** — This block is managed by Dunelin and updated automatically.
> If you see another dunelin block in this file, please remove it (keep this one).

## Workspace Management
This workspace is managed by Dunelin. Configuration lives in `.dunelin/config.json`.

An MCP server is configured in `.mcp.json` — AI tools can query workspace structure programmatically:
- `dunelin_get_workspace` — root context + project list
- `dunelin_get_project` — project context, team, metadata
- `dunelin_list_projects` — all projects overview
"
    );

    if shadow {
        block.push_str(
            "
## Context Persistence
This workspace uses a **shadow repo** (`.dunelin/shadow/`) to version and share context via git.

**When you update context files** (CLAUDE.md, HUMANS.md, changelog entries):
1. Edit the file inside `.dunelin/shadow/` — this is the canonical copy
2. Commit: `cd .dunelin/shadow && git add -A && git commit -m \"update context\"`
3. Push: `git push`
4. Run `dunelin update` to sync changes to workspace root

Never edit context files at workspace root directly — they get overwritten by `dunelin update`.
",
        );
    } else {
        block.push_str(
            "
## Context Persistence
This workspace does not have a shadow repo. Edit context files directly at workspace root.
To enable versioned context, recreate this workspace from a git template (`dunelin init`).
",
        );
    }

    let shadow_line = if shadow {
        "\n.dunelin/shadow/                  — shadow repo (versioned context)"
    } else {
        ""
    };
    block.push_str(&format!(
        "
## Workspace Structure
```
.dunelin/config.json              — workspace config (managed by dunelin){shadow_line}
projects/{{name}}/CLAUDE.md         — project context
projects/{{name}}/HUMANS.md         — project team
projects/{{name}}/dunelin.json      — project metadata (repos, status, tags)
projects/{{name}}/changelog/        — decision log
projects/{{name}}/repos/            — code repositories (cloned or linked)
```
{END_MARKER}"
    ));

    block
}

/// Replace the existing block in `content`, or append one.
pub fn apply_block(content: &str, block: &str) -> String {
    if let (Some(start), Some(end)) = (content.find(START_MARKER), content.find(END_MARKER)) {
        if start < end {
            let tail = &content[end + END_MARKER.len()..];
            return format!("{}{}{}", &content[..start], block, tail);
        }
    }
    format!("{}\n\n{}\n", content.trim_end(), block)
}

/// Inject or refresh the block in the file at `path`.
///
/// Returns `Ok(false)` without writing when the file does not exist.
pub async fn inject_block(path: &Path, shadow: bool) -> io::Result<bool> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    let updated = apply_block(&content, &generate_block(shadow));
    tokio::fs::write(path, updated).await?;
    Ok(true)
}

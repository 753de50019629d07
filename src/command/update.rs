use anyhow::{bail, Result};
use std::path::Path;

use super::prompt::{plural, Prompter};
use crate::config::read_workspace_config;
use crate::git::SystemGit;
use crate::sync::{ChangeSelector, Selection, ShadowSync, SyncOutcome};
use crate::workspace::FileChange;

/// One line per change: `+ path (added)` or `~ path (modified)`.
pub fn format_change(change: &FileChange) -> String {
    format!("{} {} ({})", change.kind.symbol(), change.path, change.kind)
}

/// Asks the operator which shadow changes to apply.
pub struct InteractiveSelector {
    /// Apply everything without prompting.
    pub assume_yes: bool,
}

impl ChangeSelector for InteractiveSelector {
    fn select(&self, changes: &[FileChange]) -> Result<Selection> {
        println!("Found {} change{}:", changes.len(), plural(changes.len()));
        for change in changes {
            println!("  {}", format_change(change));
        }

        if self.assume_yes {
            return Ok(Selection::All);
        }

        let prompter = Prompter::new();
        let choice = prompter.select("Apply changes?", &["Apply all", "Let me pick", "Skip"])?;
        match choice {
            Some(0) => Ok(Selection::All),
            Some(1) => {
                let labels: Vec<String> = changes.iter().map(format_change).collect();
                let picked = prompter.multi_select("Which files to apply?", &labels)?;
                Ok(match picked {
                    Some(indices) => Selection::Paths(
                        indices
                            .into_iter()
                            .filter_map(|i| changes.get(i))
                            .map(|c| c.path.clone())
                            .collect(),
                    ),
                    None => Selection::Cancel,
                })
            }
            _ => Ok(Selection::Cancel),
        }
    }
}

/// `dunelin update`: pull the shadow and merge selected changes.
pub async fn run_update(workspace: &Path, assume_yes: bool) -> Result<()> {
    let Some(config) = read_workspace_config(workspace).await else {
        bail!("Not a Dunelin workspace. Run `dunelin init` first.");
    };

    let git = SystemGit;
    let selector = InteractiveSelector { assume_yes };
    let mut sync = ShadowSync::new(workspace, &config, &git, &selector);

    match sync.run().await? {
        SyncOutcome::NoShadow => {
            println!("No shadow repo. This workspace was created from a built-in template.");
            println!("To use `dunelin update`, create your workspace from a git template.");
            println!("Nothing to update.");
        }
        SyncOutcome::UpToDate => println!("Workspace is up to date."),
        SyncOutcome::Cancelled { .. } => println!("Update skipped."),
        SyncOutcome::Applied { report, .. } => {
            let count = report.copied.len();
            println!("Applied {} file{}.", count, plural(count));
            println!("Workspace updated.");
        }
    }
    Ok(())
}

//! Git remote operations.
//!
//! Everything goes through the system `git` binary so the user's existing
//! credentials (ssh agent, credential helpers) apply unchanged. This module
//! only ever clones and pulls; it never commits or pushes.

use std::future::Future;
use std::io;
use std::path::Path;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::RepoConfig;

/// Failure of a git invocation.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] io::Error),
    #[error("git {command} failed: {stderr}")]
    Command { command: String, stderr: String },
}

/// Pulls upstream history into an existing working copy.
pub trait RemotePull {
    fn pull(&self, repo_dir: &Path) -> impl Future<Output = Result<(), GitError>> + Send;
}

/// [`RemotePull`] backed by the system `git` binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemGit;

impl SystemGit {
    async fn run(args: &[&str], cwd: Option<&Path>) -> Result<(), GitError> {
        let mut cmd = Command::new("git");
        cmd.args(args).kill_on_drop(true);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        debug!("Running git {}", args.join(" "));

        let output = cmd.output().await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(GitError::Command {
                command: args.first().copied().unwrap_or_default().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    /// Clone `url` into `target`, creating parent directories first.
    pub async fn clone(&self, url: &str, target: &Path) -> Result<(), GitError> {
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let target_str = target.to_string_lossy();
        Self::run(&["clone", "--quiet", url, &target_str], None).await?;
        info!("Cloned {} into {}", url, target.display());
        Ok(())
    }
}

impl RemotePull for SystemGit {
    async fn pull(&self, repo_dir: &Path) -> Result<(), GitError> {
        Self::run(&["pull", "--quiet"], Some(repo_dir)).await?;
        info!("Pulled latest changes into {}", repo_dir.display());
        Ok(())
    }
}

/// Outcome of cloning one project repository.
#[derive(Debug, Clone)]
pub struct CloneReport {
    pub name: String,
    pub error: Option<String>,
}

impl CloneReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Clone each repo into `project_dir/repos/<name>`.
///
/// A failing clone is recorded and the remaining repos are still attempted.
pub async fn clone_project_repos(
    git: &SystemGit,
    project_dir: &Path,
    repos: &[RepoConfig],
) -> Vec<CloneReport> {
    let repos_dir = project_dir.join("repos");
    let mut reports = Vec::with_capacity(repos.len());

    for repo in repos {
        let target = repos_dir.join(&repo.name);
        let error = match git.clone(&repo.url, &target).await {
            Ok(()) => None,
            Err(e) => {
                warn!("Failed to clone {}: {}", repo.url, e);
                Some(e.to_string())
            }
        };
        reports.push(CloneReport {
            name: repo.name.clone(),
            error,
        });
    }

    reports
}

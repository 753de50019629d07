use anyhow::Result;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

use super::SyncError;
use crate::config::{update_workspace_config, ConfigPatch, WorkspaceConfig};
use crate::git::RemotePull;
use crate::workspace::{
    copy_from_shadow, diff_trees, has_shadow, shadow_path, CopyReport, FileChange, IgnoreMatcher,
};

/// The operator's answer to a proposed change set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Apply every change.
    All,
    /// Apply only these relative paths.
    Paths(Vec<String>),
    /// Apply nothing.
    Cancel,
}

/// Decides which changes to apply. Implemented by the interactive prompt in
/// the CLI and by fixed answers in tests.
pub trait ChangeSelector {
    fn select(&self, changes: &[FileChange]) -> Result<Selection>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Pulling,
    Diffing,
    AwaitingSelection,
    Copying,
    Done,
    Error,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncPhase::Idle => "idle",
            SyncPhase::Pulling => "pulling",
            SyncPhase::Diffing => "diffing",
            SyncPhase::AwaitingSelection => "awaiting-selection",
            SyncPhase::Copying => "copying",
            SyncPhase::Done => "done",
            SyncPhase::Error => "error",
        };
        f.write_str(name)
    }
}

/// Result of a completed (non-failing) sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The workspace has no shadow repository; nothing to sync.
    NoShadow,
    /// Shadow and workspace already agree.
    UpToDate,
    /// Changes were found but the operator chose not to apply any.
    Cancelled { changes: Vec<FileChange> },
    /// The selected changes were written to the workspace.
    Applied {
        changes: Vec<FileChange>,
        report: CopyReport,
    },
}

/// One sync run over a workspace.
///
/// The workspace path and config are passed in explicitly; nothing here
/// consults the environment or the current directory.
pub struct ShadowSync<'a, R, S> {
    workspace: &'a Path,
    config: &'a WorkspaceConfig,
    remote: &'a R,
    selector: &'a S,
    phase: SyncPhase,
}

impl<'a, R: RemotePull, S: ChangeSelector> ShadowSync<'a, R, S> {
    pub fn new(
        workspace: &'a Path,
        config: &'a WorkspaceConfig,
        remote: &'a R,
        selector: &'a S,
    ) -> Self {
        Self {
            workspace,
            config,
            remote,
            selector,
            phase: SyncPhase::Idle,
        }
    }

    /// Current phase; `Done` or `Error` once [`run`](Self::run) returns.
    #[cfg(test)]
    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    fn enter(&mut self, phase: SyncPhase) {
        debug!("Sync phase: {} -> {}", self.phase, phase);
        self.phase = phase;
    }

    fn fail(&mut self, err: SyncError) -> SyncError {
        self.enter(SyncPhase::Error);
        err
    }

    /// Drive the sync to completion.
    pub async fn run(&mut self) -> Result<SyncOutcome, SyncError> {
        if !self.config.has_shadow_flag() || !has_shadow(self.workspace) {
            info!("No shadow repository in {}", self.workspace.display());
            self.enter(SyncPhase::Done);
            return Ok(SyncOutcome::NoShadow);
        }
        let shadow = shadow_path(self.workspace);

        self.enter(SyncPhase::Pulling);
        if let Err(e) = self.remote.pull(&shadow).await {
            return Err(self.fail(SyncError::Remote(e)));
        }

        self.enter(SyncPhase::Diffing);
        let patterns = self.config.ignore_patterns();
        let ignore = IgnoreMatcher::new(patterns.as_slice());
        debug!("Diffing with {} ignore pattern(s)", ignore.len());
        let changes = match diff_trees(&shadow, self.workspace, &ignore).await {
            Ok(c) => c,
            Err(e) => return Err(self.fail(e.into())),
        };
        info!("Found {} change(s) in shadow", changes.len());

        if changes.is_empty() {
            self.enter(SyncPhase::Done);
            return Ok(SyncOutcome::UpToDate);
        }

        self.enter(SyncPhase::AwaitingSelection);
        let selection = match self.selector.select(&changes) {
            Ok(s) => s,
            Err(e) => return Err(self.fail(SyncError::Prompt(e.to_string()))),
        };
        let paths: Vec<String> = match selection {
            Selection::All => changes.iter().map(|c| c.path.clone()).collect(),
            Selection::Paths(paths) if !paths.is_empty() => paths,
            Selection::Paths(_) | Selection::Cancel => {
                info!("Sync cancelled by selection");
                self.enter(SyncPhase::Done);
                return Ok(SyncOutcome::Cancelled { changes });
            }
        };

        self.enter(SyncPhase::Copying);
        let report = match copy_from_shadow(&shadow, self.workspace, &ignore, Some(&paths)).await {
            Ok(r) => r,
            Err(e) => return Err(self.fail(e.into())),
        };
        info!("Applied {} file(s) from shadow", report.copied.len());

        if let Err(e) = update_workspace_config(self.workspace, ConfigPatch::default()).await {
            warn!("Failed to refresh workspace timestamp: {:#}", e);
        }

        self.enter(SyncPhase::Done);
        Ok(SyncOutcome::Applied { changes, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::GitError;
    use crate::workspace::ChangeKind;
    use std::cell::{Cell, RefCell};
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeRemote {
        fail: bool,
        pulls: AtomicUsize,
    }

    impl RemotePull for FakeRemote {
        async fn pull(&self, repo_dir: &Path) -> Result<(), GitError> {
            assert!(repo_dir.ends_with(".dunelin/shadow"));
            self.pulls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(GitError::Command {
                    command: "pull".into(),
                    stderr: "fatal: could not read from remote repository".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    struct FixedSelector {
        answer: Selection,
        calls: Cell<usize>,
        seen: RefCell<Vec<FileChange>>,
    }

    impl FixedSelector {
        fn new(answer: Selection) -> Self {
            Self {
                answer,
                calls: Cell::new(0),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl ChangeSelector for FixedSelector {
        fn select(&self, changes: &[FileChange]) -> Result<Selection> {
            self.calls.set(self.calls.get() + 1);
            *self.seen.borrow_mut() = changes.to_vec();
            Ok(self.answer.clone())
        }
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn config(shadow: Option<bool>) -> WorkspaceConfig {
        WorkspaceConfig {
            version: "1.0.0".into(),
            context_file: "CLAUDE.md".into(),
            template: Some("custom".into()),
            template_url: Some("git@github.com:acme/template.git".into()),
            created_at: "2024-01-01T00:00:00Z".into(),
            updated_at: "2024-01-01T00:00:00Z".into(),
            shadow,
            update_ignore: None,
        }
    }

    /// Workspace with a shadow holding one modified and one added file.
    fn workspace_with_changes() -> TempDir {
        let temp = TempDir::new().unwrap();
        let ws = temp.path();
        let shadow = shadow_path(ws);
        fs::create_dir_all(shadow.join(".git")).unwrap();
        write(&shadow, "CLAUDE.md", "v2");
        write(ws, "CLAUDE.md", "v1");
        write(&shadow, "projects/api/HUMANS.md", "team");
        write(&shadow, "projects/api/repos/server/x.rs", "upstream");
        write(ws, "projects/api/repos/server/x.rs", "local");
        temp
    }

    #[tokio::test]
    async fn test_no_shadow_flag_is_nothing_to_sync() {
        let temp = workspace_with_changes();
        let remote = FakeRemote::default();
        let selector = FixedSelector::new(Selection::All);
        let cfg = config(None);

        let mut sync = ShadowSync::new(temp.path(), &cfg, &remote, &selector);
        assert_eq!(sync.phase(), SyncPhase::Idle);
        let outcome = sync.run().await.unwrap();

        assert_eq!(outcome, SyncOutcome::NoShadow);
        assert_eq!(remote.pulls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_shadow_dir_without_git_is_nothing_to_sync() {
        let temp = TempDir::new().unwrap();
        write(&shadow_path(temp.path()), "CLAUDE.md", "x");
        let remote = FakeRemote::default();
        let selector = FixedSelector::new(Selection::All);
        let cfg = config(Some(true));

        let outcome = ShadowSync::new(temp.path(), &cfg, &remote, &selector)
            .run()
            .await
            .unwrap();
        assert_eq!(outcome, SyncOutcome::NoShadow);
    }

    #[tokio::test]
    async fn test_pull_failure_is_remote_error() {
        let temp = workspace_with_changes();
        let remote = FakeRemote {
            fail: true,
            ..Default::default()
        };
        let selector = FixedSelector::new(Selection::All);
        let cfg = config(Some(true));

        let mut sync = ShadowSync::new(temp.path(), &cfg, &remote, &selector);
        let err = sync.run().await.unwrap_err();

        assert!(matches!(err, SyncError::Remote(_)));
        assert!(err.to_string().contains("could not read from remote"));
        assert_eq!(sync.phase(), SyncPhase::Error);
        assert_eq!(selector.calls.get(), 0);
        // Nothing copied
        assert_eq!(fs::read_to_string(temp.path().join("CLAUDE.md")).unwrap(), "v1");
    }

    #[tokio::test]
    async fn test_up_to_date_skips_selection() {
        let temp = TempDir::new().unwrap();
        let shadow = shadow_path(temp.path());
        fs::create_dir_all(shadow.join(".git")).unwrap();
        write(&shadow, "CLAUDE.md", "same");
        write(temp.path(), "CLAUDE.md", "same");
        let remote = FakeRemote::default();
        let selector = FixedSelector::new(Selection::All);
        let cfg = config(Some(true));

        let mut sync = ShadowSync::new(temp.path(), &cfg, &remote, &selector);
        let outcome = sync.run().await.unwrap();

        assert_eq!(outcome, SyncOutcome::UpToDate);
        assert_eq!(sync.phase(), SyncPhase::Done);
        assert_eq!(remote.pulls.load(Ordering::SeqCst), 1);
        assert_eq!(selector.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_apply_all() {
        let temp = workspace_with_changes();
        let remote = FakeRemote::default();
        let selector = FixedSelector::new(Selection::All);
        let cfg = config(Some(true));

        let mut sync = ShadowSync::new(temp.path(), &cfg, &remote, &selector);
        let outcome = sync.run().await.unwrap();

        let expected_changes = vec![
            FileChange::new("CLAUDE.md", ChangeKind::Modified),
            FileChange::new("projects/api/HUMANS.md", ChangeKind::Added),
        ];
        assert_eq!(*selector.seen.borrow(), expected_changes);
        match outcome {
            SyncOutcome::Applied { changes, report } => {
                assert_eq!(changes, expected_changes);
                assert_eq!(report.copied, vec!["CLAUDE.md", "projects/api/HUMANS.md"]);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(sync.phase(), SyncPhase::Done);
        assert_eq!(fs::read_to_string(temp.path().join("CLAUDE.md")).unwrap(), "v2");
        assert_eq!(
            fs::read_to_string(temp.path().join("projects/api/repos/server/x.rs")).unwrap(),
            "local"
        );
        // Timestamp refresh writes the primary config
        assert!(temp.path().join(".dunelin/config.json").exists());
    }

    #[tokio::test]
    async fn test_apply_subset() {
        let temp = workspace_with_changes();
        let remote = FakeRemote::default();
        let selector =
            FixedSelector::new(Selection::Paths(vec!["projects/api/HUMANS.md".to_string()]));
        let cfg = config(Some(true));

        let outcome = ShadowSync::new(temp.path(), &cfg, &remote, &selector)
            .run()
            .await
            .unwrap();

        let SyncOutcome::Applied { report, .. } = outcome else {
            panic!("expected applied outcome");
        };
        assert_eq!(report.copied, vec!["projects/api/HUMANS.md"]);
        assert!(report.skipped.contains(&"CLAUDE.md".to_string()));
        assert_eq!(fs::read_to_string(temp.path().join("CLAUDE.md")).unwrap(), "v1");
    }

    #[tokio::test]
    async fn test_cancel_and_empty_pick_copy_nothing() {
        for answer in [Selection::Cancel, Selection::Paths(Vec::new())] {
            let temp = workspace_with_changes();
            let remote = FakeRemote::default();
            let selector = FixedSelector::new(answer);
            let cfg = config(Some(true));

            let mut sync = ShadowSync::new(temp.path(), &cfg, &remote, &selector);
            let outcome = sync.run().await.unwrap();

            assert!(matches!(outcome, SyncOutcome::Cancelled { ref changes } if changes.len() == 2));
            assert_eq!(sync.phase(), SyncPhase::Done);
            assert!(!temp.path().join("projects/api/HUMANS.md").exists());
        }
    }

    #[tokio::test]
    async fn test_custom_ignore_from_config() {
        let temp = workspace_with_changes();
        let remote = FakeRemote::default();
        let selector = FixedSelector::new(Selection::All);
        let mut cfg = config(Some(true));
        cfg.update_ignore = Some(vec!["projects/**".to_string()]);

        let outcome = ShadowSync::new(temp.path(), &cfg, &remote, &selector)
            .run()
            .await
            .unwrap();

        let SyncOutcome::Applied { changes, .. } = outcome else {
            panic!("expected applied outcome");
        };
        assert_eq!(changes, vec![FileChange::new("CLAUDE.md", ChangeKind::Modified)]);
    }

    #[tokio::test]
    async fn test_selector_failure_is_prompt_error() {
        struct Broken;
        impl ChangeSelector for Broken {
            fn select(&self, _changes: &[FileChange]) -> Result<Selection> {
                anyhow::bail!("terminal closed")
            }
        }

        let temp = workspace_with_changes();
        let remote = FakeRemote::default();
        let cfg = config(Some(true));
        let mut sync = ShadowSync::new(temp.path(), &cfg, &remote, &Broken);
        let err = sync.run().await.unwrap_err();

        assert!(matches!(err, SyncError::Prompt(ref m) if m == "terminal closed"));
        assert_eq!(sync.phase(), SyncPhase::Error);
    }
}

//! Reading and writing config files on disk.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::validation::{validate_project, validate_workspace};
use super::{ProjectConfig, WorkspaceConfig};

/// Primary workspace config location, relative to the workspace root.
pub const PRIMARY_CONFIG_FILE: &str = ".dunelin/config.json";

/// Legacy workspace config location, relative to the workspace root.
/// Also the file name of project-level configs.
pub const LEGACY_CONFIG_FILE: &str = "dunelin.json";

/// Read a JSON file, returning `None` if it is missing or not valid JSON.
async fn read_json(path: &Path) -> Option<Value> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) => {
            debug!("Config not readable at {}: {}", path.display(), e);
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("Ignoring malformed JSON in {}: {}", path.display(), e);
            None
        }
    }
}

async fn read_valid_workspace(path: &Path) -> Option<WorkspaceConfig> {
    let raw = read_json(path).await?;
    match validate_workspace(&raw) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Ignoring invalid workspace config {}: {}", path.display(), e);
            None
        }
    }
}

/// Read the workspace config.
///
/// Looks at [`PRIMARY_CONFIG_FILE`] first and then [`LEGACY_CONFIG_FILE`].
/// Missing, unparsable, or invalid files are treated as absent.
pub async fn read_workspace_config(workspace: &Path) -> Option<WorkspaceConfig> {
    if let Some(config) = read_valid_workspace(&workspace.join(PRIMARY_CONFIG_FILE)).await {
        return Some(config);
    }
    read_valid_workspace(&workspace.join(LEGACY_CONFIG_FILE)).await
}

/// Read a project's `dunelin.json`, treating invalid files as absent.
pub async fn read_project_config(project_dir: &Path) -> Option<ProjectConfig> {
    let path = project_dir.join(LEGACY_CONFIG_FILE);
    let raw = read_json(&path).await?;
    match validate_project(&raw) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Ignoring invalid project config {}: {}", path.display(), e);
            None
        }
    }
}

/// Fields to overlay onto the stored workspace config.
///
/// `None` leaves the stored value untouched. For the nullable string
/// fields, `Some(None)` writes an explicit `null`.
#[derive(Debug, Clone, Default)]
pub struct ConfigPatch {
    pub version: Option<String>,
    pub context_file: Option<String>,
    pub template: Option<Option<String>>,
    pub template_url: Option<Option<String>>,
    pub created_at: Option<String>,
    pub shadow: Option<bool>,
    pub update_ignore: Option<Vec<String>>,
}

impl ConfigPatch {
    fn apply(self, obj: &mut Map<String, Value>) {
        if let Some(v) = self.version {
            obj.insert("version".into(), Value::String(v));
        }
        if let Some(v) = self.context_file {
            obj.insert("contextFile".into(), Value::String(v));
        }
        if let Some(v) = self.template {
            obj.insert("template".into(), v.map_or(Value::Null, Value::String));
        }
        if let Some(v) = self.template_url {
            obj.insert("templateUrl".into(), v.map_or(Value::Null, Value::String));
        }
        if let Some(v) = self.created_at {
            obj.insert("createdAt".into(), Value::String(v));
        }
        if let Some(v) = self.shadow {
            obj.insert("shadow".into(), Value::Bool(v));
        }
        if let Some(v) = self.update_ignore {
            obj.insert(
                "updateIgnore".into(),
                Value::Array(v.into_iter().map(Value::String).collect()),
            );
        }
    }
}

/// Load the raw stored object (primary, then legacy), or an empty one.
async fn load_raw_object(workspace: &Path) -> Map<String, Value> {
    for rel in [PRIMARY_CONFIG_FILE, LEGACY_CONFIG_FILE] {
        if let Some(Value::Object(obj)) = read_json(&workspace.join(rel)).await {
            return obj;
        }
    }
    Map::new()
}

/// Merge `patch` into the stored workspace config and write it to the
/// primary location.
///
/// Unknown keys already present in the file are preserved. `updatedAt` is
/// always refreshed and `createdAt` is filled in if missing or empty.
pub async fn update_workspace_config(workspace: &Path, patch: ConfigPatch) -> Result<PathBuf> {
    let mut obj = load_raw_object(workspace).await;
    patch.apply(&mut obj);

    let now = chrono::Utc::now().to_rfc3339();
    obj.insert("updatedAt".into(), Value::String(now.clone()));
    let has_created = matches!(obj.get("createdAt"), Some(Value::String(s)) if !s.is_empty());
    if !has_created {
        obj.insert("createdAt".into(), Value::String(now));
    }

    let path = workspace.join(PRIMARY_CONFIG_FILE);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let mut content = serde_json::to_string_pretty(&Value::Object(obj))
        .context("Failed to serialize workspace config")?;
    content.push('\n');
    tokio::fs::write(&path, content)
        .await
        .with_context(|| format!("Failed to write workspace config to {}", path.display()))?;

    debug!("Wrote workspace config {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    const VALID: &str = r#"{"createdAt":"c","updatedAt":"u","contextFile":"AGENTS.md"}"#;

    #[tokio::test]
    async fn test_missing_config_is_none() {
        let temp = TempDir::new().unwrap();
        assert!(read_workspace_config(temp.path()).await.is_none());
    }

    #[tokio::test]
    async fn test_reads_primary_location() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), PRIMARY_CONFIG_FILE, VALID);
        let config = read_workspace_config(temp.path()).await.unwrap();
        assert_eq!(config.context_file, "AGENTS.md");
    }

    #[tokio::test]
    async fn test_falls_back_to_legacy_location() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), LEGACY_CONFIG_FILE, VALID);
        let config = read_workspace_config(temp.path()).await.unwrap();
        assert_eq!(config.context_file, "AGENTS.md");
    }

    #[tokio::test]
    async fn test_primary_wins_over_legacy() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), PRIMARY_CONFIG_FILE, VALID);
        write(
            temp.path(),
            LEGACY_CONFIG_FILE,
            r#"{"createdAt":"c","updatedAt":"u","contextFile":"OTHER.md"}"#,
        );
        let config = read_workspace_config(temp.path()).await.unwrap();
        assert_eq!(config.context_file, "AGENTS.md");
    }

    #[tokio::test]
    async fn test_malformed_and_invalid_are_absent() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), PRIMARY_CONFIG_FILE, "{ not json");
        assert!(read_workspace_config(temp.path()).await.is_none());

        write(temp.path(), PRIMARY_CONFIG_FILE, r#"{"contextFile": 3}"#);
        assert!(read_workspace_config(temp.path()).await.is_none());
    }

    #[tokio::test]
    async fn test_update_preserves_unknown_keys_and_sets_timestamps() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            LEGACY_CONFIG_FILE,
            r#"{"contextFile":"CLAUDE.md","custom":42,"createdAt":""}"#,
        );

        let patch = ConfigPatch {
            template: Some(Some("custom".into())),
            template_url: Some(Some("https://example.com/t.git".into())),
            shadow: Some(true),
            ..Default::default()
        };
        let path = update_workspace_config(temp.path(), patch).await.unwrap();
        assert_eq!(path, temp.path().join(PRIMARY_CONFIG_FILE));

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["custom"], 42);
        assert_eq!(raw["template"], "custom");
        assert_eq!(raw["shadow"], true);
        assert!(!raw["createdAt"].as_str().unwrap().is_empty());
        assert!(!raw["updatedAt"].as_str().unwrap().is_empty());

        let config = read_workspace_config(temp.path()).await.unwrap();
        assert!(config.has_shadow_flag());
        assert_eq!(config.template_url.as_deref(), Some("https://example.com/t.git"));
    }

    #[tokio::test]
    async fn test_update_keeps_existing_created_at() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), PRIMARY_CONFIG_FILE, VALID);
        update_workspace_config(temp.path(), ConfigPatch::default())
            .await
            .unwrap();
        let config = read_workspace_config(temp.path()).await.unwrap();
        assert_eq!(config.created_at, "c");
        assert_ne!(config.updated_at, "u");
    }

    #[tokio::test]
    async fn test_read_project_config() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "dunelin.json", r#"{"name":"api","tags":["core"]}"#);
        let project = read_project_config(temp.path()).await.unwrap();
        assert_eq!(project.name, "api");
        assert_eq!(project.tags, vec!["core".to_string()]);

        write(temp.path(), "dunelin.json", r#"{"description":"no name"}"#);
        assert!(read_project_config(temp.path()).await.is_none());
    }
}

//! Schema validation for config records.
//!
//! Each validator takes an already-parsed JSON value and either produces a
//! fully-populated record (missing optional fields get their documented
//! defaults) or a [`ConfigError`] naming the offending field.

use serde_json::{Map, Value};
use thiserror::Error;

use super::{
    ProjectConfig, RepoConfig, WorkspaceConfig, DEFAULT_CONTEXT_FILE, DEFAULT_VERSION,
};

/// Why a config document was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("config root must be a JSON object")]
    NotAnObject,
    #[error("missing required field `{0}`")]
    Missing(&'static str),
    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },
    #[error("repo `{name}` has an invalid url: {url}")]
    InvalidRepoUrl { name: String, url: String },
}

fn wrong_type(field: impl Into<String>, expected: &'static str) -> ConfigError {
    ConfigError::WrongType {
        field: field.into(),
        expected,
    }
}

fn as_object(value: &Value) -> Result<&Map<String, Value>, ConfigError> {
    value.as_object().ok_or(ConfigError::NotAnObject)
}

fn required_string(obj: &Map<String, Value>, field: &'static str) -> Result<String, ConfigError> {
    match obj.get(field) {
        None => Err(ConfigError::Missing(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(wrong_type(field, "a string")),
    }
}

fn string_or(
    obj: &Map<String, Value>,
    field: &'static str,
    default: &str,
) -> Result<String, ConfigError> {
    match obj.get(field) {
        None => Ok(default.to_string()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(wrong_type(field, "a string")),
    }
}

fn nullable_string(
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ConfigError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(wrong_type(field, "a string or null")),
    }
}

fn optional_bool(obj: &Map<String, Value>, field: &'static str) -> Result<Option<bool>, ConfigError> {
    match obj.get(field) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(wrong_type(field, "a boolean")),
    }
}

fn string_array(value: &Value, field: &str) -> Result<Vec<String>, ConfigError> {
    let items = value
        .as_array()
        .ok_or_else(|| wrong_type(field, "an array of strings"))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| wrong_type(field, "an array of strings"))
        })
        .collect()
}

/// Validate a workspace config document.
pub fn validate_workspace(value: &Value) -> Result<WorkspaceConfig, ConfigError> {
    let obj = as_object(value)?;

    let update_ignore = match obj.get("updateIgnore") {
        None => None,
        Some(v) => Some(string_array(v, "updateIgnore")?),
    };

    Ok(WorkspaceConfig {
        version: string_or(obj, "version", DEFAULT_VERSION)?,
        context_file: string_or(obj, "contextFile", DEFAULT_CONTEXT_FILE)?,
        template: nullable_string(obj, "template")?,
        template_url: nullable_string(obj, "templateUrl")?,
        created_at: required_string(obj, "createdAt")?,
        updated_at: required_string(obj, "updatedAt")?,
        shadow: optional_bool(obj, "shadow")?,
        update_ignore,
    })
}

/// A repo url is accepted if it is an absolute URL or an scp-style ssh remote.
fn is_valid_repo_url(url: &str) -> bool {
    url.starts_with("git@") || url::Url::parse(url).is_ok()
}

fn validate_repo(value: &Value) -> Result<RepoConfig, ConfigError> {
    let obj = value
        .as_object()
        .ok_or_else(|| wrong_type("repos", "an array of objects"))?;
    let name = required_string(obj, "name")?;
    let url = required_string(obj, "url")?;
    if !is_valid_repo_url(&url) {
        return Err(ConfigError::InvalidRepoUrl { name, url });
    }
    Ok(RepoConfig { name, url })
}

/// Validate a project config document.
pub fn validate_project(value: &Value) -> Result<ProjectConfig, ConfigError> {
    let obj = as_object(value)?;

    let repos = match obj.get("repos") {
        None => Vec::new(),
        Some(Value::Array(items)) => items.iter().map(validate_repo).collect::<Result<_, _>>()?,
        Some(_) => return Err(wrong_type("repos", "an array of objects")),
    };
    let tags = match obj.get("tags") {
        None => Vec::new(),
        Some(v) => string_array(v, "tags")?,
    };

    Ok(ProjectConfig {
        name: required_string(obj, "name")?,
        description: string_or(obj, "description", "")?,
        status: string_or(obj, "status", "active")?,
        repos,
        tags,
    })
}

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tracing::{info, warn};

use super::prompt::{plural, Prompter};
use crate::config::{
    read_workspace_config, update_workspace_config, ConfigPatch, DEFAULT_CONTEXT_FILE,
    DEFAULT_IGNORE_PATTERNS,
};
use crate::git::{clone_project_repos, SystemGit};
use crate::workspace::block::inject_block;
use crate::workspace::projects::{list_projects_with_repos, ProjectRepos};
use crate::workspace::template::{rename_context_files, write_template, TemplateVars, BASE_TEMPLATE};
use crate::workspace::{copy_from_shadow, shadow_path, CopyReport, IgnoreMatcher};

/// Flags passed to `dunelin init`. Anything left as `None` is prompted for.
#[derive(Debug, Default)]
pub struct InitOptions {
    pub name: Option<String>,
    pub template_url: Option<String>,
    pub builtin: bool,
    pub user_name: Option<String>,
    pub role: Option<String>,
    pub context_file: Option<String>,
}

/// Answers needed to scaffold the built-in template.
#[derive(Debug, Clone)]
pub struct BuiltinAnswers {
    pub workspace_name: String,
    pub user_name: String,
    pub user_role: String,
    pub context_file: String,
}

fn validate_template_url(url: &str) -> Option<&'static str> {
    if url.is_empty() {
        Some("URL is required")
    } else if !url.contains("git") && !url.starts_with("http") {
        Some("Must be a git URL")
    } else {
        None
    }
}

fn required(message: &'static str) -> impl Fn(&str) -> Option<&'static str> {
    move |value: &str| value.is_empty().then_some(message)
}

/// `dunelin init [NAME]`.
pub async fn run_init(cwd: &Path, options: InitOptions) -> Result<()> {
    let prompter = Prompter::new();
    println!("Welcome to Dunelin.");

    let use_git = match (&options.template_url, options.builtin) {
        (Some(_), _) => true,
        (None, true) => false,
        (None, false) => {
            let choice = prompter.select(
                "How do you want to set up your workspace?",
                &["Use a git template (paste a git URL)", "Pick a built-in template"],
            )?;
            match choice {
                Some(0) => true,
                Some(_) => false,
                None => {
                    println!("Setup cancelled.");
                    return Ok(());
                }
            }
        }
    };

    let name = options.name.as_deref();
    let target = crate::cli::resolve_target_dir(cwd, name);

    if use_git {
        let url = match options.template_url.clone() {
            Some(url) => url,
            None => prompter.text("Template URL", validate_template_url)?,
        };
        if let Some(message) = validate_template_url(&url) {
            return Err(anyhow!("{}: {}", message, url));
        }
        init_from_git(&prompter, &target, &url).await?;
    } else {
        let answers = builtin_answers(&prompter, cwd, &options)?;
        let Some(answers) = answers else {
            println!("Setup cancelled.");
            return Ok(());
        };
        scaffold_builtin(&target, &answers).await?;
        println!("Workspace scaffolded.");
    }

    match name {
        Some(name) => println!("Workspace ready at ./{}", name),
        None => println!("Workspace ready."),
    }
    print_next_steps(name);
    Ok(())
}

fn builtin_answers(
    prompter: &Prompter,
    cwd: &Path,
    options: &InitOptions,
) -> Result<Option<BuiltinAnswers>> {
    let user_name = match &options.user_name {
        Some(n) => n.clone(),
        None => prompter.text("Your name", required("Name is required"))?,
    };
    let user_role = match &options.role {
        Some(r) => r.clone(),
        None => prompter.text("Your role", required("Role is required"))?,
    };
    let context_file = match &options.context_file {
        Some(f) => f.clone(),
        None => {
            let choice = prompter.select(
                "Which AI tool do you primarily use?",
                &[
                    "Claude Code (generates CLAUDE.md)",
                    "Cursor (generates .cursorrules)",
                    "Other (choose your own filename)",
                ],
            )?;
            match choice {
                Some(0) => DEFAULT_CONTEXT_FILE.to_string(),
                Some(1) => ".cursorrules".to_string(),
                Some(_) => prompter.text("Context filename", required("Filename is required"))?,
                None => return Ok(None),
            }
        }
    };

    Ok(Some(BuiltinAnswers {
        workspace_name: crate::cli::workspace_name(cwd, options.name.as_deref()),
        user_name,
        user_role,
        context_file,
    }))
}

/// Write the embedded base template into `target` and record the config.
pub async fn scaffold_builtin(target: &Path, answers: &BuiltinAnswers) -> Result<()> {
    let vars = TemplateVars {
        workspace_name: answers.workspace_name.clone(),
        user_name: answers.user_name.clone(),
        user_role: answers.user_role.clone(),
    };
    write_template(BASE_TEMPLATE, target, &vars).await?;
    rename_context_files(target, &answers.context_file).await?;

    let now = chrono::Utc::now().to_rfc3339();
    update_workspace_config(
        target,
        ConfigPatch {
            context_file: Some(answers.context_file.clone()),
            template: Some(Some("base".to_string())),
            created_at: Some(now),
            ..Default::default()
        },
    )
    .await?;

    let context_path = target.join(&answers.context_file);
    let injected = inject_block(&context_path, false)
        .await
        .with_context(|| format!("Failed to update {}", context_path.display()))?;
    if !injected {
        warn!("No context file at {}; managed block not written", context_path.display());
    }

    info!("Scaffolded base template in {}", target.display());
    Ok(())
}

async fn init_from_git(prompter: &Prompter, target: &Path, url: &str) -> Result<()> {
    let shadow = shadow_path(target);
    println!("Cloning template...");
    SystemGit
        .clone(url, &shadow)
        .await
        .map_err(|e| anyhow!("Git clone failed: {}", e))?;
    println!("Template cloned.");

    let report = materialize_shadow(target, url).await?;
    println!(
        "Copied {} file{} from template.",
        report.copied.len(),
        plural(report.copied.len())
    );

    offer_repo_cloning(prompter, target).await
}

/// Copy a freshly cloned shadow into `target` and record the shadow config.
///
/// The context file name comes from a config shipped in the template, when
/// there is one.
pub async fn materialize_shadow(target: &Path, url: &str) -> Result<CopyReport> {
    let shadow = shadow_path(target);
    let ignore = IgnoreMatcher::new(DEFAULT_IGNORE_PATTERNS);
    let report = copy_from_shadow(&shadow, target, &ignore, None)
        .await
        .context("Failed to copy template into workspace")?;

    let context_file = match read_workspace_config(&shadow).await {
        Some(config) => config.context_file,
        None => {
            warn!("Template has no dunelin config; using {}", DEFAULT_CONTEXT_FILE);
            DEFAULT_CONTEXT_FILE.to_string()
        }
    };

    update_workspace_config(
        target,
        ConfigPatch {
            context_file: Some(context_file),
            template: Some(Some("custom".to_string())),
            template_url: Some(Some(url.to_string())),
            shadow: Some(true),
            ..Default::default()
        },
    )
    .await?;

    Ok(report)
}

fn describe_repos(project: &ProjectRepos) -> String {
    let names: Vec<&str> = project.repos.iter().map(|r| r.name.as_str()).collect();
    format!(
        "{}: {} repo{} ({})",
        project.project_name,
        project.repos.len(),
        plural(project.repos.len()),
        names.join(", ")
    )
}

async fn offer_repo_cloning(prompter: &Prompter, workspace: &Path) -> Result<()> {
    let projects = list_projects_with_repos(workspace).await;
    if projects.is_empty() {
        return Ok(());
    }

    println!("Found repos in project metadata:");
    for project in &projects {
        println!("  {}", describe_repos(project));
    }

    let choice = prompter.select(
        "Clone project repos?",
        &["Yes, clone all", "Let me pick which ones", "Skip for now"],
    )?;
    let to_clone: Vec<&ProjectRepos> = match choice {
        Some(0) => projects.iter().collect(),
        Some(1) => {
            let labels: Vec<String> = projects.iter().map(describe_repos).collect();
            match prompter.multi_select("Which projects' repos to clone?", &labels)? {
                Some(indices) => indices.into_iter().filter_map(|i| projects.get(i)).collect(),
                None => return Ok(()),
            }
        }
        _ => return Ok(()),
    };

    let git = SystemGit;
    for project in to_clone {
        for report in clone_project_repos(&git, &project.project_path, &project.repos).await {
            if report.is_success() {
                println!("  ✓ {}/{}", project.project_name, report.name);
            } else {
                println!(
                    "  ✗ {}/{}: {}",
                    project.project_name,
                    report.name,
                    report.error.as_deref().unwrap_or_default()
                );
            }
        }
    }
    Ok(())
}

fn print_next_steps(name: Option<&str>) {
    println!();
    println!("  Next steps:");
    if let Some(name) = name {
        println!("    cd {}", name);
    }
    println!("    Open in your editor. Your AI tool will read the context automatically.");
    println!("    To add projects, create folders under projects/ or use a git template.");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::read_workspace_config;
    use crate::workspace::block::START_MARKER;
    use std::fs;
    use tempfile::TempDir;

    fn answers(context_file: &str) -> BuiltinAnswers {
        BuiltinAnswers {
            workspace_name: "Acme".into(),
            user_name: "Ada".into(),
            user_role: "CTO".into(),
            context_file: context_file.into(),
        }
    }

    #[test]
    fn test_validate_template_url() {
        assert_eq!(validate_template_url(""), Some("URL is required"));
        assert_eq!(validate_template_url("ftp://x/y"), Some("Must be a git URL"));
        assert!(validate_template_url("git@github.com:acme/t.git").is_none());
        assert!(validate_template_url("https://example.com/t").is_none());
    }

    #[tokio::test]
    async fn test_scaffold_builtin_default_context() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("acme");
        scaffold_builtin(&target, &answers("CLAUDE.md")).await.unwrap();

        let root = fs::read_to_string(target.join("CLAUDE.md")).unwrap();
        assert!(root.starts_with("# Acme"));
        assert!(root.contains(START_MARKER));
        assert!(!root.contains(".dunelin/shadow/"));

        let config = read_workspace_config(&target).await.unwrap();
        assert_eq!(config.template.as_deref(), Some("base"));
        assert_eq!(config.context_file, "CLAUDE.md");
        assert!(!config.has_shadow_flag());
        assert!(!config.created_at.is_empty());
    }

    #[tokio::test]
    async fn test_scaffold_builtin_custom_context() {
        let temp = TempDir::new().unwrap();
        scaffold_builtin(temp.path(), &answers("AGENTS.md")).await.unwrap();

        assert!(!temp.path().join("CLAUDE.md").exists());
        let root = fs::read_to_string(temp.path().join("AGENTS.md")).unwrap();
        assert!(root.contains(START_MARKER));
        assert!(temp.path().join("projects/example/AGENTS.md").exists());

        let config = read_workspace_config(temp.path()).await.unwrap();
        assert_eq!(config.context_file, "AGENTS.md");
    }

    #[tokio::test]
    async fn test_materialize_shadow() {
        let temp = TempDir::new().unwrap();
        let shadow = shadow_path(temp.path());
        fs::create_dir_all(shadow.join(".git")).unwrap();
        fs::write(shadow.join(".git/HEAD"), "ref: refs/heads/main").unwrap();
        fs::write(
            shadow.join("dunelin.json"),
            r#"{"contextFile":"AGENTS.md","createdAt":"2024-01-01T00:00:00Z","updatedAt":"x"}"#,
        )
        .unwrap();
        fs::write(shadow.join("AGENTS.md"), "# Team").unwrap();
        fs::create_dir_all(shadow.join("projects/api/repos/server")).unwrap();
        fs::write(shadow.join("projects/api/repos/server/x.rs"), "").unwrap();

        let url = "git@github.com:acme/template.git";
        let report = materialize_shadow(temp.path(), url).await.unwrap();

        assert_eq!(report.copied, vec!["AGENTS.md", "dunelin.json"]);
        assert!(!temp.path().join(".git").exists());
        assert!(!temp.path().join("projects/api/repos").exists());

        let config = read_workspace_config(temp.path()).await.unwrap();
        assert_eq!(config.context_file, "AGENTS.md");
        assert_eq!(config.template.as_deref(), Some("custom"));
        assert_eq!(config.template_url.as_deref(), Some(url));
        assert!(config.has_shadow_flag());
        assert_eq!(config.created_at, "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_describe_repos() {
        let project = ProjectRepos {
            project_name: "api".into(),
            project_path: "/ws/projects/api".into(),
            repos: vec![
                crate::config::RepoConfig {
                    name: "server".into(),
                    url: "git@github.com:acme/server.git".into(),
                },
                crate::config::RepoConfig {
                    name: "client".into(),
                    url: "git@github.com:acme/client.git".into(),
                },
            ],
        };
        assert_eq!(describe_repos(&project), "api: 2 repos (server, client)");
    }
}

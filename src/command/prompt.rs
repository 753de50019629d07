//! Terminal prompts shared by the interactive commands.

use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Select};

/// Thin wrapper over dialoguer with a fixed theme.
///
/// Every method returns `Ok(None)` when the user backs out (Esc or `q`), so
/// callers can tell a cancel apart from a terminal failure.
#[derive(Default)]
pub struct Prompter {
    theme: ColorfulTheme,
}

impl Prompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick one item; the first item is preselected.
    pub fn select(&self, prompt: &str, items: &[&str]) -> Result<Option<usize>> {
        Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_opt()
            .context("Failed to get user selection")
    }

    /// Pick any number of items, none preselected.
    pub fn multi_select(&self, prompt: &str, items: &[String]) -> Result<Option<Vec<usize>>> {
        MultiSelect::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .interact_opt()
            .context("Failed to get user selection")
    }

    /// Required free-text answer. `check` returns an error message to show
    /// for unacceptable input.
    pub fn text<F>(&self, prompt: &str, check: F) -> Result<String>
    where
        F: Fn(&str) -> Option<&'static str>,
    {
        let answer: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .validate_with(|input: &String| match check(input.trim()) {
                Some(message) => Err(message),
                None => Ok(()),
            })
            .interact_text()
            .context("Failed to get user input")?;
        Ok(answer.trim().to_string())
    }
}

/// Plural suffix for counts in user-facing messages.
pub fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

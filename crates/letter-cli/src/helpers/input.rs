//! Input handling for drafts and paragraph passwords.

use std::path::Path;

use dialoguer::{Confirm, Input, Password};
use letter_core::LetterDraft;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::errors::CliError;

/// On-disk draft format.
///
/// ```toml
/// title = "Note"
///
/// [[paragraphs]]
/// message = "Meet at noon"
/// password = "swordfish"
/// hint = "time"
/// ```
#[derive(Debug, Deserialize)]
pub struct DraftFile {
    pub title: Option<String>,
    #[serde(default)]
    pub paragraphs: Vec<DraftParagraph>,
}

#[derive(Debug, Deserialize)]
pub struct DraftParagraph {
    pub message: String,
    pub password: String,
    pub hint: Option<String>,
}

impl From<DraftFile> for LetterDraft {
    fn from(file: DraftFile) -> Self {
        let mut draft = LetterDraft::new();
        draft.set_title(file.title);
        for paragraph in file.paragraphs {
            draft.add_paragraph(paragraph.message, paragraph.password, paragraph.hint);
        }
        draft
    }
}

/// Read a TOML draft file.
pub fn read_draft_file(path: &Path) -> anyhow::Result<LetterDraft> {
    if !path.exists() {
        return Err(CliError::not_found(
            format!("Draft not found: {}", path.display()),
            "Hint: Pass an existing TOML file with --draft, or omit it to compose interactively.",
        )
        .into());
    }
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read draft {}: {}", path.display(), e))?;
    let file: DraftFile = toml::from_str(&contents).map_err(|e| {
        CliError::invalid_input(format!("Failed to parse draft {}: {}", path.display(), e))
    })?;
    Ok(file.into())
}

/// Compose a draft with interactive prompts.
pub fn compose_draft(title: Option<String>) -> anyhow::Result<LetterDraft> {
    let mut draft = LetterDraft::new();

    let title = match title {
        Some(title) => title,
        None => Input::<String>::new()
            .with_prompt("Title (optional)")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| anyhow::anyhow!("Failed to read title: {}", e))?,
    };
    draft.set_title(Some(title));

    loop {
        let number = draft.len() + 1;
        let message: String = Input::new()
            .with_prompt(format!("Paragraph {} message", number))
            .validate_with(|input: &String| -> Result<(), &str> {
                if input.trim().is_empty() {
                    Err("Message cannot be empty")
                } else {
                    Ok(())
                }
            })
            .interact_text()
            .map_err(|e| anyhow::anyhow!("Failed to read message: {}", e))?;
        let password = Password::new()
            .with_prompt(format!("Paragraph {} password", number))
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))?;
        let hint: String = Input::new()
            .with_prompt(format!("Paragraph {} hint (optional)", number))
            .allow_empty(true)
            .interact_text()
            .map_err(|e| anyhow::anyhow!("Failed to read hint: {}", e))?;

        draft.add_paragraph(message, password, Some(hint));

        let more = Confirm::new()
            .with_prompt("Add another paragraph?")
            .default(false)
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read answer: {}", e))?;
        if !more {
            break;
        }
    }

    Ok(draft)
}

/// Prompt for one paragraph's password. An empty answer means skip.
pub fn prompt_paragraph_password(number: usize) -> anyhow::Result<Option<Zeroizing<String>>> {
    let password = Password::new()
        .with_prompt(format!("Password for paragraph {} (empty to skip)", number))
        .allow_empty_password(true)
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))?;
    if password.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(password))
    }
}

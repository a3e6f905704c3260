pub mod config;
pub mod inspect;
pub mod misc;
pub mod open;
pub mod seal;

use std::path::Path;

use letter_core::{decode, EncryptedLetter};

use crate::errors::CliError;
use crate::helpers::extract_token;

/// Load a letter from a token/link argument or an envelope file.
pub(crate) fn load_letter(link: Option<&str>, file: Option<&Path>) -> anyhow::Result<EncryptedLetter> {
    if let Some(path) = file {
        if !path.exists() {
            return Err(CliError::not_found(
                format!("Letter file not found: {}", path.display()),
                "Hint: Pass a JSON envelope with --file, or the link itself.",
            )
            .into());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        return EncryptedLetter::from_json(&contents).map_err(|e| CliError::from(e).into());
    }

    let token = extract_token(link.unwrap_or_default());
    if token.is_empty() {
        return Err(CliError::invalid_input(
            "No token found. Pass the token or the full link containing ?d=<token>",
        )
        .into());
    }
    decode(&token).map_err(|e| CliError::from(e).into())
}

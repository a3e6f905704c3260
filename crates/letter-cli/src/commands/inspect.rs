use letter_core::limits::TAG_LEN;
use letter_core::transport::exceeds_warn_length;
use letter_core::{encode, EncryptedLetter};

use super::load_letter;
use crate::app::AppContext;
use crate::cli::InspectArgs;
use crate::errors::CliError;
use crate::ui::{badge, blank_line, header, kv, print, Badge};

pub fn handle_inspect(ctx: &AppContext, args: &InspectArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(args.json);
    let letter = load_letter(args.link.as_deref(), args.file.as_deref())?;
    let token = encode(&letter).map_err(CliError::from)?;
    let token_length = token.len();

    if ui.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&inspect_json(&letter, token_length))?);
        return Ok(());
    }

    print(&ui, &header(&ui, "inspect", letter.title()));
    print(&ui, &kv(&ui, "Title", letter.title().unwrap_or("(none)")));
    print(&ui, &kv(&ui, "Paragraphs", &letter.len().to_string()));
    print(&ui, &kv(&ui, "Token length", &token_length.to_string()));

    for (index, paragraph) in letter.paragraphs().iter().enumerate() {
        blank_line(&ui);
        print(&ui, &kv(&ui, "Paragraph", &(index + 1).to_string()));
        print(&ui, &kv(&ui, "Hint", paragraph.hint().unwrap_or("(none)")));
        print(&ui, &kv(&ui, "Message bytes", &message_len(paragraph.ciphertext()).to_string()));
    }

    if exceeds_warn_length(&token, ctx.config.link.warn_length) {
        blank_line(&ui);
        print(
            &ui,
            &badge(&ui, Badge::Warn, "Link is long enough that some browsers may truncate it"),
        );
    }
    Ok(())
}

/// Plaintext size implied by a ciphertext (ciphertext minus the GCM tag).
fn message_len(ciphertext: &[u8]) -> usize {
    ciphertext.len().saturating_sub(TAG_LEN)
}

fn inspect_json(letter: &EncryptedLetter, token_length: usize) -> serde_json::Value {
    let paragraphs: Vec<_> = letter
        .paragraphs()
        .iter()
        .enumerate()
        .map(|(index, paragraph)| {
            serde_json::json!({
                "number": index + 1,
                "hint": paragraph.hint(),
                "message_bytes": message_len(paragraph.ciphertext()),
            })
        })
        .collect();
    serde_json::json!({
        "title": letter.title(),
        "paragraphs": paragraphs,
        "token_length": token_length,
    })
}

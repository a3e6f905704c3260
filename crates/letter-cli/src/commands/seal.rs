use letter_core::transport::exceeds_warn_length;
use letter_core::{encode, LetterDraft};

use crate::app::AppContext;
use crate::cli::SealArgs;
use crate::errors::CliError;
use crate::helpers::{build_link, compose_draft, read_draft_file};
use crate::ui::{badge, blank_line, hint, kv, print, Badge, Spinner};

pub async fn handle_seal(ctx: &AppContext, args: &SealArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(args.json);

    let mut draft: LetterDraft = match &args.draft {
        Some(path) => read_draft_file(path)?,
        None if args.no_input || !ui.is_interactive() => {
            return Err(CliError::invalid_input(
                "No draft provided and prompts are disabled\nHint: Pass a TOML draft with --draft FILE.",
            )
            .into());
        }
        None => compose_draft(args.title.clone())?,
    };
    if let Some(title) = &args.title {
        draft.set_title(Some(title.clone()));
    }

    let count = draft.len();
    tracing::info!(paragraphs = count, "sealing letter");

    let spinner = Spinner::start(&ui, &format!("Sealing {} paragraph(s)", count));
    let letter = draft.seal().await.map_err(CliError::from)?;
    let token = encode(&letter).map_err(CliError::from)?;
    spinner.clear();

    let link = build_link(&ctx.config.link.base_url, &token);
    let long_link = exceeds_warn_length(&token, ctx.config.link.warn_length);
    if long_link {
        tracing::warn!(token_chars = token.len(), "link may be truncated by some browsers");
    }

    if ui.mode.is_json() {
        let output = serde_json::json!({
            "title": letter.title(),
            "paragraphs": letter.len(),
            "token": token,
            "link": link,
            "token_length": token.len(),
            "long_link_warning": long_link,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print(
        &ui,
        &badge(&ui, Badge::Ok, &format!("Sealed {} paragraph(s)", letter.len())),
    );
    if let Some(title) = letter.title() {
        print(&ui, &kv(&ui, "Title", title));
    }
    print(&ui, &kv(&ui, "Token length", &token.len().to_string()));
    print(&ui, &kv(&ui, "Link", &link));
    print(&ui, &kv(&ui, "Token", &token));
    if long_link {
        blank_line(&ui);
        print(
            &ui,
            &badge(
                &ui,
                Badge::Warn,
                &format!(
                    "Link is {} characters; some browsers truncate links over {}",
                    token.len(),
                    ctx.config.link.warn_length
                ),
            ),
        );
        print(&ui, &hint(&ui, "Shorten the paragraphs or split the letter in two."));
    }
    Ok(())
}

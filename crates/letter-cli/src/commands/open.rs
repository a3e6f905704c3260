use letter_core::{
    Decryptable, DecryptionController, DecryptionItem, DecryptionState, LetterError,
};

use super::load_letter;
use crate::app::AppContext;
use crate::cli::OpenArgs;
use crate::errors::CliError;
use crate::helpers::{parse_password_assignments, prompt_paragraph_password};
use crate::ui::{badge, blank_line, divider, header, kv, print, Badge, Spinner, UiContext};

pub async fn handle_open(ctx: &AppContext, args: &OpenArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(args.json);
    let letter = load_letter(args.link.as_deref(), args.file.as_deref())?;
    let passwords = parse_password_assignments(&args.password)?;

    if let Some(index) = passwords.keys().find(|index| **index >= letter.len()) {
        return Err(CliError::invalid_input(format!(
            "Letter has {} paragraph(s); there is no paragraph {}",
            letter.len(),
            index + 1
        ))
        .into());
    }

    let interactive = !args.no_input && !ui.mode.is_json() && ui.is_interactive();
    let mut controller = DecryptionController::new(letter);
    let mut rejected = Vec::new();

    print(&ui, &header(&ui, "open", controller.title()));
    print(&ui, &kv(&ui, "Paragraphs", &controller.len().to_string()));

    for index in 0..controller.len() {
        let number = index + 1;
        blank_line(&ui);
        print(&ui, &divider(&ui));
        print(&ui, &kv(&ui, "Paragraph", &number.to_string()));
        if let Some(text) = controller.item(index).map_err(CliError::from)?.hint() {
            print(&ui, &kv(&ui, "Hint", text));
        }

        if let Some(password) = passwords.get(&index) {
            match attempt(&ui, &mut controller, index, password).await? {
                Ok(message) => print_message(&ui, &message),
                Err(err) => {
                    print(&ui, &badge(&ui, Badge::Err, &err.to_string()));
                    rejected.push((number, err));
                }
            }
            continue;
        }

        if !interactive {
            print(&ui, &badge(&ui, Badge::Info, "Locked"));
            continue;
        }

        loop {
            let Some(password) = prompt_paragraph_password(number)? else {
                print(&ui, &badge(&ui, Badge::Info, "Skipped"));
                break;
            };
            match attempt(&ui, &mut controller, index, &password).await? {
                Ok(message) => {
                    print_message(&ui, &message);
                    break;
                }
                Err(err) => print(
                    &ui,
                    &badge(
                        &ui,
                        Badge::Warn,
                        &format!("{}; try again or leave empty to skip", err),
                    ),
                ),
            }
        }
    }

    if ui.mode.is_json() {
        let output = serde_json::json!({
            "title": controller.title(),
            "total": controller.len(),
            "decrypted": controller.decrypted_count(),
            "paragraphs": controller.items().iter().map(item_json).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        blank_line(&ui);
        print(&ui, &divider(&ui));
        let summary = format!(
            "Opened {} of {} paragraph(s)",
            controller.decrypted_count(),
            controller.len()
        );
        let kind = if controller.is_fully_decrypted() {
            Badge::Ok
        } else {
            Badge::Info
        };
        print(&ui, &badge(&ui, kind, &summary));
    }

    if !rejected.is_empty() {
        let list = rejected
            .iter()
            .map(|(number, _)| number.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let wrong_password = rejected
            .iter()
            .any(|(_, err)| matches!(err, LetterError::AuthenticationFailure));
        if !wrong_password {
            return Err(CliError::invalid_input(format!(
                "Could not open paragraph(s) {}: {}",
                list,
                LetterError::EmptyPassword
            ))
            .into());
        }
        return Err(CliError::auth_failed_with_hint(
            format!("Could not open paragraph(s) {}", list),
            "Hint: Check the password given for each paragraph number.",
        )
        .into());
    }
    Ok(())
}

/// Run one decrypt attempt.
///
/// The inner `Err` carries errors that only concern this paragraph (wrong or
/// blank password); anything else aborts the command.
async fn attempt(
    ui: &UiContext,
    controller: &mut DecryptionController,
    index: usize,
    password: &str,
) -> anyhow::Result<Result<String, LetterError>> {
    controller
        .set_password_input(index, password)
        .map_err(CliError::from)?;

    let spinner = Spinner::start(ui, "Deriving key");
    let result = controller.decrypt(index).await.map(str::to_string);
    spinner.clear();

    match result {
        Ok(message) => Ok(Ok(message)),
        Err(err) if err.is_item_scoped() => {
            tracing::debug!(paragraph = index + 1, error = %err, "paragraph not opened");
            Ok(Err(err))
        }
        Err(err) => Err(CliError::from(err).into()),
    }
}

fn print_message(ui: &UiContext, message: &str) {
    print(ui, &badge(ui, Badge::Ok, "Opened"));
    if ui.mode.is_pretty() {
        println!();
        for line in message.lines() {
            println!("  {}", line);
        }
    } else {
        print(ui, &kv(ui, "Message", message));
    }
}

fn item_json(item: &DecryptionItem) -> serde_json::Value {
    let state = match item.state() {
        DecryptionState::Pending => "pending",
        DecryptionState::Decrypting => "decrypting",
        DecryptionState::Decrypted => "decrypted",
        DecryptionState::Failed => "failed",
    };
    serde_json::json!({
        "number": item.index() + 1,
        "hint": item.hint(),
        "state": state,
        "message": item.is_decrypted().then(|| item.decrypted_message()),
        "error": item.last_error().map(|e| e.to_string()),
    })
}

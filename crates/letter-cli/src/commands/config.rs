use crate::app::AppContext;
use crate::cli::ConfigSubcommand;
use crate::config::{write_config, LetterConfig};
use crate::errors::CliError;
use crate::ui::{badge, hint, kv, print, Badge};

pub fn handle_config(ctx: &AppContext, subcommand: &ConfigSubcommand) -> anyhow::Result<()> {
    match subcommand {
        ConfigSubcommand::Init { force } => handle_init(ctx, *force),
        ConfigSubcommand::Show { json } => handle_show(ctx, *json),
    }
}

fn handle_init(ctx: &AppContext, force: bool) -> anyhow::Result<()> {
    let ui = ctx.ui_context(false);
    let path = &ctx.config_path;

    if path.exists() && !force {
        return Err(CliError::invalid_input(format!(
            "Config already exists at {}\nHint: Use --force to overwrite it.",
            path.display()
        ))
        .into());
    }

    write_config(path, &LetterConfig::default())?;
    tracing::info!(path = %path.display(), "wrote default config");

    print(&ui, &badge(&ui, Badge::Ok, "Config written"));
    print(&ui, &kv(&ui, "Path", &path.display().to_string()));
    print(&ui, &hint(&ui, "Edit [link] base_url to point at your receiver page."));
    Ok(())
}

fn handle_show(ctx: &AppContext, json: bool) -> anyhow::Result<()> {
    let ui = ctx.ui_context(json);
    let config = &ctx.config;

    if ui.mode.is_json() {
        let output = serde_json::json!({
            "path": ctx.config_path.display().to_string(),
            "exists": ctx.config_path.exists(),
            "link": {
                "base_url": config.link.base_url,
                "warn_length": config.link.warn_length,
            },
            "ui": {
                "ascii": config.ui.ascii,
                "color": config.ui.color,
            },
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let source = if ctx.config_path.exists() {
        ctx.config_path.display().to_string()
    } else {
        format!("{} (not found, using defaults)", ctx.config_path.display())
    };
    print(&ui, &kv(&ui, "Path", &source));
    print(&ui, &kv(&ui, "Base URL", &config.link.base_url));
    print(&ui, &kv(&ui, "Warn length", &config.link.warn_length.to_string()));
    print(&ui, &kv(&ui, "ASCII", &config.ui.ascii.to_string()));
    print(&ui, &kv(&ui, "Color", &config.ui.color.to_string()));
    Ok(())
}

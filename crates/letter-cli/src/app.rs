//! Per-invocation application context.

use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::{load_config, resolve_config_path, LetterConfig};
use crate::ui::UiContext;

/// Resolved config plus the global UI flags.
pub struct AppContext {
    pub config_path: PathBuf,
    pub config: LetterConfig,
    no_color: bool,
    ascii: bool,
}

impl AppContext {
    pub fn new(cli: &Cli) -> anyhow::Result<Self> {
        let config_path = resolve_config_path(cli.config.as_deref())?;
        let config = load_config(&config_path)?;
        Ok(Self {
            config_path,
            config,
            no_color: cli.no_color,
            ascii: cli.ascii,
        })
    }

    /// Context used when the config could not be loaded.
    pub fn fallback(cli: &Cli) -> Self {
        Self {
            config_path: cli.config.clone().unwrap_or_default(),
            config: LetterConfig::default(),
            no_color: cli.no_color,
            ascii: cli.ascii,
        }
    }

    pub fn ui_context(&self, json: bool) -> UiContext {
        UiContext::from_env(json, self.no_color, self.ascii, &self.config.ui)
    }
}

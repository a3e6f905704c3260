use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use letter_core::VERSION;

/// Letter - seal multi-paragraph messages behind per-paragraph passwords
#[derive(Parser)]
#[command(name = "letter")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true, env = "LETTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols only
    #[arg(long, global = true)]
    pub ascii: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for the `seal` command
#[derive(Args)]
pub struct SealArgs {
    /// TOML draft file with a title and [[paragraphs]]
    #[arg(short, long, value_name = "FILE")]
    pub draft: Option<PathBuf>,

    /// Letter title (overrides the draft's title)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `open` command
#[derive(Args)]
pub struct OpenArgs {
    /// Token or full link
    #[arg(value_name = "TOKEN|URL", required_unless_present = "file")]
    pub link: Option<String>,

    /// Read a letter envelope (JSON) from a file instead of a link
    #[arg(short, long, value_name = "FILE", conflicts_with = "link")]
    pub file: Option<PathBuf>,

    /// Password for one paragraph, numbered from 1 (repeatable)
    #[arg(short, long, value_name = "INDEX=PASSWORD")]
    pub password: Vec<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `inspect` command
#[derive(Args)]
pub struct InspectArgs {
    /// Token or full link
    #[arg(value_name = "TOKEN|URL", required_unless_present = "file")]
    pub link: Option<String>,

    /// Read a letter envelope (JSON) from a file instead of a link
    #[arg(short, long, value_name = "FILE", conflicts_with = "link")]
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Write the default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Print the resolved configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt a letter and print its link
    Seal(SealArgs),

    /// Decrypt the paragraphs of a letter
    Open(OpenArgs),

    /// Show a letter's structure without decrypting
    Inspect(InspectArgs),

    /// Manage the config file
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_open_accepts_repeated_passwords() {
        let cli = Cli::try_parse_from([
            "letter", "open", "abc", "--password", "1=one", "-p", "2=two",
        ])
        .unwrap();
        match cli.command {
            Commands::Open(args) => {
                assert_eq!(args.link.as_deref(), Some("abc"));
                assert_eq!(args.password, vec!["1=one", "2=two"]);
            }
            _ => panic!("expected open"),
        }
    }

    #[test]
    fn test_open_requires_link_or_file() {
        assert!(Cli::try_parse_from(["letter", "open"]).is_err());
        assert!(Cli::try_parse_from(["letter", "open", "--file", "letter.json"]).is_ok());
    }
}

//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};

use crate::application::{IconType, Modifier};

/// Declarative XML result lists for launcher workflows
#[derive(Parser, Debug)]
#[command(name = "wfxml")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Project directory holding .wfxml.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the current time as a result list
    Date {
        /// strftime pattern (overrides config `format`)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Print a single-item result list
    Item(ItemArgs),

    /// Bundle a workflow directory into a distributable archive
    Package {
        /// Workflow name (archive stem and top-level directory)
        #[arg(short, long)]
        name: String,
        /// Directory of built assets (default: ./<name>)
        #[arg(long, value_hint = ValueHint::DirPath)]
        source: Option<PathBuf>,
        /// Directory holding info.plist and icon.png (default: ./config)
        #[arg(long, value_hint = ValueHint::DirPath)]
        config_dir: Option<PathBuf>,
        /// Output directory (default: cwd)
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        out_dir: Option<PathBuf>,
    },

    /// Clone a workflow repository and promote a subdirectory to its root
    Setup {
        /// Repository owner
        #[arg(short, long)]
        user: String,
        /// Repository name
        #[arg(short, long)]
        repo: String,
        /// Branch to check out
        #[arg(short, long)]
        branch: Option<String>,
        /// Clone target directory
        #[arg(short, long)]
        dir: Option<String>,
        /// Subdirectory to keep as repository root
        #[arg(short, long)]
        subdirectory: Option<String>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Print a commented config template
    Template,
    /// Show config file locations
    Path,
}

/// Item validity as accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Validity {
    Yes,
    No,
}

impl From<Validity> for bool {
    fn from(v: Validity) -> Self {
        v == Validity::Yes
    }
}

#[derive(clap::Args, Debug)]
pub struct ItemArgs {
    /// Item title
    #[arg(short, long)]
    pub title: String,
    /// Icon path or type identifier
    #[arg(short, long)]
    pub icon: String,
    /// How the icon is interpreted
    #[arg(long, value_parser = parse_icon_type)]
    pub icon_type: Option<IconType>,
    /// Subtitle without modifier key
    #[arg(short, long)]
    pub subtitle: Option<String>,
    /// Subtitle for a modifier key, e.g. `--mod-subtitle cmd="Open in Finder"`
    #[arg(long = "mod-subtitle", value_name = "MOD=TEXT", value_parser = parse_mod_subtitle)]
    pub mod_subtitles: Vec<(Modifier, String)>,
    #[arg(long)]
    pub uid: Option<String>,
    /// Argument passed to the next action
    #[arg(short, long)]
    pub arg: Option<String>,
    #[arg(long, value_enum)]
    pub valid: Option<Validity>,
    #[arg(long)]
    pub autocomplete: Option<String>,
    /// Item type, e.g. `file`
    #[arg(long = "type")]
    pub item_type: Option<String>,
    /// Text used when copying the item
    #[arg(long)]
    pub copy: Option<String>,
    /// Text shown in large type
    #[arg(long)]
    pub largetype: Option<String>,
}

fn parse_icon_type(s: &str) -> Result<IconType, String> {
    s.parse().map_err(|e: crate::domain::DomainError| e.to_string())
}

fn parse_mod_subtitle(s: &str) -> Result<(Modifier, String), String> {
    let (modifier, text) = s
        .split_once('=')
        .ok_or_else(|| format!("expected MOD=TEXT, got {s:?}"))?;
    let modifier: Modifier = modifier
        .trim()
        .parse()
        .map_err(|e: crate::domain::DomainError| e.to_string())?;
    Ok((modifier, text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_mod_subtitle() {
        assert_eq!(
            parse_mod_subtitle("cmd=Open in Finder").unwrap(),
            (Modifier::Cmd, "Open in Finder".to_string())
        );
        assert_eq!(
            parse_mod_subtitle("alt=a=b").unwrap(),
            (Modifier::Alt, "a=b".to_string())
        );
        assert!(parse_mod_subtitle("hyper=x").is_err());
        assert!(parse_mod_subtitle("shift").is_err());
    }

    #[test]
    fn test_item_args_parse() {
        let cli = Cli::try_parse_from([
            "wfxml",
            "item",
            "--title",
            "Desktop",
            "--icon",
            "~/Desktop",
            "--icon-type",
            "fileicon",
            "--valid",
            "yes",
            "--mod-subtitle",
            "shift=Reveal",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Item(args)) => {
                assert_eq!(args.title, "Desktop");
                assert_eq!(args.icon_type, Some(IconType::FileIcon));
                assert_eq!(args.valid, Some(Validity::Yes));
                assert_eq!(args.mod_subtitles, vec![(Modifier::Shift, "Reveal".to_string())]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Product feed generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: shopfeed.toml)
    #[arg(short = 'C', long, default_value = "shopfeed.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Regenerate the product feed now
    #[command(visible_alias = "g")]
    Generate {
        /// Strip indentation from the written feed
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        minify: Option<bool>,

        /// Output directory (overrides `feed.uploads`)
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        uploads: Option<PathBuf>,
    },

    /// Register the recurring feed refresh
    Activate,

    /// Remove the recurring feed refresh
    Deactivate,

    /// Show or change the tag exclusion list
    #[command(visible_alias = "s")]
    Settings {
        /// Tag slugs to exclude, comma separated (e.g. "chondrikis, test").
        /// Pass an empty string to clear.
        #[arg(short = 'x', long)]
        exclude_tags: Option<String>,
    },

    /// Run the scheduler and the admin endpoint
    #[command(visible_alias = "d")]
    Daemon {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Verify that the written feed is well-formed
    Check {
        /// Feed file to check (default: the configured feed path)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        path: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_args() {
        let cli = Cli::parse_from(["shopfeed", "generate", "-m", "-u", "out"]);
        match cli.command {
            Commands::Generate { minify, uploads } => {
                assert_eq!(minify, Some(true));
                assert_eq!(uploads, Some(PathBuf::from("out")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_settings_empty_value_clears() {
        let cli = Cli::parse_from(["shopfeed", "settings", "--exclude-tags", ""]);
        assert!(matches!(
            cli.command,
            Commands::Settings { exclude_tags: Some(ref s) } if s.is_empty()
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["shopfeed", "-C", "/etc/shopfeed.toml", "check", "--verbose"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("/etc/shopfeed.toml"));
    }

    #[test]
    fn test_alias() {
        let cli = Cli::parse_from(["shopfeed", "d", "--port", "9000"]);
        assert!(matches!(cli.command, Commands::Daemon { port: Some(9000), .. }));
    }
}

//! shopfeed - export a product catalog as a static XML feed.

mod catalog;
mod cli;
mod config;
mod core;
mod feed;
mod logger;
mod options;
mod schedule;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Generate { .. } => cli::generate::generate(&config),
        Commands::Activate => cli::schedule::activate(&config),
        Commands::Deactivate => cli::schedule::deactivate(&config),
        Commands::Settings { exclude_tags } => {
            cli::settings::settings(&config, exclude_tags.as_deref())
        }
        Commands::Daemon { .. } => cli::daemon::run_daemon(&config),
        Commands::Check { path } => cli::check::check(&config, path.as_deref()),
    }
}

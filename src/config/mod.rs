//! Configuration management for `shopfeed.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── admin      # [admin]
//! │   ├── catalog    # [catalog]
//! │   ├── feed       # [feed]
//! │   └── schedule   # [schedule]
//! ├── types/         # ConfigError, diagnostics, field paths
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section      | Purpose                                          |
//! |--------------|--------------------------------------------------|
//! | `[catalog]`  | Where the product catalog export lives           |
//! | `[feed]`     | Output directory, file name, public URL, minify  |
//! | `[schedule]` | Interval between scheduled runs                  |
//! | `[admin]`    | Admin endpoint bind address and bearer token     |
//!
//! Runtime settings edited by the admin (`exclude_tags`) are not part of
//! this file; they live in the option store under [`SiteConfig::state_dir`].

pub mod section;
pub mod types;
mod util;

use util::{find_config_file, normalize_path, resolve_against};

pub use section::{AdminConfig, CatalogConfig, FeedConfig, ScheduleConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{Cli, Commands},
    log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Directory (inside the project root) holding options and schedule state.
pub const STATE_DIR: &str = ".shopfeed";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing shopfeed.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Product catalog source
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Feed output settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Scheduled refresh settings
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Admin endpoint settings
    #[serde(default)]
    pub admin: AdminConfig,
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file. The project root
    /// is the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let config_path = find_config_file(&cli.config, &cwd)
            .ok_or_else(|| ConfigError::NotFound(cli.config.clone()))?;

        let mut config = Self::from_path(&config_path)?;
        config.config_path = normalize_path(&config_path);
        let root = config
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.finalize(&root, cli);
        config.validate(cli)?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::from)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Directory holding the option store and schedule state.
    pub fn state_dir(&self) -> PathBuf {
        self.root.join(STATE_DIR)
    }

    /// Full path of the feed file.
    pub fn feed_path(&self) -> PathBuf {
        self.feed.path()
    }

    // ========================================================================
    // finalize
    // ========================================================================

    /// Resolve paths against `root` and apply command-line overrides.
    fn finalize(&mut self, root: &Path, cli: &Cli) {
        // Set verbose mode globally
        crate::logger::set_verbose(cli.verbose);

        self.root = normalize_path(root);
        self.apply_command_options(cli);

        self.catalog.path = resolve_against(&self.catalog.path, &self.root);
        self.feed.uploads = resolve_against(&self.feed.uploads, &self.root);
    }

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Generate { minify, uploads } => {
                Self::update_option(&mut self.feed.minify, minify.as_ref());
                Self::update_option(&mut self.feed.uploads, uploads.as_ref());
            }
            Commands::Daemon { interface, port } => {
                Self::update_option(&mut self.admin.interface, interface.as_ref());
                Self::update_option(&mut self.admin.port, port.as_ref());
            }
            Commands::Activate
            | Commands::Deactivate
            | Commands::Settings { .. }
            | Commands::Check { .. } => {}
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration for the current command.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self, cli: &Cli) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.feed.validate(&mut diag);
        self.schedule.validate(&mut diag);

        // Only commands that read the catalog need it to exist
        if matches!(
            cli.command,
            Commands::Generate { .. } | Commands::Daemon { .. }
        ) {
            self.catalog.validate(&mut diag);
        }

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("shopfeed").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = SiteConfig::parse_with_ignored("[feed\nfilename = \"x.xml\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_site_config_default() {
        let config = SiteConfig::default();
        assert_eq!(config.config_path, PathBuf::new());
        assert_eq!(config.feed.filename, "product-feed.xml");
        assert_eq!(config.schedule.interval, 86_400);
        assert_eq!(config.admin.port, 8787);
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[feed]\nfilename = \"a.xml\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = SiteConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.feed.filename, "a.xml");
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_finalize_resolves_paths() {
        let mut config = test_parse_config("[catalog]\npath = \"data/products.json\"");
        config.finalize(Path::new("/srv/shop"), &cli(&["activate"]));

        assert_eq!(config.catalog.path, PathBuf::from("/srv/shop/data/products.json"));
        assert_eq!(
            config.feed_path(),
            PathBuf::from("/srv/shop/uploads/product-feed.xml")
        );
        assert_eq!(config.state_dir(), PathBuf::from("/srv/shop/.shopfeed"));
    }

    #[test]
    fn test_generate_overrides() {
        let mut config = test_parse_config("");
        config.finalize(
            Path::new("/srv/shop"),
            &cli(&["generate", "--minify", "--uploads", "public"]),
        );

        assert!(config.feed.minify);
        assert_eq!(config.feed_path(), PathBuf::from("/srv/shop/public/product-feed.xml"));
    }

    #[test]
    fn test_daemon_overrides() {
        let mut config = test_parse_config("");
        config.finalize(Path::new("/srv/shop"), &cli(&["daemon", "--port", "9100"]));
        assert_eq!(config.admin.port, 9100);
    }

    #[test]
    fn test_validate_requires_catalog_for_generate() {
        let dir = TempDir::new().unwrap();
        let mut config = test_parse_config("");
        config.finalize(dir.path(), &cli(&["generate"]));

        assert!(config.validate(&cli(&["generate"])).is_err());
        assert!(config.validate(&cli(&["settings"])).is_ok());

        fs::write(dir.path().join("products.json"), "[]").unwrap();
        assert!(config.validate(&cli(&["generate"])).is_ok());
    }
}

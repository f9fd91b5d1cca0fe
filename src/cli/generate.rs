//! `generate`: manual feed regeneration.

use anyhow::Result;

use super::common::feed_generator;
use crate::config::SiteConfig;
use crate::log;

/// Regenerate the feed once and report where it was written.
///
/// Failures propagate so the exit status reflects the outcome.
pub fn generate(config: &SiteConfig) -> Result<()> {
    let report = feed_generator(config).run_manual()?;

    if let Some(url) = config.feed.public_url() {
        log!("generate"; "feed available at {}", url);
    }
    if report.excluded_tags > 0 {
        log!("generate"; "{} tag(s) excluded", report.excluded_tags);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use std::fs;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> SiteConfig {
        let mut config = test_parse_config("");
        config.root = dir.path().to_path_buf();
        config.catalog.path = dir.path().join("products.json");
        config.feed.uploads = dir.path().join("uploads");
        config
    }

    #[test]
    fn test_generate_writes_feed() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        fs::write(
            &config.catalog.path,
            r#"[{"id": 7, "title": "Lamp", "price": "12.00", "in_stock": false}]"#,
        )
        .unwrap();

        generate(&config).unwrap();

        let xml = fs::read_to_string(config.feed_path()).unwrap();
        assert!(xml.contains("<id>7</id>"));
        assert!(xml.contains("<stock_status>Out of Stock</stock_status>"));
    }

    #[test]
    fn test_generate_reports_missing_catalog() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        assert!(generate(&config).is_err());
        assert!(!config.feed_path().exists());
    }
}

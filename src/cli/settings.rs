//! `settings`: show or edit the tag exclusion list.

use anyhow::{Context, Result};

use super::common::option_store;
use crate::config::SiteConfig;
use crate::feed::{EXCLUDE_TAGS_OPTION, ExcludedTags};
use crate::log;
use crate::options::OptionStore;

/// Store `raw` as the normalized exclusion list and return the stored value.
pub fn store_exclude_tags(options: &dyn OptionStore, raw: &str) -> Result<String> {
    let normalized = ExcludedTags::parse(raw).to_string();
    options
        .set(EXCLUDE_TAGS_OPTION, &normalized)
        .context("Failed to store exclude_tags option")?;
    Ok(normalized)
}

/// Print the current list, or replace it when `exclude_tags` is given.
pub fn settings(config: &SiteConfig, exclude_tags: Option<&str>) -> Result<()> {
    let options = option_store(config);

    let current = match exclude_tags {
        Some(raw) => {
            let stored = store_exclude_tags(&options, raw)?;
            log!("settings"; "exclude_tags updated");
            stored
        }
        None => options
            .get_or(EXCLUDE_TAGS_OPTION, "")
            .context("Failed to read exclude_tags option")?,
    };

    if current.is_empty() {
        println!("exclude_tags: (none)");
    } else {
        println!("exclude_tags: {current}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::MemoryOptionStore;

    #[test]
    fn test_store_normalizes() {
        let options = MemoryOptionStore::new();
        let stored = store_exclude_tags(&options, " test,chondrikis,, test ").unwrap();

        assert_eq!(stored, "chondrikis, test");
        assert_eq!(
            options.get(EXCLUDE_TAGS_OPTION).unwrap().as_deref(),
            Some("chondrikis, test")
        );
    }

    #[test]
    fn test_store_empty_clears() {
        let options = MemoryOptionStore::with(EXCLUDE_TAGS_OPTION, "sale");
        assert_eq!(store_exclude_tags(&options, "  ").unwrap(), "");
        assert_eq!(options.get(EXCLUDE_TAGS_OPTION).unwrap().as_deref(), Some(""));
    }
}

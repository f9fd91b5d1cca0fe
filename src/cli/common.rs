//! Wiring shared across CLI commands.

use std::sync::Arc;

use crate::catalog::JsonCatalog;
use crate::config::SiteConfig;
use crate::feed::{FeedGenerator, FeedTarget};
use crate::options::FileOptionStore;
use crate::schedule::ScheduleStore;
use crate::utils::date::DateTimeUtc;

/// Option store under the project's state directory.
pub fn option_store(config: &SiteConfig) -> FileOptionStore {
    FileOptionStore::in_dir(&config.state_dir())
}

/// Schedule state under the project's state directory.
pub fn schedule_store(config: &SiteConfig) -> ScheduleStore {
    ScheduleStore::in_dir(&config.state_dir())
}

/// Generator reading the configured catalog and writing the configured feed.
pub fn feed_generator(config: &SiteConfig) -> FeedGenerator {
    FeedGenerator::new(
        Arc::new(JsonCatalog::new(&config.catalog.path)),
        Arc::new(option_store(config)),
        FeedTarget {
            path: config.feed_path(),
            minify: config.feed.minify,
        },
    )
}

/// Render unix seconds for humans.
pub fn format_time(secs: u64) -> String {
    DateTimeUtc::from_unix(secs).to_rfc3339()
}

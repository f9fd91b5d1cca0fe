//! Configuration sections of `shopfeed.toml`.

mod admin;
mod catalog;
mod feed;
mod schedule;

pub use admin::AdminConfig;
pub use catalog::CatalogConfig;
pub use feed::FeedConfig;
pub use schedule::ScheduleConfig;

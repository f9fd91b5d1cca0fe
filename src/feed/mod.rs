//! Product feed generation.
//!
//! One pipeline, two triggers:
//!
//! ```text
//! exclude_tags option ─► ExcludedTags ─► Catalog query ─► ProductFeed ─► XML ─► feed file
//! ```
//!
//! [`FeedGenerator::run_scheduled`] is called by the daemon timer and
//! [`FeedGenerator::run_manual`] by the `generate` command and the admin
//! endpoint. Both end in [`generate_feed`].

mod document;
mod escape;
mod exclude;

pub use document::ProductFeed;
pub use exclude::{EXCLUDE_TAGS_OPTION, ExcludedTags};

use crate::{
    catalog::Catalog, core::RunGuard, debug, log, options::OptionStore, utils::plural_count,
};
use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::Serialize;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Where and how the feed is written.
#[derive(Debug, Clone)]
pub struct FeedTarget {
    pub path: PathBuf,
    pub minify: bool,
}

/// Outcome of one feed run.
#[derive(Debug, Clone, Serialize)]
pub struct FeedReport {
    pub path: PathBuf,
    pub products: usize,
    pub excluded_tags: usize,
    pub bytes: usize,
}

/// What started a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Scheduled,
    Manual,
}

impl Trigger {
    const fn module(self) -> &'static str {
        match self {
            Self::Scheduled => "schedule",
            Self::Manual => "generate",
        }
    }
}

/// Query, render and write the feed. The file is replaced as a whole.
pub fn generate_feed(
    exclude: &ExcludedTags,
    catalog: &dyn Catalog,
    target: &FeedTarget,
) -> Result<FeedReport> {
    let products = catalog
        .published_products(exclude)
        .context("Failed to query product catalog")?;

    let feed = ProductFeed::from_products(&products);
    let count = feed.len();
    let xml = feed.into_xml();
    let xml = minify_xml(xml.as_bytes(), target.minify);

    write_atomic(&target.path, &xml)?;

    Ok(FeedReport {
        path: target.path.clone(),
        products: count,
        excluded_tags: exclude.len(),
        bytes: xml.len(),
    })
}

/// Feed generator bound to its collaborators.
///
/// Runs are serialized: a manual trigger arriving while the timer is
/// writing waits for it, and the later run's file wins.
pub struct FeedGenerator {
    catalog: Arc<dyn Catalog>,
    options: Arc<dyn OptionStore>,
    target: FeedTarget,
    lock: Mutex<()>,
}

impl FeedGenerator {
    pub fn new(catalog: Arc<dyn Catalog>, options: Arc<dyn OptionStore>, target: FeedTarget) -> Self {
        Self {
            catalog,
            options,
            target,
            lock: Mutex::new(()),
        }
    }

    pub fn target(&self) -> &FeedTarget {
        &self.target
    }

    pub fn options(&self) -> &dyn OptionStore {
        self.options.as_ref()
    }

    /// Current exclusion list from the option store.
    pub fn excluded_tags(&self) -> Result<ExcludedTags> {
        let raw = self
            .options
            .get_or(EXCLUDE_TAGS_OPTION, "")
            .context("Failed to read exclude_tags option")?;
        Ok(ExcludedTags::parse(&raw))
    }

    /// Entry point for the daily timer.
    pub fn run_scheduled(&self) -> Result<FeedReport> {
        self.run(Trigger::Scheduled)
    }

    /// Entry point for an explicit regeneration request.
    pub fn run_manual(&self) -> Result<FeedReport> {
        self.run(Trigger::Manual)
    }

    fn run(&self, trigger: Trigger) -> Result<FeedReport> {
        let _guard = self.lock.lock();
        let _running = RunGuard::begin();
        let started = Instant::now();

        let exclude = self.excluded_tags()?;
        if !exclude.is_empty() {
            debug!(trigger.module(); "excluding tags: {}", exclude);
        }

        let report = generate_feed(&exclude, self.catalog.as_ref(), &self.target)?;

        log!(trigger.module(); "wrote {} to {} in {:.2?}",
            plural_count(report.products, "product"),
            report.path.display(),
            started.elapsed());
        Ok(report)
    }
}

/// Collapse the feed's indentation if enabled.
///
/// Only whitespace between markup is removed: a line that does not start
/// with `<` continues the previous element's text and keeps its newline.
/// Text never starts with `<` because it is escaped.
pub fn minify_xml(content: &[u8], enabled: bool) -> Cow<'_, [u8]> {
    if !enabled {
        return Cow::Borrowed(content);
    }

    let xml_str = String::from_utf8_lossy(content);
    let mut minified = String::with_capacity(xml_str.len());
    for (i, line) in xml_str.lines().enumerate() {
        let start = line.trim_start();
        if start.starts_with('<') {
            minified.push_str(start);
        } else {
            if i > 0 {
                minified.push('\n');
            }
            minified.push_str(line);
        }
        if minified.ends_with(|c: char| c.is_whitespace()) && minified.trim_end().ends_with('>') {
            minified.truncate(minified.trim_end().len());
        }
    }
    Cow::Owned(minified.into_bytes())
}

/// Write through a sibling temp file and rename over `path`.
fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(parent) = parent {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let file_name = path
        .file_name()
        .with_context(|| format!("Feed path has no file name: {}", path.display()))?;
    let temp_name = format!(".{}.tmp-{}", file_name.to_string_lossy(), std::process::id());
    let temp_path = match parent {
        Some(parent) => parent.join(temp_name),
        None => PathBuf::from(temp_name),
    };

    fs::write(&temp_path, content)
        .with_context(|| format!("Failed to write temp file {}", temp_path.display()))?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e).with_context(|| format!("Failed to write feed to {}", path.display()));
    }
    Ok(())
}

//! `[feed]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [feed]
//! uploads = "uploads"                            # output directory
//! filename = "product-feed.xml"                  # fixed feed file name
//! base_url = "https://shop.example/wp-content/"  # public URL of the uploads parent
//! minify = false
//! ```
//!
//! With `base_url` set, the feed is reported as
//! `<base_url>/<uploads dir name>/<filename>`.

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Directory the feed is written to.
    pub uploads: PathBuf,
    /// Feed file name inside `uploads`.
    pub filename: String,
    /// Public base URL used to report where the feed is served.
    pub base_url: Option<String>,
    /// Strip indentation from the written document.
    pub minify: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            uploads: "uploads".into(),
            filename: "product-feed.xml".into(),
            base_url: None,
            minify: false,
        }
    }
}

impl FeedConfig {
    pub const FILENAME: FieldPath = FieldPath::new("feed.filename");
    pub const BASE_URL: FieldPath = FieldPath::new("feed.base_url");

    /// Full path of the feed file.
    pub fn path(&self) -> PathBuf {
        self.uploads.join(&self.filename)
    }

    /// Public URL of the feed, when `base_url` is configured.
    pub fn public_url(&self) -> Option<url::Url> {
        let base = self.base_url.as_deref()?;
        let mut base = url::Url::parse(base).ok()?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let dir = self.uploads.file_name()?.to_str()?;
        base.join(&format!("{dir}/")).ok()?.join(&self.filename).ok()
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !is_bare_file_name(&self.filename) {
            diag.error_with_hint(
                Self::FILENAME,
                format!("`{}` is not a plain file name", self.filename),
                "put directories in `feed.uploads` instead",
            );
        }

        if let Some(base) = &self.base_url
            && let Err(e) = url::Url::parse(base)
        {
            diag.error(Self::BASE_URL, format!("invalid URL `{base}`: {e}"));
        }
    }
}

fn is_bare_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

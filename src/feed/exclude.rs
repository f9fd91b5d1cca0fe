//! Tag exclusion list.
//!
//! The `exclude_tags` option holds tag slugs separated by commas,
//! e.g. `"chondrikis, test"`.

use std::collections::BTreeSet;
use std::fmt;

/// Option key holding the exclusion list.
pub const EXCLUDE_TAGS_OPTION: &str = "exclude_tags";

/// Set of tag slugs whose products are left out of the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludedTags(BTreeSet<String>);

impl ExcludedTags {
    /// Parse a comma-separated list. Surrounding whitespace is ignored and
    /// empty entries are dropped.
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(',')
                .map(str::trim)
                .filter(|slug| !slug.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.0.contains(slug)
    }

    /// True if any of `tags` is excluded.
    pub fn matches_any<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        !self.is_empty() && tags.iter().any(|tag| self.contains(tag.as_ref()))
    }
}

/// Canonical form stored back into the option store: sorted, `", "`-joined.
impl fmt::Display for ExcludedTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, slug) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(slug)?;
        }
        Ok(())
    }
}

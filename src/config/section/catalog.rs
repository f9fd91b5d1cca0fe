//! `[catalog]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [catalog]
//! path = "products.json"      # JSON export of the product catalog
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog file (relative to the config file's directory).
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: "products.json".into(),
        }
    }
}

impl CatalogConfig {
    pub const PATH: FieldPath = FieldPath::new("catalog.path");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.path.is_file() {
            diag.error_with_hint(
                Self::PATH,
                format!("catalog file `{}` does not exist", self.path.display()),
                "export the product catalog as a JSON array of product records",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.catalog.path, PathBuf::from("products.json"));
    }

    #[test]
    fn test_custom_path() {
        let config = test_parse_config("[catalog]\npath = \"exports/catalog.json\"");
        assert_eq!(config.catalog.path, PathBuf::from("exports/catalog.json"));
    }
}

//! JSON file catalog.
//!
//! The file holds an array of product records:
//!
//! ```json
//! [
//!   {
//!     "id": 42,
//!     "title": "Widget & Gadget",
//!     "excerpt": "<p>Does both.</p>",
//!     "link": "https://shop.example/product/widget/",
//!     "image": null,
//!     "price": "19.90",
//!     "in_stock": true,
//!     "categories": ["Tools"],
//!     "tags": ["sale"],
//!     "status": "publish"
//!   }
//! ]
//! ```

use super::{Catalog, CatalogError, Product, select_published};
use crate::{debug, feed::ExcludedTags};
use std::fs;
use std::path::PathBuf;

/// Catalog backed by a JSON export. Re-read on every query so each feed
/// run sees the current data.
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<Vec<Product>, CatalogError> {
        let content =
            fs::read_to_string(&self.path).map_err(|e| CatalogError::Io(self.path.clone(), e))?;
        let products: Vec<Product> =
            serde_json::from_str(&content).map_err(|e| CatalogError::Json(self.path.clone(), e))?;
        debug!("catalog"; "loaded {} records from {}", products.len(), self.path.display());
        Ok(products)
    }
}

impl Catalog for JsonCatalog {
    fn published_products(&self, exclude: &ExcludedTags) -> Result<Vec<Product>, CatalogError> {
        Ok(select_published(self.load()?, exclude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CATALOG: &str = r#"[
        {"id": 1, "title": "Kept", "tags": ["sale"]},
        {"id": 2, "title": "Wholesale", "tags": ["chondrikis"]},
        {"id": 3, "title": "Hidden", "status": "private"}
    ]"#;

    #[test]
    fn test_reads_and_filters() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.json");
        fs::write(&path, CATALOG).unwrap();

        let catalog = JsonCatalog::new(&path);
        let all = catalog.published_products(&ExcludedTags::default()).unwrap();
        assert_eq!(all.len(), 2);

        let filtered = catalog
            .published_products(&ExcludedTags::parse("chondrikis"))
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Kept");
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let catalog = JsonCatalog::new(dir.path().join("nope.json"));
        let err = catalog
            .published_products(&ExcludedTags::default())
            .unwrap_err();
        assert!(matches!(err, CatalogError::Io(..)));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn test_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.json");
        fs::write(&path, "{not json").unwrap();

        let err = JsonCatalog::new(&path)
            .published_products(&ExcludedTags::default())
            .unwrap_err();
        assert!(matches!(err, CatalogError::Json(..)));
    }

    #[test]
    fn test_numeric_prices_keep_source_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.json");
        fs::write(
            &path,
            r#"[{"id": 1, "title": "A", "price": 19.90}, {"id": 2, "title": "B", "price": 1e2}]"#,
        )
        .unwrap();

        let products = JsonCatalog::new(&path)
            .published_products(&ExcludedTags::default())
            .unwrap();
        let prices: Vec<&str> = products.iter().map(|p| p.price.as_str()).collect();
        assert_eq!(prices, ["19.90", "1e2"]);
    }

    #[test]
    fn test_rereads_on_each_query() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.json");
        fs::write(&path, "[]").unwrap();

        let catalog = JsonCatalog::new(&path);
        assert!(catalog.published_products(&ExcludedTags::default()).unwrap().is_empty());

        fs::write(&path, CATALOG).unwrap();
        assert_eq!(
            catalog.published_products(&ExcludedTags::default()).unwrap().len(),
            2
        );
    }
}

//! Product catalog access.
//!
//! The feed only needs one query: every published product, minus those
//! carrying an excluded tag. [`JsonCatalog`] reads it from a
//! `products.json` export, re-read on every query.

mod json;
mod product;

pub use json::JsonCatalog;
pub use product::Product;

use crate::feed::ExcludedTags;
use std::path::PathBuf;
use thiserror::Error;

/// Catalog read failures.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error when reading catalog `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid catalog data in `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),
}

/// Read side of the product datastore.
pub trait Catalog: Send + Sync {
    /// All published products not tagged with any slug in `exclude`.
    ///
    /// An empty `exclude` applies no tag filter.
    fn published_products(&self, exclude: &ExcludedTags) -> Result<Vec<Product>, CatalogError>;
}

/// Keep published products whose tags avoid `exclude`, preserving order.
pub fn select_published(
    products: impl IntoIterator<Item = Product>,
    exclude: &ExcludedTags,
) -> Vec<Product> {
    products
        .into_iter()
        .filter(Product::is_published)
        .filter(|p| !exclude.matches_any(p.tags.as_slice()))
        .collect()
}

/// Catalog held in memory.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    products: Vec<Product>,
}

#[cfg(test)]
impl MemoryCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

#[cfg(test)]
impl Catalog for MemoryCatalog {
    fn published_products(&self, exclude: &ExcludedTags) -> Result<Vec<Product>, CatalogError> {
        Ok(select_published(self.products.iter().cloned(), exclude))
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Build a published product with the given tags.
#[cfg(test)]
pub fn test_product(id: u64, title: &str, tags: &[&str]) -> Product {
    Product {
        id,
        title: title.to_string(),
        excerpt: String::new(),
        link: format!("https://shop.example/product/{id}/"),
        image: None,
        price: "10.00".to_string(),
        in_stock: true,
        categories: vec![],
        tags: tags.iter().map(|t| t.to_string()).collect(),
        status: product::ProductStatus::Publish,
    }
}

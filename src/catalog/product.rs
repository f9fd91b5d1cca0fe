//! Product records as the catalog stores them.

use serde::{Deserialize, Deserializer, Serialize};

/// Publication status of a catalog entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Publish,
    Draft,
    Pending,
    Private,
}

/// A product read from the catalog. The feed never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    /// Short description.
    #[serde(default)]
    pub excerpt: String,
    /// Public product URL.
    #[serde(default)]
    pub link: String,
    /// Primary image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Price in the catalog's own representation (never reformatted).
    #[serde(default, deserialize_with = "price_repr")]
    pub price: String,
    #[serde(default)]
    pub in_stock: bool,
    /// Category names.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Tag slugs.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: ProductStatus,
}

impl Product {
    pub fn is_published(&self) -> bool {
        self.status == ProductStatus::Publish
    }
}

/// Accept both `"19.90"` and `19.90` for prices.
///
/// Numbers keep their source text (`arbitrary_precision`), so `19.90`
/// stays `19.90` and `1e2` stays `1e2`.
fn price_repr<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "price must be a string or a number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_record_defaults() {
        let product: Product = serde_json::from_str(r#"{"id": 7, "title": "Mug"}"#).unwrap();
        assert_eq!(product.id, 7);
        assert_eq!(product.image, None);
        assert_eq!(product.price, "");
        assert!(!product.in_stock);
        assert!(product.categories.is_empty());
        assert!(product.is_published());
    }

    #[test]
    fn test_price_string_kept_verbatim() {
        let product: Product =
            serde_json::from_str(r#"{"id": 1, "title": "A", "price": "19.90"}"#).unwrap();
        assert_eq!(product.price, "19.90");
    }

    #[test]
    fn test_price_number() {
        let product: Product =
            serde_json::from_str(r#"{"id": 1, "title": "A", "price": 5}"#).unwrap();
        assert_eq!(product.price, "5");
    }

    #[test]
    fn test_price_number_keeps_source_text() {
        for raw in ["19.90", "1e2", "5.0", "0.10"] {
            let json = format!(r#"{{"id": 1, "title": "A", "price": {raw}}}"#);
            let product: Product = serde_json::from_str(&json).unwrap();
            assert_eq!(product.price, raw);
        }
    }

    #[test]
    fn test_price_rejects_other_types() {
        let result = serde_json::from_str::<Product>(r#"{"id": 1, "title": "A", "price": [1]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_price_null() {
        let product: Product =
            serde_json::from_str(r#"{"id": 1, "title": "A", "price": null}"#).unwrap();
        assert_eq!(product.price, "");
    }

    #[test]
    fn test_status() {
        let product: Product =
            serde_json::from_str(r#"{"id": 1, "title": "A", "status": "draft"}"#).unwrap();
        assert_eq!(product.status, ProductStatus::Draft);
        assert!(!product.is_published());
    }
}

//! Feed document rendering.
//!
//! # Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <products>
//!   <product>
//!     <id>42</id>
//!     <title>Widget &amp; Gadget</title>
//!     <description>Does both.</description>
//!     <link>https://shop.example/product/widget/</link>
//!     <image_link></image_link>
//!     <price>19.90</price>
//!     <stock_status>In Stock</stock_status>
//!     <category>Tools</category>
//!   </product>
//! </products>
//! ```

use super::escape::{escape_text, plain_text};
use crate::catalog::Product;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
pub const EMPTY_PLACEHOLDER: &str = "<!-- No products found -->";
pub const IN_STOCK: &str = "In Stock";
pub const OUT_OF_STOCK: &str = "Out of Stock";
pub const UNCATEGORIZED: &str = "Uncategorized";

/// One `<product>` element as plain text (markup stripped, not yet escaped).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub link: String,
    pub image_link: String,
    pub price: String,
    pub stock_status: &'static str,
    pub category: String,
}

impl FeedEntry {
    pub fn from_product(product: &Product) -> Self {
        // Stripped one by one so an unterminated tag stays inside its own name.
        let names: Vec<String> = product
            .categories
            .iter()
            .map(|name| plain_text(name))
            .filter(|name| !name.is_empty())
            .collect();
        let category = if names.is_empty() {
            UNCATEGORIZED.to_string()
        } else {
            names.join(", ")
        };

        Self {
            id: product.id,
            title: plain_text(&product.title),
            description: plain_text(&product.excerpt),
            link: plain_text(&product.link),
            image_link: product.image.as_deref().map(plain_text).unwrap_or_default(),
            price: plain_text(&product.price),
            stock_status: if product.in_stock { IN_STOCK } else { OUT_OF_STOCK },
            category,
        }
    }

    /// Field name/value pairs in output order.
    fn fields(&self) -> [(&'static str, String); 8] {
        [
            ("id", self.id.to_string()),
            ("title", self.title.clone()),
            ("description", self.description.clone()),
            ("link", self.link.clone()),
            ("image_link", self.image_link.clone()),
            ("price", self.price.clone()),
            ("stock_status", self.stock_status.to_string()),
            ("category", self.category.clone()),
        ]
    }
}

/// The whole feed, ready to render.
#[derive(Debug, Clone, Default)]
pub struct ProductFeed {
    entries: Vec<FeedEntry>,
}

impl ProductFeed {
    pub fn from_products(products: &[Product]) -> Self {
        Self {
            entries: products.iter().map(FeedEntry::from_product).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_xml(self) -> String {
        let mut xml = String::with_capacity(256 + self.entries.len() * 512);

        xml.push_str(XML_DECLARATION);
        xml.push('\n');
        xml.push_str("<products>\n");

        if self.is_empty() {
            xml.push_str(EMPTY_PLACEHOLDER);
            xml.push('\n');
        }

        for entry in &self.entries {
            xml.push_str("  <product>\n");
            for (name, value) in entry.fields() {
                xml.push_str("    <");
                xml.push_str(name);
                xml.push('>');
                xml.push_str(&escape_text(&value));
                xml.push_str("</");
                xml.push_str(name);
                xml.push_str(">\n");
            }
            xml.push_str("  </product>\n");
        }

        xml.push_str("</products>\n");
        xml
    }
}

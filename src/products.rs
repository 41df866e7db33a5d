//! Products
//!
//! Product snapshots arrive from the external catalog collaborator; the
//! engine never fabricates or mutates one.

use std::fmt;

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

/// Catalog-assigned product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Catalog identifier
    pub id: ProductId,

    /// Product title
    pub title: String,

    /// Unit price
    pub price: Money<'static, Currency>,

    /// Category name
    pub category: String,

    /// Thumbnail media reference
    pub thumbnail: String,

    /// Units in stock at the catalog
    pub stock: u32,
}

impl Product {
    /// Creates a product snapshot with empty media and category fields.
    #[must_use]
    pub fn new(id: ProductId, title: impl Into<String>, price: Money<'static, Currency>) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            category: String::new(),
            thumbnail: String::new(),
            stock: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;

    use super::*;

    #[test]
    fn new_leaves_catalog_fields_empty() {
        let product = Product::new(ProductId(1), "Essence Mascara", Money::from_minor(999, USD));

        assert_eq!(product.id, ProductId(1));
        assert_eq!(product.title, "Essence Mascara");
        assert_eq!(product.price, Money::from_minor(999, USD));
        assert!(product.category.is_empty());
        assert!(product.thumbnail.is_empty());
        assert_eq!(product.stock, 0);
    }

    #[test]
    fn product_id_displays_raw_value() {
        assert_eq!(ProductId(42).to_string(), "42");
    }
}

//! Favorites
//!
//! A de-duplicated, insertion-ordered list of favorited products.
//! Independent of the cart: a product may be favorited, in-cart, both, or
//! neither.

use crate::products::{Product, ProductId};

/// Favorites
#[derive(Debug, Default)]
pub struct Favorites {
    products: Vec<Product>,
}

impl Favorites {
    /// Create an empty favorites list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a product unless a favorite with the same id already exists.
    ///
    /// Returns `true` if the product was added.
    pub fn add(&mut self, product: Product) -> bool {
        if self.contains(product.id) {
            return false;
        }

        self.products.push(product);

        true
    }

    /// Remove a favorite by product id, returning it if present.
    pub fn remove(&mut self, id: ProductId) -> Option<Product> {
        let index = self.products.iter().position(|product| product.id == id)?;

        Some(self.products.remove(index))
    }

    /// Whether a product id is favorited.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.products.iter().any(|product| product.id == id)
    }

    /// Remove all favorites.
    pub fn clear(&mut self) {
        self.products.clear();
    }

    /// Iterate over favorites in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Number of favorited products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if no products are favorited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};

    use super::*;

    fn product(id: u64) -> Product {
        Product::new(ProductId(id), format!("Product {id}"), Money::from_minor(100, USD))
    }

    #[test]
    fn add_deduplicates_by_id() {
        let mut favorites = Favorites::new();

        assert!(favorites.add(product(1)));
        assert!(!favorites.add(product(1)));

        assert_eq!(favorites.len(), 1);
    }

    #[test]
    fn remove_missing_id_is_a_no_op() {
        let mut favorites = Favorites::new();

        favorites.add(product(1));

        assert!(favorites.remove(ProductId(2)).is_none());
        assert_eq!(favorites.len(), 1);
    }

    #[test]
    fn remove_returns_the_product() {
        let mut favorites = Favorites::new();

        favorites.add(product(1));
        favorites.add(product(2));

        let removed = favorites.remove(ProductId(1));

        assert_eq!(removed.map(|product| product.id), Some(ProductId(1)));
        assert!(!favorites.contains(ProductId(1)));
        assert!(favorites.contains(ProductId(2)));
    }

    #[test]
    fn iteration_keeps_insertion_order() {
        let mut favorites = Favorites::new();

        favorites.add(product(3));
        favorites.add(product(1));
        favorites.add(product(2));

        let ids: Vec<ProductId> = favorites.iter().map(|product| product.id).collect();

        assert_eq!(ids, vec![ProductId(3), ProductId(1), ProductId(2)]);
    }

    #[test]
    fn clear_empties_the_list() {
        let mut favorites = Favorites::new();

        favorites.add(product(1));
        favorites.clear();

        assert!(favorites.is_empty());
    }
}

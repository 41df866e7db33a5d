//! Cart
//!
//! The cart ledger: an insertion-ordered list of line items, unique by
//! product id, with a cached running total. Every mutation updates the
//! lines and the total in one step, so no caller can observe a state
//! where the two disagree.

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::products::{Product, ProductId};

/// Errors related to cart mutations or totals.
#[derive(Debug, Error)]
pub enum CartError {
    /// A product's currency differs from the cart currency (product currency, cart currency).
    #[error("Product has currency {0}, but cart has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// A quantity below 1 was requested; use `remove` to drop a line instead.
    #[error("Quantity must be at least 1, got {0}")]
    InvalidQuantity(u32),

    /// A line total or quantity could not be represented in minor units.
    #[error("Amount overflowed minor unit arithmetic")]
    AmountOverflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// One product-plus-quantity row in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineItem {
    product: Product,
    quantity: u32,
}

impl CartLineItem {
    /// Returns the product snapshot for this line.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Returns the quantity of this line, always at least 1.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns `price × quantity` for this line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::AmountOverflow`] if the product of price and
    /// quantity cannot be represented in minor units.
    pub fn line_total(&self) -> Result<Money<'static, Currency>, CartError> {
        line_total(&self.product.price, self.quantity)
    }
}

/// Cart
#[derive(Debug)]
pub struct Cart {
    lines: Vec<CartLineItem>,
    total: Money<'static, Currency>,
    currency: &'static Currency,
}

impl Cart {
    /// Create a new empty cart in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: Vec::new(),
            total: Money::from_minor(0, currency),
            currency,
        }
    }

    /// Add one unit of a product to the cart.
    ///
    /// An existing line for the same product id has its quantity
    /// incremented; otherwise a new line with quantity 1 is appended. The
    /// engine never rejects a repeated add — whether "add" stays enabled
    /// for an in-cart product is the caller's call.
    ///
    /// An increment grows the total by the stored line's unit price, so a
    /// divergent incoming snapshot cannot drift the cached total.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if the product's currency differs from the
    /// cart currency, or if the quantity or total overflows.
    pub fn add(&mut self, product: Product) -> Result<(), CartError> {
        let product_currency = product.price.currency();

        if product_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if let Some(line) = self.lines.iter_mut().find(|line| line.product.id == product.id) {
            let next_quantity = line
                .quantity
                .checked_add(1)
                .ok_or(CartError::AmountOverflow)?;
            let new_total = self.total.add(line.product.price)?;

            line.quantity = next_quantity;
            self.total = new_total;
        } else {
            let new_total = self.total.add(product.price)?;

            self.lines.push(CartLineItem {
                product,
                quantity: 1,
            });
            self.total = new_total;
        }

        self.check_total();

        Ok(())
    }

    /// Remove a product's line from the cart, returning it if present.
    ///
    /// Removing an absent id is a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if the total adjustment overflows.
    pub fn remove(&mut self, id: ProductId) -> Result<Option<CartLineItem>, CartError> {
        let Some(index) = self.lines.iter().position(|line| line.product.id == id) else {
            return Ok(None);
        };

        let Some(line) = self.lines.get(index) else {
            return Ok(None);
        };

        let new_total = self.total.sub(line.line_total()?)?;
        let removed = self.lines.remove(index);

        self.total = new_total;
        self.check_total();

        Ok(Some(removed))
    }

    /// Replace the quantity of a product's line.
    ///
    /// A quantity below 1 is rejected; dropping a line goes through
    /// [`Cart::remove`]. Updating an absent id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for a quantity below 1, or a
    /// `CartError` if the total adjustment overflows.
    pub fn set_quantity(&mut self, id: ProductId, quantity: u32) -> Result<(), CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        let Some(line) = self.lines.iter_mut().find(|line| line.product.id == id) else {
            return Ok(());
        };

        let old_line_total = line_total(&line.product.price, line.quantity)?;
        let new_line_total = line_total(&line.product.price, quantity)?;
        let new_total = self.total.sub(old_line_total)?.add(new_line_total)?;

        line.quantity = quantity;
        self.total = new_total;

        self.check_total();

        Ok(())
    }

    /// Empty the cart and reset the total to zero.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.total = Money::from_minor(0, self.currency);
    }

    /// Whether the cart holds a line for the given product id.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.lines.iter().any(|line| line.product.id == id)
    }

    /// Get the line for a product id, if present.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartLineItem> {
        self.lines.iter().find(|line| line.product.id == id)
    }

    /// Iterate over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLineItem> {
        self.lines.iter()
    }

    /// Number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The cached running total, `Σ price × quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }

    /// The currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Recompute the ledger sum in minor units, independent of the cache.
    fn recomputed_total_minor(&self) -> i64 {
        self.lines
            .iter()
            .map(|line| {
                line.product
                    .price
                    .to_minor_units()
                    .saturating_mul(i64::from(line.quantity))
            })
            .sum()
    }

    fn check_total(&self) {
        debug_assert_eq!(
            self.total.to_minor_units(),
            self.recomputed_total_minor(),
            "cart total must equal the recomputed ledger sum"
        );
    }
}

/// Calculate `price × quantity` in minor units.
fn line_total(
    price: &Money<'static, Currency>,
    quantity: u32,
) -> Result<Money<'static, Currency>, CartError> {
    let minor = price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(CartError::AmountOverflow)?;

    Ok(Money::from_minor(minor, price.currency()))
}

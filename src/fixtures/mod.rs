//! Fixtures
//!
//! YAML-backed product and coupon sets for demos and tests. The product
//! catalog proper is an external collaborator; a fixture stands in for
//! it by supplying ready-made [`Product`] snapshots.

use std::{fs, path::PathBuf};

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    coupons::CouponCatalog,
    fixtures::{coupons::CouponsFixture, products::ProductsFixture},
    products::{Product, ProductId},
    store::Store,
};

pub mod coupons;
pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between fixture entries
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Products in fixture order
    products: Vec<Product>,

    /// Coupon rules loaded for this set
    coupons: CouponCatalog,

    /// Currency shared by every entry in the set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: Vec::new(),
            coupons: CouponCatalog::default(),
            currency: None,
        }
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if an
    /// entry's currency differs from the rest of the set.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        for product_fixture in fixture.products {
            let product = Product::try_from(product_fixture)?;

            self.check_currency(product.price.currency())?;
            self.products.push(product);
        }

        Ok(self)
    }

    /// Load coupon rules from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a rate
    /// is outside 0–100%, or if a cap's currency differs from the set.
    pub fn load_coupons(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("coupons").join(format!("{name}.yml"));
        let contents = fs::read_to_string(file_path)?;
        let fixture: CouponsFixture = serde_norway::from_str(&contents)?;

        let mut rules = Vec::with_capacity(fixture.coupons.len());

        for coupon_fixture in fixture.coupons {
            let rule = coupon_fixture.try_into_rule()?;

            self.check_currency(rule.max_discount().currency())?;
            rules.push(rule);
        }

        self.coupons = CouponCatalog::new(rules);

        Ok(self)
    }

    /// Load the products and coupons of a named fixture set
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_products(name)?;
        fixture.load_coupons(name)?;

        Ok(fixture)
    }

    /// The loaded products, in fixture order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a loaded product by id.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// The loaded coupon catalog.
    #[must_use]
    pub fn coupons(&self) -> &CouponCatalog {
        &self.coupons
    }

    /// The currency shared by the set.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCurrency`] before anything is loaded.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    /// Build a store in the fixture's currency with its coupon catalog.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCurrency`] before anything is loaded.
    pub fn store(&self) -> Result<Store, FixtureError> {
        Ok(Store::with_catalog(self.currency()?, self.coupons.clone()))
    }

    fn check_currency(&mut self, currency: &'static Currency) -> Result<(), FixtureError> {
        match self.currency {
            None => {
                self.currency = Some(currency);
                Ok(())
            }
            Some(expected) if expected == currency => Ok(()),
            Some(expected) => Err(FixtureError::CurrencyMismatch(
                expected.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            )),
        }
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::coupons::CouponRule;

    use super::*;

    #[test]
    fn from_set_loads_products_and_coupons() -> TestResult {
        let fixture = Fixture::from_set("store")?;

        assert!(!fixture.products().is_empty());
        assert!(!fixture.coupons().is_empty());
        assert_eq!(fixture.currency()?, USD);

        Ok(())
    }

    #[test]
    fn loaded_products_are_addressable_by_id() -> TestResult {
        let fixture = Fixture::from_set("store")?;

        let product = fixture.product(ProductId(1));

        assert!(product.is_some());
        assert!(fixture.product(ProductId(999_999)).is_none());

        Ok(())
    }

    #[test]
    fn loaded_coupons_match_the_shipped_set() -> TestResult {
        let fixture = Fixture::from_set("store")?;

        let rule = fixture.coupons().find("ram50");

        assert_eq!(
            rule.map(CouponRule::max_discount),
            Some(Money::from_minor(10_000, USD))
        );

        Ok(())
    }

    #[test]
    fn store_uses_the_fixture_currency_and_catalog() -> TestResult {
        let fixture = Fixture::from_set("store")?;
        let store = fixture.store()?;

        assert_eq!(store.currency(), USD);
        assert!(store.coupons().find("RAM50").is_some());

        Ok(())
    }

    #[test]
    fn empty_fixture_has_no_currency() {
        let fixture = Fixture::new();

        assert!(matches!(fixture.currency(), Err(FixtureError::NoCurrency)));
        assert_eq!(fixture.base_path, PathBuf::from("./fixtures"));
    }

    #[test]
    fn missing_set_is_an_io_error() {
        let result = Fixture::from_set("no-such-set");

        assert!(matches!(result, Err(FixtureError::Io(_))));
    }
}

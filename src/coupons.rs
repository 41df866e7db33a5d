//! Coupons
//!
//! The static coupon catalog: a read-only, case-insensitive lookup of
//! code → discount rule, loaded once at process start.

use decimal_percentage::Percentage;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};

/// A named discount policy: a percentage rate with an absolute cap.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponRule {
    code: String,
    percent: Percentage,
    max_discount: Money<'static, Currency>,
}

impl CouponRule {
    /// Create a rule. The code is stored uppercase; `percent` is a
    /// fraction (`0.5` for a 50% discount).
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        percent: Percentage,
        max_discount: Money<'static, Currency>,
    ) -> Self {
        Self {
            code: code.into().to_uppercase(),
            percent,
            max_discount,
        }
    }

    /// The canonical (uppercase) coupon code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The discount rate as a fraction.
    #[must_use]
    pub fn percent(&self) -> Percentage {
        self.percent
    }

    /// The absolute cap on the discount amount.
    #[must_use]
    pub fn max_discount(&self) -> Money<'static, Currency> {
        self.max_discount
    }
}

/// Read-only lookup of coupon codes.
#[derive(Debug, Clone, Default)]
pub struct CouponCatalog {
    rules: FxHashMap<String, CouponRule>,
}

impl CouponCatalog {
    /// Build a catalog from a set of rules. Later rules win duplicate codes.
    #[must_use]
    pub fn new(rules: impl IntoIterator<Item = CouponRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| (rule.code.clone(), rule))
            .collect();

        Self { rules }
    }

    /// The shipped coupon set, with caps in the given currency.
    #[must_use]
    pub fn builtin(currency: &'static Currency) -> Self {
        Self::new([
            CouponRule::new("RAM50", Percentage::from(0.50), Money::from_minor(10_000, currency)),
            CouponRule::new("SITA40", Percentage::from(0.40), Money::from_minor(8_000, currency)),
            CouponRule::new(
                "HANUMAN30",
                Percentage::from(0.30),
                Money::from_minor(6_000, currency),
            ),
            CouponRule::new("RAVAN20", Percentage::from(0.20), Money::from_minor(4_000, currency)),
            CouponRule::new("LAXMAN10", Percentage::from(0.10), Money::from_minor(2_000, currency)),
        ])
    }

    /// Look up a rule by code, case-insensitively and exactly.
    ///
    /// An unknown code yields `None`, never an error.
    #[must_use]
    pub fn find(&self, code: &str) -> Option<&CouponRule> {
        self.rules.get(&code.to_uppercase())
    }

    /// Iterate over the rules, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &CouponRule> {
        self.rules.values()
    }

    /// Number of rules in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the catalog holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;

    use super::*;

    #[test]
    fn find_is_case_insensitive() {
        let catalog = CouponCatalog::builtin(USD);

        let lower = catalog.find("ram50");
        let mixed = catalog.find("Ram50");
        let upper = catalog.find("RAM50");

        assert!(lower.is_some());
        assert_eq!(lower, mixed);
        assert_eq!(mixed, upper);
    }

    #[test]
    fn find_requires_an_exact_code() {
        let catalog = CouponCatalog::builtin(USD);

        assert!(catalog.find("RAM").is_none());
        assert!(catalog.find("RAM500").is_none());
        assert!(catalog.find("").is_none());
    }

    #[test]
    fn unknown_code_is_a_soft_miss() {
        let catalog = CouponCatalog::builtin(USD);

        assert!(catalog.find("BOGUS").is_none());
    }

    #[test]
    fn builtin_set_has_five_rules() {
        let catalog = CouponCatalog::builtin(USD);

        assert_eq!(catalog.len(), 5);

        let rule = catalog.find("HANUMAN30").map(CouponRule::percent);
        assert_eq!(rule, Some(Percentage::from(0.30)));
    }

    #[test]
    fn codes_are_stored_uppercase() {
        let rule = CouponRule::new("deal5", Percentage::from(0.05), Money::from_minor(500, USD));

        assert_eq!(rule.code(), "DEAL5");

        let catalog = CouponCatalog::new([rule]);

        assert!(catalog.find("DeAl5").is_some());
    }

    #[test]
    fn later_duplicate_codes_win() {
        let catalog = CouponCatalog::new([
            CouponRule::new("X1", Percentage::from(0.10), Money::from_minor(100, USD)),
            CouponRule::new("X1", Percentage::from(0.20), Money::from_minor(100, USD)),
        ]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.find("x1").map(CouponRule::percent),
            Some(Percentage::from(0.20))
        );
    }
}

//! Pricing
//!
//! The pricing calculator: a pure derivation of discount and final total
//! from a cart subtotal and an optionally applied coupon. Never stored —
//! recomputed on demand from its inputs.
//!
//! All arithmetic happens on minor units, with [`Decimal`] for the
//! fractional step, so repeated add/remove/update cycles cannot drift.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::coupons::CouponRule;

/// Errors specific to coupon application and quote calculation.
#[derive(Debug, Error)]
pub enum PricingError {
    /// The coupon code is not in the catalog — user-correctable, no state change.
    #[error("Invalid coupon code: {0}")]
    InvalidCoupon(String),

    /// The coupon cap's currency differs from the subtotal currency (cap, subtotal).
    #[error("Coupon cap has currency {0}, but subtotal has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// A discount amount could not be safely represented in minor units.
    #[error("Discount conversion overflowed minor unit arithmetic")]
    AmountConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A coupon in effect: the matched rule plus the code as the user typed it.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedCoupon {
    entered_code: String,
    rule: CouponRule,
}

impl AppliedCoupon {
    /// Pair an entered code with the rule it matched.
    #[must_use]
    pub fn new(entered_code: impl Into<String>, rule: CouponRule) -> Self {
        Self {
            entered_code: entered_code.into(),
            rule,
        }
    }

    /// The code exactly as typed, preserved for display.
    #[must_use]
    pub fn entered_code(&self) -> &str {
        &self.entered_code
    }

    /// The matched catalog rule.
    #[must_use]
    pub fn rule(&self) -> &CouponRule {
        &self.rule
    }
}

/// A priced cart snapshot: subtotal, discount, and the final total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    subtotal: Money<'static, Currency>,
    discount: Money<'static, Currency>,
    total: Money<'static, Currency>,
}

impl Quote {
    /// The cart total before any discount.
    #[must_use]
    pub fn subtotal(&self) -> Money<'static, Currency> {
        self.subtotal
    }

    /// The discount amount, `min(subtotal × percent, cap)`.
    #[must_use]
    pub fn discount(&self) -> Money<'static, Currency> {
        self.discount
    }

    /// The final total, `subtotal − discount`.
    #[must_use]
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }
}

/// Derive a quote from a subtotal and an optionally applied coupon.
///
/// # Errors
///
/// Returns a `PricingError` if the coupon cap's currency differs from the
/// subtotal currency, or if a discount amount cannot be represented in
/// minor units.
pub fn quote(
    subtotal: Money<'static, Currency>,
    coupon: Option<&AppliedCoupon>,
) -> Result<Quote, PricingError> {
    let Some(applied) = coupon else {
        return Ok(Quote {
            subtotal,
            discount: Money::from_minor(0, subtotal.currency()),
            total: subtotal,
        });
    };

    let discount = discount_for(subtotal, applied.rule())?;
    let total = subtotal.sub(discount)?;

    Ok(Quote {
        subtotal,
        discount,
        total,
    })
}

/// Calculate the capped discount a rule yields on a subtotal.
fn discount_for(
    subtotal: Money<'static, Currency>,
    rule: &CouponRule,
) -> Result<Money<'static, Currency>, PricingError> {
    let cap = rule.max_discount();

    if cap.currency() != subtotal.currency() {
        return Err(PricingError::CurrencyMismatch(
            cap.currency().iso_alpha_code,
            subtotal.currency().iso_alpha_code,
        ));
    }

    let raw_minor = percent_of_minor(rule.percent(), subtotal.to_minor_units())?;
    let capped_minor = raw_minor.min(cap.to_minor_units());

    Ok(Money::from_minor(capped_minor, subtotal.currency()))
}

/// Calculate a percentage of a minor unit amount, rounded to whole minor units.
fn percent_of_minor(percent: Percentage, minor: i64) -> Result<i64, PricingError> {
    let minor = Decimal::from_i64(minor).ok_or(PricingError::AmountConversion)?;

    (percent * Decimal::ONE) // Percentage does not expose its inner Decimal
        .checked_mul(minor)
        .ok_or(PricingError::AmountConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::AmountConversion)
}

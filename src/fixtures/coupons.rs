//! Coupon Fixtures

use decimal_percentage::Percentage;
use rusty_money::Money;
use serde::Deserialize;

use crate::{coupons::CouponRule, fixtures::FixtureError, fixtures::products::parse_price};

/// Wrapper for coupons in YAML
#[derive(Debug, Deserialize)]
pub struct CouponsFixture {
    /// Coupon rules in fixture order
    pub coupons: Vec<CouponFixture>,
}

/// Coupon fixture from YAML
#[derive(Debug, Deserialize)]
pub struct CouponFixture {
    /// Coupon code
    pub code: String,

    /// Discount rate (e.g., "50%" or "0.5")
    pub percent: String,

    /// Absolute discount cap (e.g., "100.00 USD")
    pub max_discount: String,
}

impl CouponFixture {
    /// Convert to a [`CouponRule`]
    ///
    /// # Errors
    ///
    /// Returns an error if the rate or cap cannot be parsed, or if the
    /// rate falls outside 0–100%.
    pub fn try_into_rule(self) -> Result<CouponRule, FixtureError> {
        let percent = parse_percent(&self.percent)?;
        let (cap_minor, currency) = parse_price(&self.max_discount)?;

        Ok(CouponRule::new(
            self.code,
            percent,
            Money::from_minor(cap_minor, currency),
        ))
    }
}

/// Parse a percentage string (e.g., "50%" or "0.5") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "50%" for 50%
/// - Decimal format: "0.5" for 50%
///
/// Rates outside 0–100% are rejected.
///
/// # Errors
///
/// Returns an error if the string cannot be parsed or the rate is out of
/// range.
pub fn parse_percent(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    let value = if let Some(percent_str) = trimmed.strip_suffix('%') {
        percent_str
            .trim()
            .parse::<f64>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?
            / 100.0
    } else {
        trimmed
            .parse::<f64>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?
    };

    if !(0.0..=1.0).contains(&value) {
        return Err(FixtureError::InvalidPercentage(s.to_string()));
    }

    Ok(Percentage::from(value))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;

    use super::*;

    #[test]
    fn parse_percent_accepts_percentage_format() -> Result<(), FixtureError> {
        let percent = parse_percent("50%")?;

        assert_eq!(percent, Percentage::from(0.5));

        Ok(())
    }

    #[test]
    fn parse_percent_accepts_decimal_format() -> Result<(), FixtureError> {
        let percent = parse_percent("0.5")?;

        assert_eq!(percent, Percentage::from(0.5));

        Ok(())
    }

    #[test]
    fn parse_percent_accepts_100_percent() -> Result<(), FixtureError> {
        let percent = parse_percent("100%")?;

        assert_eq!(percent, Percentage::from(1.0));

        Ok(())
    }

    #[test]
    fn parse_percent_rejects_rates_above_100() {
        assert!(matches!(
            parse_percent("150%"),
            Err(FixtureError::InvalidPercentage(_))
        ));
        assert!(matches!(
            parse_percent("1.5"),
            Err(FixtureError::InvalidPercentage(_))
        ));
    }

    #[test]
    fn parse_percent_rejects_negative_rates() {
        assert!(matches!(
            parse_percent("-10%"),
            Err(FixtureError::InvalidPercentage(_))
        ));
    }

    #[test]
    fn parse_percent_rejects_invalid_format() {
        assert!(matches!(
            parse_percent("half off"),
            Err(FixtureError::InvalidPercentage(_))
        ));
    }

    #[test]
    fn parse_percent_handles_whitespace() -> Result<(), FixtureError> {
        let percent = parse_percent("  50%  ")?;

        assert_eq!(percent, Percentage::from(0.5));

        Ok(())
    }

    #[test]
    fn fixture_converts_to_a_rule() -> Result<(), FixtureError> {
        let fixture = CouponFixture {
            code: "ram50".to_string(),
            percent: "50%".to_string(),
            max_discount: "100.00 USD".to_string(),
        };

        let rule = fixture.try_into_rule()?;

        assert_eq!(rule.code(), "RAM50");
        assert_eq!(rule.percent(), Percentage::from(0.5));
        assert_eq!(rule.max_discount(), Money::from_minor(10_000, USD));

        Ok(())
    }
}

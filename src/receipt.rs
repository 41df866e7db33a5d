//! Receipt
//!
//! A printable summary of the cart at checkout: one row per line item,
//! then subtotal, coupon discount, and final total.

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartError},
    pricing::{self, AppliedCoupon, PricingError},
};

/// Errors that can occur when building or writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error pricing the cart against the applied coupon.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Error computing a line total.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// One printed row: a cart line with its extended total.
#[derive(Debug, Clone)]
pub struct ReceiptLine {
    /// Product title
    pub title: String,

    /// Unit price
    pub unit_price: Money<'static, Currency>,

    /// Line quantity
    pub quantity: u32,

    /// `unit_price × quantity`
    pub line_total: Money<'static, Currency>,
}

/// Final receipt for a priced cart.
#[derive(Debug, Clone)]
pub struct Receipt {
    lines: SmallVec<[ReceiptLine; 8]>,
    subtotal: Money<'static, Currency>,
    discount: Money<'static, Currency>,
    total: Money<'static, Currency>,
    coupon_code: Option<String>,
    currency: &'static Currency,
}

impl Receipt {
    /// Build a receipt from the cart and the coupon in effect.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if a line total overflows or the
    /// discount arithmetic fails.
    pub fn from_cart(cart: &Cart, coupon: Option<&AppliedCoupon>) -> Result<Self, ReceiptError> {
        let quote = pricing::quote(cart.total(), coupon)?;

        let lines = cart
            .iter()
            .map(|line| {
                Ok(ReceiptLine {
                    title: line.product().title.clone(),
                    unit_price: line.product().price,
                    quantity: line.quantity(),
                    line_total: line.line_total()?,
                })
            })
            .collect::<Result<SmallVec<[ReceiptLine; 8]>, CartError>>()?;

        Ok(Receipt {
            lines,
            subtotal: quote.subtotal(),
            discount: quote.discount(),
            total: quote.total(),
            coupon_code: coupon.map(|applied| applied.entered_code().to_string()),
            currency: cart.currency(),
        })
    }

    /// The printed rows, in cart order.
    #[must_use]
    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    /// Total cost before the discount.
    #[must_use]
    pub fn subtotal(&self) -> Money<'static, Currency> {
        self.subtotal
    }

    /// The coupon discount amount.
    #[must_use]
    pub fn discount(&self) -> Money<'static, Currency> {
        self.discount
    }

    /// Amount payable after the discount.
    #[must_use]
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }

    /// The coupon code as entered, if one was applied.
    #[must_use]
    pub fn coupon_code(&self) -> Option<&str> {
        self.coupon_code.as_deref()
    }

    /// Currency used for all monetary values.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// The discount as a fraction of the subtotal.
    #[must_use]
    pub fn savings_percent(&self) -> Percentage {
        let discount_minor = self.discount.to_minor_units();
        let subtotal_minor = self.subtotal.to_minor_units();

        if subtotal_minor == 0 {
            return Percentage::from(0.0);
        }

        // Ratio in decimal space to avoid integer truncation.
        let discount_dec = Decimal::from_i64(discount_minor).unwrap_or(Decimal::ZERO);
        let subtotal_dec = Decimal::from_i64(subtotal_minor).unwrap_or(Decimal::ZERO);

        Percentage::from(discount_dec / subtotal_dec)
    }

    /// Prints the receipt to the given writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Unit Price", "Qty", "Total"]);

        for (index, line) in self.lines.iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", index + 1),
                line.title.clone(),
                format!("{}", line.unit_price),
                line.quantity.to_string(),
                format!("{}", line.line_total),
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());
        let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(1, separator);

        table.with(theme);
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..5), Alignment::right());

        writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

        self.write_summary(&mut out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let subtotal_label = " Subtotal:".to_string();
        let total_label = " Total:".to_string();

        let discount_line = self.coupon_code.as_deref().map(|code| {
            let percent_points = percent_points(self.savings_percent());

            (
                format!(" Coupon {code}:"),
                format!("({percent_points:.2}%) -{}  ", self.discount),
            )
        });

        let subtotal_value = format!("{}  ", self.subtotal);
        let total_value = format!("{}  ", self.total);

        let label_width = discount_line
            .as_ref()
            .map_or(0, |(label, _)| label.len())
            .max(subtotal_label.len())
            .max(total_label.len());

        let value_width = discount_line
            .as_ref()
            .map_or(0, |(_, value)| value.len())
            .max(subtotal_value.len())
            .max(total_value.len());

        write_summary_line(out, &subtotal_label, &subtotal_value, label_width, value_width)?;

        if let Some((label, value)) = discount_line {
            write_summary_line(out, &label, &value, label_width, value_width)?;
        }

        write_summary_line(out, &total_label, &total_value, label_width, value_width)?;

        writeln!(out).map_err(|_err| ReceiptError::IO)
    }
}

fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_width: usize,
    value_width: usize,
) -> Result<(), ReceiptError> {
    writeln!(out, "{label:<label_width$}{value:>value_width$}").map_err(|_err| ReceiptError::IO)
}

/// Converts a fractional percentage to percent points for display.
fn percent_points(percentage: Percentage) -> Decimal {
    ((percentage * Decimal::ONE) * Decimal::from_i64(100).unwrap_or(Decimal::ZERO)).round_dp(2)
}

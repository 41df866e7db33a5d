//! Utils

use clap::Parser;

/// Arguments for the storefront example
#[derive(Debug, Parser)]
pub struct StorefrontArgs {
    /// Fixture set to use for the products & coupons
    #[clap(short, long, default_value = "store")]
    pub fixture: String,

    /// Number of fixture products to add to the cart
    #[clap(short, long)]
    pub n: Option<usize>,

    /// Coupon code to apply at checkout
    #[clap(short, long)]
    pub coupon: Option<String>,

    /// Username to log in as
    #[clap(short, long, default_value = "kminchelle")]
    pub username: String,
}

//! Storefront Example
//!
//! This example walks the whole engine: log in, fill the cart from a
//! fixture set, apply a coupon, and print the receipt.
//!
//! Use `-f` to load a fixture set by name
//! Use `-n` to limit how many fixture products go into the cart
//! Use `-c` to apply a coupon code at checkout
//! Use `-u` to log in under a different username

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use till::{fixtures::Fixture, receipt::Receipt, session::Credentials, utils::StorefrontArgs};

/// Storefront Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = StorefrontArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let mut store = fixture.store()?;

    let identity = store.login(&Credentials::new(&args.username, "demo"));
    println!("Logged in as {}", identity.username);

    let count = args.n.unwrap_or_else(|| fixture.products().len());

    for product in fixture.products().iter().take(count) {
        store.add_to_cart(product.clone())?;
    }

    if let Some(code) = args.coupon.as_deref() {
        match store.apply_coupon(code) {
            Ok(applied) => println!("Applied coupon {}", applied.rule().code()),
            Err(error) => println!("{error}"),
        }
    }

    let receipt = Receipt::from_cart(store.cart(), store.applied_coupon())?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    receipt.write_to(&mut handle)?;

    store.logout();
    println!(
        "Logged out: cart holds {} lines, favorites hold {}.",
        store.cart().len(),
        store.favorites().len()
    );

    Ok(())
}

//! Till
//!
//! Till is a storefront state engine: a cart ledger with an always-consistent
//! running total, a favorites list, coupon pricing, session-bound cart
//! lifetime, and a serializable snapshot contract for client-side persistence.

pub mod cart;
pub mod coupons;
pub mod favorites;
pub mod filter;
pub mod fixtures;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod utils;

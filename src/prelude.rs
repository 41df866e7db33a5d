//! Till prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLineItem},
    coupons::{CouponCatalog, CouponRule},
    favorites::Favorites,
    filter::{FilterState, FilterUpdate, SortBy},
    fixtures::{Fixture, FixtureError},
    pricing::{AppliedCoupon, PricingError, Quote, quote},
    products::{Product, ProductId},
    receipt::{Receipt, ReceiptError, ReceiptLine},
    session::{Credentials, Identity, Session},
    snapshot::{PersistError, PersistenceAdapter, Snapshot, SnapshotError, YamlFileAdapter},
    store::{Store, StoreEvent, StoreObserver},
};

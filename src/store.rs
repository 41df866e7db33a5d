//! Store
//!
//! The process-wide state container: one `Store` instance owns the cart,
//! favorites, session, filter selection, and applied coupon, and every
//! mutation goes through it. There is no ambient global — whoever owns
//! the event loop constructs a `Store` at startup and passes it around.
//!
//! Mutating operations are synchronous and indivisible; observers are
//! notified after a mutation commits, never between the two halves of
//! one. Confined to a single thread or task, no locking is needed; an
//! embedder with several event sources serializes mutations by wrapping
//! the store in a mutex.

use std::fmt;

use rusty_money::iso::Currency;
use tracing::{debug, info};

use crate::{
    cart::{Cart, CartError, CartLineItem},
    coupons::CouponCatalog,
    favorites::Favorites,
    filter::{FilterState, FilterUpdate},
    pricing::{self, AppliedCoupon, PricingError, Quote},
    products::{Product, ProductId},
    session::{Credentials, Identity, Session},
};

/// Which slice of state a mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// Cart lines or total changed
    Cart,

    /// Favorites list changed
    Favorites,

    /// Session identity changed
    Session,

    /// Filter selection changed
    Filter,

    /// Applied coupon changed
    Coupon,
}

/// Subscriber to state-change notifications.
///
/// The store calls `on_change` synchronously after each mutation commits.
/// Observers read back through the store's accessors or its snapshot; the
/// event only says which slice moved.
pub trait StoreObserver {
    /// React to a committed mutation.
    fn on_change(&mut self, event: StoreEvent);
}

/// Store
pub struct Store {
    currency: &'static Currency,
    coupons: CouponCatalog,
    session: Session,
    cart: Cart,
    favorites: Favorites,
    filter: FilterState,
    applied_coupon: Option<AppliedCoupon>,
    observers: Vec<Box<dyn StoreObserver>>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("currency", &self.currency.iso_alpha_code)
            .field("session", &self.session)
            .field("cart", &self.cart)
            .field("favorites", &self.favorites)
            .field("filter", &self.filter)
            .field("applied_coupon", &self.applied_coupon)
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Create a store with the shipped coupon set in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self::with_catalog(currency, CouponCatalog::builtin(currency))
    }

    /// Create a store with a custom coupon catalog.
    #[must_use]
    pub fn with_catalog(currency: &'static Currency, coupons: CouponCatalog) -> Self {
        Store {
            currency,
            coupons,
            session: Session::Anonymous,
            cart: Cart::new(currency),
            favorites: Favorites::new(),
            filter: FilterState::default(),
            applied_coupon: None,
            observers: Vec::new(),
        }
    }

    /// Register an observer for state-change notifications.
    pub fn subscribe(&mut self, observer: Box<dyn StoreObserver>) {
        self.observers.push(observer);
    }

    fn notify(observers: &mut [Box<dyn StoreObserver>], event: StoreEvent) {
        for observer in observers {
            observer.on_change(event);
        }
    }

    /// Add one unit of a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the product's currency differs from the
    /// store currency or the arithmetic overflows.
    pub fn add_to_cart(&mut self, product: Product) -> Result<(), CartError> {
        self.cart.add(product)?;
        Self::notify(&mut self.observers, StoreEvent::Cart);

        Ok(())
    }

    /// Remove a product's line from the cart; absent ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the total adjustment overflows.
    pub fn remove_from_cart(&mut self, id: ProductId) -> Result<Option<CartLineItem>, CartError> {
        let removed = self.cart.remove(id)?;

        if removed.is_some() {
            Self::notify(&mut self.observers, StoreEvent::Cart);
        }

        Ok(removed)
    }

    /// Replace the quantity of a cart line; absent ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for a quantity below 1 —
    /// callers drop a line through [`Store::remove_from_cart`] instead.
    pub fn update_quantity(&mut self, id: ProductId, quantity: u32) -> Result<(), CartError> {
        self.cart.set_quantity(id, quantity)?;
        Self::notify(&mut self.observers, StoreEvent::Cart);

        Ok(())
    }

    /// Empty the cart. The applied coupon is left in place.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        Self::notify(&mut self.observers, StoreEvent::Cart);
    }

    /// Whether the cart holds a line for the given product id.
    #[must_use]
    pub fn is_in_cart(&self, id: ProductId) -> bool {
        self.cart.contains(id)
    }

    /// Favorite a product; duplicates by id are ignored.
    ///
    /// Returns `true` if the product was added.
    pub fn add_to_favorites(&mut self, product: Product) -> bool {
        let added = self.favorites.add(product);

        if added {
            Self::notify(&mut self.observers, StoreEvent::Favorites);
        }

        added
    }

    /// Unfavorite a product; absent ids are a no-op.
    pub fn remove_from_favorites(&mut self, id: ProductId) -> Option<Product> {
        let removed = self.favorites.remove(id);

        if removed.is_some() {
            Self::notify(&mut self.observers, StoreEvent::Favorites);
        }

        removed
    }

    /// Whether a product id is favorited.
    #[must_use]
    pub fn is_favorite(&self, id: ProductId) -> bool {
        self.favorites.contains(id)
    }

    /// Remove all favorites.
    pub fn clear_favorites(&mut self) {
        self.favorites.clear();
        Self::notify(&mut self.observers, StoreEvent::Favorites);
    }

    /// Log in with mock credentials, binding the cart to the identity.
    ///
    /// If the incoming username differs from the currently bound one —
    /// including the transition from no identity at all — the cart is
    /// reset and any applied coupon goes with it. A re-login as the same
    /// user preserves the cart. Favorites survive either way.
    pub fn login(&mut self, credentials: &Credentials) -> Identity {
        let identity = Identity::from_credentials(credentials);
        let user_changed = self.session.username() != Some(identity.username.as_str());

        self.session = Session::Authenticated(identity.clone());

        if user_changed {
            let had_coupon = self.applied_coupon.take().is_some();

            self.cart.clear();
            info!(username = %identity.username, "bound cart to a new user, cart reset");

            Self::notify(&mut self.observers, StoreEvent::Cart);

            if had_coupon {
                Self::notify(&mut self.observers, StoreEvent::Coupon);
            }
        } else {
            debug!(username = %identity.username, "re-login for the bound user, cart preserved");
        }

        Self::notify(&mut self.observers, StoreEvent::Session);

        identity
    }

    /// Log out, wiping the cart, the favorites, and any applied coupon.
    pub fn logout(&mut self) {
        self.session = Session::Anonymous;
        self.cart.clear();
        self.favorites.clear();
        self.applied_coupon = None;

        info!("logged out, cart and favorites wiped");

        Self::notify(&mut self.observers, StoreEvent::Session);
        Self::notify(&mut self.observers, StoreEvent::Cart);
        Self::notify(&mut self.observers, StoreEvent::Favorites);
        Self::notify(&mut self.observers, StoreEvent::Coupon);
    }

    /// Whether a user is logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Apply a coupon by code, replacing any previously applied one.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidCoupon`] on an unknown code. A
    /// failed apply changes nothing: a previously applied coupon stays in
    /// effect.
    pub fn apply_coupon(&mut self, code: &str) -> Result<&AppliedCoupon, PricingError> {
        let Some(rule) = self.coupons.find(code) else {
            debug!(code, "rejected unknown coupon code");
            return Err(PricingError::InvalidCoupon(code.to_string()));
        };

        debug!(code = rule.code(), "applied coupon");

        let applied = self
            .applied_coupon
            .insert(AppliedCoupon::new(code, rule.clone()));

        Self::notify(&mut self.observers, StoreEvent::Coupon);

        Ok(applied)
    }

    /// Remove the applied coupon, if any. Always succeeds.
    pub fn remove_coupon(&mut self) {
        self.applied_coupon = None;
        Self::notify(&mut self.observers, StoreEvent::Coupon);
    }

    /// The coupon currently in effect, if any.
    #[must_use]
    pub fn applied_coupon(&self) -> Option<&AppliedCoupon> {
        self.applied_coupon.as_ref()
    }

    /// Price the current cart against the applied coupon.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the discount arithmetic fails.
    pub fn quote(&self) -> Result<Quote, PricingError> {
        pricing::quote(self.cart.total(), self.applied_coupon.as_ref())
    }

    /// Merge a partial filter update, last write winning.
    pub fn set_filter(&mut self, update: FilterUpdate) {
        self.filter.apply(update);
        Self::notify(&mut self.observers, StoreEvent::Filter);
    }

    /// The cart ledger.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The favorites list.
    #[must_use]
    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    /// The session state.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The current filter selection.
    #[must_use]
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// The coupon catalog.
    #[must_use]
    pub fn coupons(&self) -> &CouponCatalog {
        &self.coupons
    }

    /// The store currency.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    pub(crate) fn replace_state(
        &mut self,
        session: Session,
        cart: Cart,
        favorites: Favorites,
        filter: FilterState,
    ) {
        self.session = session;
        self.cart = cart;
        self.favorites = favorites;
        self.filter = filter;
        self.applied_coupon = None;

        Self::notify(&mut self.observers, StoreEvent::Session);
        Self::notify(&mut self.observers, StoreEvent::Cart);
        Self::notify(&mut self.observers, StoreEvent::Favorites);
        Self::notify(&mut self.observers, StoreEvent::Filter);
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use super::*;

    fn product(id: u64, minor: i64) -> Product {
        Product::new(ProductId(id), format!("Product {id}"), Money::from_minor(minor, USD))
    }

    #[test]
    fn login_from_anonymous_resets_the_cart() -> TestResult {
        let mut store = Store::new(USD);

        store.add_to_cart(product(1, 999))?;

        // The documented rule: none -> "userA" counts as a username change.
        store.login(&Credentials::new("userA", "pw"));

        assert!(store.cart().is_empty());
        assert!(store.is_authenticated());

        Ok(())
    }

    #[test]
    fn user_change_resets_cart_but_not_favorites() -> TestResult {
        let mut store = Store::new(USD);

        store.login(&Credentials::new("userA", "pw"));
        store.add_to_cart(product(1, 999))?;
        store.add_to_cart(product(2, 500))?;
        store.add_to_favorites(product(3, 100));

        store.login(&Credentials::new("userB", "pw"));

        assert!(store.cart().is_empty());
        assert_eq!(store.favorites().len(), 1);

        // Logging back in as userA does not restore the original cart.
        store.login(&Credentials::new("userA", "pw"));
        assert!(store.cart().is_empty());

        Ok(())
    }

    #[test]
    fn same_user_relogin_preserves_the_cart() -> TestResult {
        let mut store = Store::new(USD);

        store.login(&Credentials::new("userA", "pw"));
        store.add_to_cart(product(1, 999))?;

        store.login(&Credentials::new("userA", "other-pw"));

        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.cart().total(), Money::from_minor(999, USD));

        Ok(())
    }

    #[test]
    fn logout_wipes_cart_favorites_and_coupon() -> TestResult {
        let mut store = Store::new(USD);

        store.login(&Credentials::new("userA", "pw"));
        store.add_to_cart(product(1, 25_000))?;
        store.add_to_favorites(product(2, 100));
        store.apply_coupon("RAM50")?;

        store.logout();

        assert!(!store.is_authenticated());
        assert!(store.cart().is_empty());
        assert!(store.favorites().is_empty());
        assert!(store.applied_coupon().is_none());

        Ok(())
    }

    #[test]
    fn user_change_clears_the_applied_coupon() -> TestResult {
        let mut store = Store::new(USD);

        store.login(&Credentials::new("userA", "pw"));
        store.add_to_cart(product(1, 25_000))?;
        store.apply_coupon("RAM50")?;

        store.login(&Credentials::new("userB", "pw"));

        assert!(store.applied_coupon().is_none());

        Ok(())
    }

    #[test]
    fn failed_apply_keeps_the_previous_coupon() -> TestResult {
        let mut store = Store::new(USD);

        store.add_to_cart(product(1, 25_000))?;
        store.apply_coupon("RAM50")?;

        let result = store.apply_coupon("BOGUS");

        assert!(matches!(result, Err(PricingError::InvalidCoupon(code)) if code == "BOGUS"));
        assert_eq!(
            store.applied_coupon().map(AppliedCoupon::entered_code),
            Some("RAM50")
        );
        assert_eq!(store.cart().total(), Money::from_minor(25_000, USD));

        Ok(())
    }

    #[test]
    fn quote_reflects_the_applied_coupon() -> TestResult {
        let mut store = Store::new(USD);

        store.add_to_cart(product(1, 25_000))?;
        store.apply_coupon("ram50")?;

        let quote = store.quote()?;

        assert_eq!(quote.discount(), Money::from_minor(10_000, USD));
        assert_eq!(quote.total(), Money::from_minor(15_000, USD));

        store.remove_coupon();

        let quote = store.quote()?;

        assert_eq!(quote.discount(), Money::from_minor(0, USD));
        assert_eq!(quote.total(), Money::from_minor(25_000, USD));

        Ok(())
    }

    #[test]
    fn clear_cart_leaves_the_coupon_in_place() -> TestResult {
        let mut store = Store::new(USD);

        store.add_to_cart(product(1, 25_000))?;
        store.apply_coupon("RAM50")?;
        store.clear_cart();

        assert!(store.cart().is_empty());
        assert!(store.applied_coupon().is_some());

        Ok(())
    }

    struct Recorder {
        events: Rc<RefCell<Vec<StoreEvent>>>,
    }

    impl StoreObserver for Recorder {
        fn on_change(&mut self, event: StoreEvent) {
            self.events.borrow_mut().push(event);
        }
    }

    #[test]
    fn observers_see_each_committed_mutation() -> TestResult {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut store = Store::new(USD);

        store.subscribe(Box::new(Recorder {
            events: Rc::clone(&events),
        }));

        store.add_to_cart(product(1, 999))?;
        store.add_to_favorites(product(1, 999));
        store.set_filter(FilterUpdate::new().search_query("mascara"));

        // A no-op removal must not notify.
        store.remove_from_cart(ProductId(42))?;

        assert_eq!(
            *events.borrow(),
            vec![StoreEvent::Cart, StoreEvent::Favorites, StoreEvent::Filter]
        );

        Ok(())
    }
}

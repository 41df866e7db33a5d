//! Snapshot
//!
//! The serialize/deserialize contract with the persistence adapter: a
//! snapshot is a plain structured record of auth, cart, filter, and
//! favorites — no cycles, money as minor units plus one ISO currency
//! code — that round-trips through any serde encoding. YAML is the
//! shipped file encoding.
//!
//! Restore is all-or-nothing: every record is decoded and cross-checked
//! before any store state is replaced.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::{Cart, CartError},
    favorites::Favorites,
    filter::FilterState,
    products::{Product, ProductId},
    session::{Identity, Session},
    store::Store,
};

/// Errors decoding a snapshot back into store state.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot's currency code is not a known ISO currency.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// The snapshot was taken in a different currency than the store's.
    #[error("Snapshot currency {snapshot} does not match store currency {store}")]
    CurrencyMismatch {
        /// Currency code recorded in the snapshot
        snapshot: String,

        /// The store's currency code
        store: &'static str,
    },

    /// The recorded cart total disagrees with the recomputed ledger sum.
    #[error("Recorded cart total {recorded} does not match recomputed total {recomputed}")]
    TotalMismatch {
        /// Total recorded in the snapshot, in minor units
        recorded: i64,

        /// Total recomputed from the snapshot's lines, in minor units
        recomputed: i64,
    },

    /// A cart line could not be rebuilt (bad quantity, overflow).
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Errors loading or saving through a persistence adapter.
#[derive(Debug, Error)]
pub enum PersistError {
    /// IO error reading or writing the backing file
    #[error("Failed to read or write snapshot file: {0}")]
    Io(#[from] io::Error),

    /// YAML encoding or decoding error
    #[error("Failed to encode or decode YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// The loaded snapshot could not be restored
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// A complete, serializable copy of store state at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// ISO currency code all minor-unit amounts are in
    pub currency: String,

    /// Session identity
    pub auth: AuthRecord,

    /// Cart lines and recorded total
    pub cart: CartRecord,

    /// Filter selection
    pub filter: FilterState,

    /// Favorited products
    pub favorites: Vec<ProductRecord>,
}

/// Persisted session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthRecord {
    /// The identity, if logged in
    pub user: Option<Identity>,

    /// Whether a user was logged in
    pub is_authenticated: bool,
}

/// Persisted cart state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartRecord {
    /// Cart lines in insertion order
    pub items: Vec<LineItemRecord>,

    /// Cached total in minor units, cross-checked on restore
    pub total_minor: i64,
}

/// One persisted cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemRecord {
    /// The product snapshot
    pub product: ProductRecord,

    /// Line quantity
    pub quantity: u32,
}

/// A persisted product snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Catalog identifier
    pub id: ProductId,

    /// Product title
    pub title: String,

    /// Unit price in minor units
    pub price_minor: i64,

    /// Category name
    pub category: String,

    /// Thumbnail media reference
    pub thumbnail: String,

    /// Units in stock at capture time
    pub stock: u32,
}

impl ProductRecord {
    fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price_minor: product.price.to_minor_units(),
            category: product.category.clone(),
            thumbnail: product.thumbnail.clone(),
            stock: product.stock,
        }
    }

    fn into_product(self, currency: &'static Currency) -> Product {
        Product {
            id: self.id,
            title: self.title,
            price: Money::from_minor(self.price_minor, currency),
            category: self.category,
            thumbnail: self.thumbnail,
            stock: self.stock,
        }
    }
}

impl Snapshot {
    /// Capture the store's current state.
    #[must_use]
    pub fn capture(store: &Store) -> Self {
        let identity = store.session().identity().cloned();

        Snapshot {
            currency: store.currency().iso_alpha_code.to_string(),
            auth: AuthRecord {
                is_authenticated: identity.is_some(),
                user: identity,
            },
            cart: CartRecord {
                items: store
                    .cart()
                    .iter()
                    .map(|line| LineItemRecord {
                        product: ProductRecord::from_product(line.product()),
                        quantity: line.quantity(),
                    })
                    .collect(),
                total_minor: store.cart().total().to_minor_units(),
            },
            filter: store.filter().clone(),
            favorites: store
                .favorites()
                .iter()
                .map(ProductRecord::from_product)
                .collect(),
        }
    }
}

impl Store {
    /// Capture a serializable snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    /// Replace the store's state with a decoded snapshot.
    ///
    /// The cart is rebuilt line by line through the ledger operations, so
    /// a snapshot holding an invalid quantity, a duplicate line, or a
    /// tampered total is rejected before any state changes. The applied
    /// coupon is transient and is never part of a snapshot; restore
    /// clears it.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] if the currency is unknown or differs
    /// from the store's, or if the cart cannot be rebuilt exactly.
    pub fn restore(&mut self, snapshot: Snapshot) -> Result<(), SnapshotError> {
        let currency = iso::find(&snapshot.currency)
            .ok_or_else(|| SnapshotError::UnknownCurrency(snapshot.currency.clone()))?;

        if currency != self.currency() {
            return Err(SnapshotError::CurrencyMismatch {
                snapshot: snapshot.currency,
                store: self.currency().iso_alpha_code,
            });
        }

        let session = match (snapshot.auth.user, snapshot.auth.is_authenticated) {
            (Some(identity), true) => Session::Authenticated(identity),
            _ => Session::Anonymous,
        };

        let mut cart = Cart::new(currency);

        for item in snapshot.cart.items {
            let id = item.product.id;

            cart.add(item.product.into_product(currency))?;

            if item.quantity != 1 {
                cart.set_quantity(id, item.quantity)?;
            }
        }

        let recomputed = cart.total().to_minor_units();

        if recomputed != snapshot.cart.total_minor {
            return Err(SnapshotError::TotalMismatch {
                recorded: snapshot.cart.total_minor,
                recomputed,
            });
        }

        let mut favorites = Favorites::new();

        for record in snapshot.favorites {
            favorites.add(record.into_product(currency));
        }

        self.replace_state(session, cart, favorites, snapshot.filter);

        Ok(())
    }

    /// Rehydrate from a persistence adapter, if it holds a snapshot.
    ///
    /// Returns `true` if a snapshot was loaded and restored.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] if loading or restoring fails.
    pub fn hydrate(&mut self, adapter: &dyn PersistenceAdapter) -> Result<bool, PersistError> {
        match adapter.load()? {
            Some(snapshot) => {
                self.restore(snapshot)?;
                debug!("rehydrated store from persisted snapshot");

                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Persist the current state through an adapter.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] if saving fails.
    pub fn persist(&self, adapter: &dyn PersistenceAdapter) -> Result<(), PersistError> {
        adapter.save(&self.snapshot())
    }
}

/// Durable storage for snapshots, keyed by a single namespace.
pub trait PersistenceAdapter {
    /// Load the stored snapshot, if one exists.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] if the backing storage fails.
    fn load(&self) -> Result<Option<Snapshot>, PersistError>;

    /// Store a snapshot, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] if the backing storage fails.
    fn save(&self, snapshot: &Snapshot) -> Result<(), PersistError>;
}

/// File-backed adapter using the crate's YAML encoding.
#[derive(Debug, Clone)]
pub struct YamlFileAdapter {
    path: PathBuf,
}

impl YamlFileAdapter {
    /// Adapter storing its snapshot at the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceAdapter for YamlFileAdapter {
    fn load(&self) -> Result<Option<Snapshot>, PersistError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        Ok(Some(serde_norway::from_str(&text)?))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), PersistError> {
        let text = serde_norway::to_string(snapshot)?;

        fs::write(&self.path, text)?;
        debug!(path = %self.path.display(), "persisted snapshot");

        Ok(())
    }
}

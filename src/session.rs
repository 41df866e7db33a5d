//! Session
//!
//! The authentication identity and its two-state machine. Credential
//! verification is a pass-through mock — the token is derived, not
//! validated, and this is not a security boundary.

use serde::{Deserialize, Serialize};

/// Raw login form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Username as entered
    pub username: String,

    /// Password as entered
    pub password: String,
}

impl Credentials {
    /// Bundle a username and password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// An authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Username the cart is bound to
    pub username: String,

    /// Opaque token derived from the credentials
    pub token: String,
}

impl Identity {
    /// Derive a mock identity from credentials.
    #[must_use]
    pub fn from_credentials(credentials: &Credentials) -> Self {
        Self {
            username: credentials.username.clone(),
            token: format!("{}:{}", credentials.username, credentials.password),
        }
    }
}

/// The session state machine: `Anonymous` or `Authenticated`.
///
/// Transitions happen on the store: `login` may reset the cart when the
/// username changes, `logout` always wipes cart and favorites.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    /// No identity
    #[default]
    Anonymous,

    /// Logged in
    Authenticated(Identity),
}

impl Session {
    /// Whether a user is logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    /// The current identity, if authenticated.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated(identity) => Some(identity),
        }
    }

    /// The current username, if authenticated.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.identity().map(|identity| identity.username.as_str())
    }
}

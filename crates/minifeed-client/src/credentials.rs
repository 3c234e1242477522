//! Session credentials kept in an injected `KeyValueStore`.

use std::sync::Arc;

use log::warn;
use minifeed_core::{AuthSession, User};

use crate::store::{KeyValueStore, StoreError};

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";
const AUTHENTICATED_KEY: &str = "isAuthenticated";

/// What the store says about the current session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoredAuth {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
}

/// Reads and writes the session keys. Cloning shares the same store.
#[derive(Clone)]
pub struct Credentials {
    store: Arc<dyn KeyValueStore>,
}

impl Credentials {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The bearer token, if one is stored.
    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|token| !token.is_empty())
    }

    /// The stored session; authenticated only when token, user and flag are
    /// all present and the user record parses.
    pub fn stored_auth(&self) -> StoredAuth {
        let token = self.token();
        let flagged = self.store.get(AUTHENTICATED_KEY).as_deref() == Some("true");
        let user = self.store.get(USER_KEY).and_then(|raw| {
            serde_json::from_str::<User>(&raw)
                .map_err(|e| warn!("Ignoring unreadable stored user: {}", e))
                .ok()
        });

        match (user, token) {
            (Some(user), Some(token)) if flagged => StoredAuth {
                user: Some(user),
                token: Some(token),
                is_authenticated: true,
            },
            _ => StoredAuth::default(),
        }
    }

    pub fn save(&self, session: &AuthSession) -> Result<(), StoreError> {
        let user = serde_json::to_string(&session.user).map_err(|e| StoreError::Malformed {
            path: USER_KEY.into(),
            message: e.to_string(),
        })?;
        self.store.set(TOKEN_KEY, &session.token)?;
        self.store.set(USER_KEY, &user)?;
        self.store.set(AUTHENTICATED_KEY, "true")
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        self.store.remove(AUTHENTICATED_KEY)
    }
}

//! Session management backed by durable token storage

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use common::TokenStorage;
use tracing::{info, warn};

use crate::error::{SessionError, SessionResult};
use crate::jwt::decode_claims;
use crate::models::{Role, UserClaims};

/// Current authentication state
///
/// `user` is present exactly when `token` is present and decodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    token: Option<String>,
    user: Option<UserClaims>,
}

impl Session {
    /// Session with no token
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Build a session from a token, decoding its claims
    pub fn from_token(token: &str) -> SessionResult<Self> {
        let user = decode_claims(token)?;
        Ok(Self {
            token: Some(token.trim().to_string()),
            user: Some(user),
        })
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&UserClaims> {
        self.user.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.role().is_some_and(|r| r.is_admin())
    }
}

/// Session store shared by the HTTP client and the views
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<Session>>,
    storage: Arc<dyn TokenStorage>,
}

impl SessionStore {
    /// Create a session store, adopting any token already in storage
    ///
    /// A stored token is taken as-is: no signature or expiry check. A token
    /// that does not decode is discarded and the store starts empty.
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        let session = match storage.load() {
            Ok(Some(token)) => match Session::from_token(&token) {
                Ok(session) => {
                    info!("Session restored from storage");
                    session
                }
                Err(e) => {
                    warn!("Discarding stored token: {}", e);
                    if let Err(e) = storage.clear() {
                        warn!("Failed to clear stored token: {}", e);
                    }
                    Session::anonymous()
                }
            },
            Ok(None) => Session::anonymous(),
            Err(e) => {
                warn!("Failed to read stored token: {}", e);
                Session::anonymous()
            }
        };

        Self {
            state: Arc::new(RwLock::new(session)),
            storage,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Adopt a token obtained from the login endpoint
    ///
    /// The token is persisted first; the in-memory session only changes once
    /// storage has accepted it. A token that does not decode ends the current
    /// session.
    pub fn login(&self, token: &str) -> SessionResult<UserClaims> {
        let session = match Session::from_token(token) {
            Ok(session) => session,
            Err(e) => {
                self.logout()?;
                return Err(e);
            }
        };

        self.storage.store(token.trim())?;
        let user = session.user.clone().ok_or_else(|| {
            SessionError::MalformedToken("token carries no identity".to_string())
        })?;
        *self.write() = session;

        info!("Logged in as {} ({})", user.sub, user.role);
        Ok(user)
    }

    /// Drop the session from storage, then from memory
    ///
    /// A failed storage clear leaves the in-memory session untouched so the
    /// two never disagree.
    pub fn logout(&self) -> SessionResult<()> {
        self.storage.clear()?;
        *self.write() = Session::anonymous();
        info!("Logged out");
        Ok(())
    }

    /// Copy of the current session
    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn user(&self) -> Option<UserClaims> {
        self.read().user.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::MemoryTokenStorage;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    fn token_for(sub: &str, role: &str, id: i64) -> String {
        encode(
            &Header::default(),
            &json!({"sub": sub, "role": role, "id": id}),
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap()
    }

    #[test]
    fn test_starts_anonymous_without_stored_token() {
        let store = SessionStore::new(Arc::new(MemoryTokenStorage::new()));
        let session = store.snapshot();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }

    #[test]
    fn test_rehydrates_from_storage() {
        let token = token_for("leila@salon.com", "ADMIN", 1);
        let store = SessionStore::new(Arc::new(MemoryTokenStorage::with_token(token.clone())));

        assert_eq!(store.token(), Some(token));
        assert!(store.snapshot().is_admin());
    }

    #[test]
    fn test_discards_malformed_stored_token() {
        let storage = Arc::new(MemoryTokenStorage::with_token("garbage"));
        let store = SessionStore::new(storage.clone());

        assert!(store.token().is_none());
        assert!(store.user().is_none());
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn test_login_persists_and_logout_clears() {
        let storage = Arc::new(MemoryTokenStorage::new());
        let store = SessionStore::new(storage.clone());
        let token = token_for("maria@mail.com", "USER", 42);

        let user = store.login(&token).unwrap();
        assert_eq!(user.id, Some(42));
        assert_eq!(storage.load().unwrap(), Some(token.clone()));
        assert_eq!(store.snapshot().role(), Some(Role::User));

        store.logout().unwrap();
        assert!(store.token().is_none());
        assert!(store.user().is_none());
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn test_login_with_malformed_token_ends_session() {
        let storage = Arc::new(MemoryTokenStorage::new());
        let store = SessionStore::new(storage.clone());
        store.login(&token_for("maria@mail.com", "USER", 42)).unwrap();

        assert!(store.login("not.a.jwt").is_err());
        assert!(store.token().is_none());
        assert!(store.user().is_none());
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn test_clones_share_state() {
        let store = SessionStore::new(Arc::new(MemoryTokenStorage::new()));
        let other = store.clone();

        store.login(&token_for("maria@mail.com", "USER", 42)).unwrap();
        assert!(other.snapshot().is_authenticated());
    }

    struct StuckStorage {
        inner: MemoryTokenStorage,
    }

    impl TokenStorage for StuckStorage {
        fn load(&self) -> common::error::StorageResult<Option<String>> {
            self.inner.load()
        }

        fn store(&self, token: &str) -> common::error::StorageResult<()> {
            self.inner.store(token)
        }

        fn clear(&self) -> common::error::StorageResult<()> {
            Err(common::error::StorageError::Io(std::io::Error::other(
                "read-only filesystem",
            )))
        }
    }

    #[test]
    fn test_failed_logout_keeps_memory_and_storage_in_step() {
        let storage = Arc::new(StuckStorage {
            inner: MemoryTokenStorage::new(),
        });
        let store = SessionStore::new(storage.clone());
        let token = token_for("maria@mail.com", "USER", 42);
        store.login(&token).unwrap();

        assert!(matches!(store.logout(), Err(SessionError::Storage(_))));
        assert_eq!(store.token(), Some(token.clone()));
        assert_eq!(storage.load().unwrap(), Some(token));
    }
}

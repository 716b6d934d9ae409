use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};

use super::error::AuthError;
use super::token::AccessToken;

/// Holds the most recently obtained access token.
///
/// Cloning yields another handle to the same slot. The login flow is the only
/// writer; everything else reads.
///
/// # Example
/// ```
/// use device_grant::auth::{AccessToken, AuthError, TokenStore};
///
/// let store = TokenStore::new();
/// assert!(matches!(store.get(), Err(AuthError::NotAuthenticated)));
/// store.set(AccessToken {
///     access_token: "tok".to_string(),
///     token_type: "Bearer".to_string(),
///     expires_in: 3600,
/// });
/// assert_eq!(store.get()?.access_token, "tok");
/// # Ok::<(), AuthError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    slot: Arc<RwLock<Option<StoredToken>>>,
}

#[derive(Debug, Clone)]
struct StoredToken {
    token: AccessToken,
    obtained_at: DateTime<Utc>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any stored token.
    pub fn set(&self, token: AccessToken) {
        let stored = StoredToken {
            token,
            obtained_at: Utc::now(),
        };
        match self.slot.write() {
            Ok(mut guard) => *guard = Some(stored),
            Err(poisoned) => *poisoned.into_inner() = Some(stored),
        }
    }

    pub fn get(&self) -> Result<AccessToken, AuthError> {
        self.read(|stored| stored.token.clone())
    }

    pub fn obtained_at(&self) -> Result<DateTime<Utc>, AuthError> {
        self.read(|stored| stored.obtained_at)
    }

    pub fn expires_at(&self) -> Result<DateTime<Utc>, AuthError> {
        self.read(|stored| {
            let secs = i64::try_from(stored.token.expires_in).unwrap_or(i64::MAX);
            Duration::try_seconds(secs)
                .and_then(|lifetime| stored.obtained_at.checked_add_signed(lifetime))
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
        })
    }

    pub fn is_expired(&self) -> Result<bool, AuthError> {
        Ok(Utc::now() >= self.expires_at()?)
    }

    pub fn clear(&self) {
        match self.slot.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }

    fn read<T>(&self, f: impl FnOnce(&StoredToken) -> T) -> Result<T, AuthError> {
        let guard = match self.slot.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.as_ref().map(f).ok_or(AuthError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn token(value: &str, expires_in: u64) -> AccessToken {
        AccessToken {
            access_token: value.to_string(),
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }

    #[test]
    fn empty_store_is_not_authenticated() {
        let store = TokenStore::new();
        assert!(matches!(store.get(), Err(AuthError::NotAuthenticated)));
        assert!(matches!(store.is_expired(), Err(AuthError::NotAuthenticated)));
    }

    #[test]
    fn set_then_get_returns_same_token() {
        let store = TokenStore::new();
        store.set(token("tok", 3600));
        assert_eq!(store.get().unwrap(), token("tok", 3600));
    }

    #[test]
    fn set_replaces_previous_token() {
        let store = TokenStore::new();
        store.set(token("first", 60));
        store.set(token("second", 60));
        assert_eq!(store.get().unwrap().access_token, "second");
    }

    #[test]
    fn clones_share_the_slot() {
        let store = TokenStore::new();
        let reader = store.clone();
        store.set(token("shared", 60));
        assert_eq!(reader.get().unwrap().access_token, "shared");
        reader.clear();
        assert!(store.get().is_err());
    }

    #[test]
    fn expiry_follows_expires_in() {
        let store = TokenStore::new();
        store.set(token("fresh", 3600));
        assert!(!store.is_expired().unwrap());
        let delta = store.expires_at().unwrap() - store.obtained_at().unwrap();
        assert_eq!(delta.num_seconds(), 3600);

        store.set(token("stale", 0));
        assert!(store.is_expired().unwrap());
    }
}

//! Token storage seam.
//!
//! The client never persists tokens itself; it reads and writes through
//! [`TokenStore`]. Hosts back it with whatever secure storage they have
//! (cookies, keychain). [`MemoryTokenStore`] is a TTL-aware in-process
//! implementation suitable for tests and short-lived tools.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Storage key for the access token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Storage key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Storage key for the signed-in user id.
pub const USER_ID_KEY: &str = "userId";

/// Default lifetime for a freshly refreshed access token.
pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Key-value store for session credentials.
pub trait TokenStore: Send + Sync {
    /// Returns the value for `key`, or None if absent or expired.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, expiring after `ttl` when given.
    fn set(&self, key: &str, value: &str, ttl: Option<Duration>);

    /// Removes `key` if present.
    fn remove(&self, key: &str);
}

/// Removes every session key from the store.
pub fn clear_session(store: &dyn TokenStore) {
    store.remove(ACCESS_TOKEN_KEY);
    store.remove(REFRESH_TOKEN_KEY);
    store.remove(USER_ID_KEY);
}

struct Entry {
    value: String,
    deadline: Option<Instant>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// In-memory [`TokenStore`] with TTL-based expiry.
#[derive(Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience: a store pre-seeded with an access/refresh token pair.
    pub fn with_session(access_token: &str, refresh_token: &str) -> Self {
        let store = Self::new();
        store.set(ACCESS_TOKEN_KEY, access_token, None);
        store.set(REFRESH_TOKEN_KEY, refresh_token, None);
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                entries.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) {
        let entry = Entry {
            value: value.to_string(),
            deadline: ttl.map(|ttl| Instant::now() + ttl),
        };
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), entry);
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
    }
}

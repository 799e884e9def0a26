//! Session store - typed access to the persistent key-value area
//!
//! Owns the fixed storage keys for the auth token, the logged-in user, the
//! cached user list with its timestamp, and the per-user cache slots.
//! Values are stored as serialized text; callers parse them.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::domain::result::Result;
use crate::ports::{Clock, KeyValueStore};

/// Storage keys
pub mod keys {
    pub const AUTH_TOKEN: &str = "lendsqr_auth_token";
    pub const AUTH_USER: &str = "lendsqr_auth_user";
    pub const USERS: &str = "lendsqr_users";
    pub const USERS_TIMESTAMP: &str = "lendsqr_users_timestamp";
    /// Prefix of the per-user cache slots (`user_{id}`)
    pub const USER_PREFIX: &str = "user_";

    pub fn user(id: &str) -> String {
        format!("{}{}", USER_PREFIX, id)
    }
}

/// How long a cached user list counts as fresh
pub fn cache_duration() -> Duration {
    Duration::hours(24)
}

/// Typed view over a `KeyValueStore`
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Current time according to the injected clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // === Auth ===

    pub fn get_token(&self) -> Result<Option<String>> {
        self.store.get(keys::AUTH_TOKEN)
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        self.store.set(keys::AUTH_TOKEN, token)
    }

    /// Whether a non-empty token is present. Storage failures read as absent.
    pub fn auth_status(&self) -> bool {
        matches!(self.get_token(), Ok(Some(token)) if !token.is_empty())
    }

    /// Raw serialized auth user
    pub fn get_user(&self) -> Result<Option<String>> {
        self.store.get(keys::AUTH_USER)
    }

    pub fn set_user(&self, user: &str) -> Result<()> {
        self.store.set(keys::AUTH_USER, user)
    }

    /// Remove token and auth user
    pub fn clear_auth(&self) -> Result<()> {
        self.store.remove(keys::AUTH_TOKEN)?;
        self.store.remove(keys::AUTH_USER)
    }

    // === Users list cache ===

    /// Raw serialized user list
    pub fn get_users(&self) -> Result<Option<String>> {
        self.store.get(keys::USERS)
    }

    /// Store the serialized list and stamp it with the current time
    pub fn set_users(&self, users: &str) -> Result<()> {
        self.store.set(keys::USERS, users)?;
        self.store.set(
            keys::USERS_TIMESTAMP,
            &self.clock.now().timestamp_millis().to_string(),
        )
    }

    /// When the list was cached. Unparseable timestamps read as absent.
    pub fn get_users_timestamp(&self) -> Result<Option<DateTime<Utc>>> {
        let raw = self.store.get(keys::USERS_TIMESTAMP)?;
        Ok(raw
            .and_then(|ms| ms.trim().parse::<i64>().ok())
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()))
    }

    /// True when a list is cached and younger than 24 hours
    pub fn is_users_cache_valid(&self) -> Result<bool> {
        if self.get_users()?.is_none() {
            return Ok(false);
        }
        Ok(match self.get_users_timestamp()? {
            Some(cached_at) => self.clock.now() - cached_at < cache_duration(),
            None => false,
        })
    }

    /// Remove the cached list and its timestamp
    pub fn clear_users_cache(&self) -> Result<()> {
        self.store.remove(keys::USERS)?;
        self.store.remove(keys::USERS_TIMESTAMP)
    }

    // === Per-user cache ===

    pub fn get_cached_user(&self, id: &str) -> Result<Option<String>> {
        self.store.get(&keys::user(id))
    }

    pub fn set_cached_user(&self, id: &str, user: &str) -> Result<()> {
        self.store.set(&keys::user(id), user)
    }

    /// Ids that currently have a per-user cache slot
    pub fn cached_user_ids(&self) -> Result<Vec<String>> {
        Ok(self
            .store
            .keys()?
            .into_iter()
            .filter_map(|k| k.strip_prefix(keys::USER_PREFIX).map(str::to_string))
            .collect())
    }

    /// Remove every `user_{id}` slot, returning how many were removed
    pub fn clear_user_entries(&self) -> Result<usize> {
        let ids = self.cached_user_ids()?;
        for id in &ids {
            self.store.remove(&keys::user(id))?;
        }
        Ok(ids.len())
    }

    /// Wipe the whole storage area
    pub fn clear_all(&self) -> Result<()> {
        self.store.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::ManualClock;
    use crate::adapters::memory::MemoryStore;

    fn setup() -> (Arc<MemoryStore>, Arc<ManualClock>, SessionStore) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()));
        let session = SessionStore::new(store.clone(), clock.clone());
        (store, clock, session)
    }

    #[test]
    fn test_token_and_auth_status() {
        let (_, _, session) = setup();
        assert!(!session.auth_status());

        session.set_token("abc").unwrap();
        assert!(session.auth_status());
        assert_eq!(session.get_token().unwrap(), Some("abc".to_string()));

        session.set_user(r#"{"email":"a","name":"b"}"#).unwrap();
        session.clear_auth().unwrap();
        assert!(!session.auth_status());
        assert_eq!(session.get_user().unwrap(), None);
    }

    #[test]
    fn test_set_users_stamps_time() {
        let (store, clock, session) = setup();
        session.set_users("[]").unwrap();

        assert_eq!(session.get_users_timestamp().unwrap(), Some(clock.now()));
        assert_eq!(
            store.get(keys::USERS_TIMESTAMP).unwrap(),
            Some(clock.now().timestamp_millis().to_string())
        );
    }

    #[test]
    fn test_cache_validity_window() {
        let (_, clock, session) = setup();
        assert!(!session.is_users_cache_valid().unwrap());

        session.set_users("[]").unwrap();
        clock.advance(Duration::hours(23) + Duration::minutes(59));
        assert!(session.is_users_cache_valid().unwrap());

        clock.advance(Duration::minutes(2));
        assert!(!session.is_users_cache_valid().unwrap());
    }

    #[test]
    fn test_corrupt_timestamp_is_invalid() {
        let (store, _, session) = setup();
        session.set_users("[]").unwrap();
        store.set(keys::USERS_TIMESTAMP, "yesterday").unwrap();

        assert_eq!(session.get_users_timestamp().unwrap(), None);
        assert!(!session.is_users_cache_valid().unwrap());
    }

    #[test]
    fn test_clear_users_cache_keeps_auth() {
        let (_, _, session) = setup();
        session.set_token("t").unwrap();
        session.set_users("[]").unwrap();

        session.clear_users_cache().unwrap();
        assert_eq!(session.get_users().unwrap(), None);
        assert_eq!(session.get_users_timestamp().unwrap(), None);
        assert!(session.auth_status());
    }

    #[test]
    fn test_clear_user_entries() {
        let (store, _, session) = setup();
        session.set_cached_user("LSQ1", "{}").unwrap();
        session.set_cached_user("LSQ2", "{}").unwrap();
        session.set_token("t").unwrap();

        let mut ids = session.cached_user_ids().unwrap();
        ids.sort();
        assert_eq!(ids, vec!["LSQ1".to_string(), "LSQ2".to_string()]);

        assert_eq!(session.clear_user_entries().unwrap(), 2);
        assert_eq!(session.get_cached_user("LSQ1").unwrap(), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear_all() {
        let (store, _, session) = setup();
        session.set_token("t").unwrap();
        session.set_users("[]").unwrap();
        session.clear_all().unwrap();
        assert!(store.is_empty());
    }
}

//! Key-value storage port
//!
//! The persistent string-to-string area the session store lives in. Keys
//! are fixed constants owned by `SessionStore`; values are serialized text.

use crate::domain::result::Result;

/// Persistent key-value storage abstraction
///
/// Implementations must be shareable across threads. There is no
/// transactional guarantee: concurrent writers to the same key race and
/// the last write wins.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key is absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite a value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys currently stored
    fn keys(&self) -> Result<Vec<String>>;

    /// Remove every key
    fn clear(&self) -> Result<()>;
}

//! Users API port
//!
//! Defines the interface for fetching user records from the remote
//! REST endpoint (the mock JSON server in development).

use crate::domain::result::Result;
use crate::domain::User;

/// Remote source of user records
pub trait UserApi: Send + Sync {
    /// Base URL requests are sent to (for diagnostics)
    fn base_url(&self) -> &str;

    /// Fetch the full user list (`GET /users`)
    ///
    /// Fails on a non-success status, or when the body is not a JSON array
    /// or is an empty array.
    fn fetch_users(&self) -> Result<Vec<User>>;

    /// Fetch a single user (`GET /users/{id}`)
    ///
    /// Returns `Ok(None)` when the endpoint answers 404.
    fn fetch_user(&self, id: &str) -> Result<Option<User>>;
}

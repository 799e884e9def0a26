//! User data-access service
//!
//! Read-through cache over the users API:
//! - the list is served from cache while younger than 24 hours
//! - otherwise it is fetched and re-cached
//! - if the fetch fails, any cached list is served regardless of age
//! - only with no cache at all does the failure reach the caller

use std::sync::Arc;

use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{DashboardStats, User};
use crate::ports::UserApi;
use crate::services::SessionStore;

/// Where a returned user list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UsersSource {
    /// Fresh cache hit, no network call
    Cache,
    /// Fetched from the API and re-cached
    Network,
    /// API failed; served an expired cached list
    StaleCache,
}

/// A user list together with how it was obtained
#[derive(Debug, Clone)]
pub struct UsersFetch {
    pub users: Vec<User>,
    pub source: UsersSource,
    /// Failures that were downgraded to a fallback
    pub warnings: Vec<String>,
}

/// Fetches users through the session cache
pub struct UserService {
    api: Arc<dyn UserApi>,
    session: Arc<SessionStore>,
}

impl UserService {
    pub fn new(api: Arc<dyn UserApi>, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    /// Base URL of the underlying API
    pub fn api_base_url(&self) -> &str {
        self.api.base_url()
    }

    /// Full user list, applying the cache and stale-while-error policy
    pub fn get_users(&self) -> Result<Vec<User>> {
        self.fetch_users().map(|fetch| fetch.users)
    }

    /// Like `get_users`, but reports the source and any swallowed failure
    pub fn fetch_users(&self) -> Result<UsersFetch> {
        if let Some(users) = self.fresh_cached_users() {
            return Ok(UsersFetch {
                users,
                source: UsersSource::Cache,
                warnings: Vec::new(),
            });
        }

        match self.fetch_and_cache() {
            Ok(users) => Ok(UsersFetch {
                users,
                source: UsersSource::Network,
                warnings: Vec::new(),
            }),
            Err(fetch_err) => match self.any_cached_users() {
                Some(users) => Ok(UsersFetch {
                    users,
                    source: UsersSource::StaleCache,
                    warnings: vec![format!("Error fetching users: {}", fetch_err)],
                }),
                None => Err(Error::FetchFailed(fetch_err.to_string())),
            },
        }
    }

    fn fresh_cached_users(&self) -> Option<Vec<User>> {
        if !self.session.is_users_cache_valid().unwrap_or(false) {
            return None;
        }
        self.any_cached_users()
    }

    /// Cached list regardless of age. Unreadable entries count as absent.
    fn any_cached_users(&self) -> Option<Vec<User>> {
        let raw = self.session.get_users().ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }

    fn fetch_and_cache(&self) -> Result<Vec<User>> {
        let users = self.api.fetch_users()?;
        if users.is_empty() {
            return Err(Error::sync("Invalid API response format"));
        }
        self.session.set_users(&serde_json::to_string(&users)?)?;
        Ok(users)
    }

    /// One user by id, from the per-user cache or the API
    ///
    /// `Ok(None)` means the API reported the user as not found. Transport
    /// and server failures are returned as errors so callers can tell the
    /// two apart.
    pub fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        if let Some(raw) = self.session.get_cached_user(id)? {
            if let Ok(user) = serde_json::from_str::<User>(&raw) {
                return Ok(Some(user));
            }
        }

        match self.api.fetch_user(id)? {
            Some(user) => {
                self.session
                    .set_cached_user(id, &serde_json::to_string(&user)?)?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Dashboard counts over the (possibly cached) full list
    pub fn get_dashboard_stats(&self) -> Result<DashboardStats> {
        let users = self.get_users()?;
        Ok(DashboardStats::from_users(&users))
    }

    /// Drop the cached list, its timestamp and every per-user entry
    pub fn clear_cache(&self) -> Result<()> {
        self.session.clear_users_cache()?;
        self.session.clear_user_entries()?;
        Ok(())
    }

    /// Clear the cache and fetch the list again
    pub fn refresh_users(&self) -> Result<Vec<User>> {
        self.clear_cache()?;
        self.get_users()
    }
}

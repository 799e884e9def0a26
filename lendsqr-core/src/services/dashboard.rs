//! Dashboard loading: user list and summary counts fetched concurrently

use std::sync::Arc;
use std::thread;

use crate::domain::result::{Error, Result};
use crate::domain::{DashboardStats, User};
use crate::services::users::UsersFetch;
use crate::services::UserService;

/// Everything the dashboard view needs
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub users: UsersFetch,
    pub stats: DashboardStats,
    /// Set when stats could not be computed and zeros are shown instead
    pub stats_error: Option<String>,
}

impl DashboardSnapshot {
    pub fn user_list(&self) -> &[User] {
        &self.users.users
    }
}

pub struct DashboardService {
    users: Arc<UserService>,
}

impl DashboardService {
    pub fn new(users: Arc<UserService>) -> Self {
        Self { users }
    }

    /// Fetch the list and the stats in parallel
    ///
    /// A list failure fails the load. A stats failure degrades to zeroed
    /// counts with the error recorded on the snapshot.
    pub fn load(&self) -> Result<DashboardSnapshot> {
        let (users, stats) = thread::scope(|s| {
            let users_task = s.spawn(|| self.users.fetch_users());
            let stats_task = s.spawn(|| self.users.get_dashboard_stats());
            (join(users_task), join(stats_task))
        });

        let users = users?;
        let (stats, stats_error) = match stats {
            Ok(stats) => (stats, None),
            Err(e) => (DashboardStats::default(), Some(e.to_string())),
        };

        Ok(DashboardSnapshot {
            users,
            stats,
            stats_error,
        })
    }
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, Result<T>>) -> Result<T> {
    handle
        .join()
        .unwrap_or_else(|_| Err(Error::Other("dashboard worker panicked".to_string())))
}

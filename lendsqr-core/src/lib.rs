//! Lendsqr Core - session, auth and user data access for the Lendsqr admin console
//!
//! This crate follows a hexagonal layout:
//!
//! - **domain**: Core entities (User, DashboardStats, UserFilters, ...)
//! - **ports**: Trait definitions for external dependencies (KeyValueStore, UserApi, Clock)
//! - **services**: Business logic (auth, cached user access, dashboard, table view-model)
//! - **adapters**: Concrete implementations (DuckDB, reqwest, mock server, generator)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::clock::SystemClock;
use adapters::duckdb::DuckDbStore;
use adapters::http::HttpUserApi;
use config::Config;
use ports::{Clock, KeyValueStore, UserApi};
use services::*;

pub use domain::result::{Error, OperationResult};
pub use domain::{
    AuthUser, Credentials, DashboardStats, FilterField, User, UserFilters, UserStatus,
};

/// File name of the session database inside the data directory
pub const SESSION_DB_FILE: &str = "lendsqr.duckdb";

/// Wired-up services for one data directory
pub struct LendsqrContext {
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub auth_service: AuthService,
    pub user_service: Arc<UserService>,
    pub dashboard_service: DashboardService,
}

impl LendsqrContext {
    /// Open the session database in `dir` and connect to the configured API
    pub fn new(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let config = Config::load(dir)?;

        let store = DuckDbStore::new(&dir.join(SESSION_DB_FILE))
            .context("Failed to open session database")?;
        let api = HttpUserApi::new(&config.api_base_url())?;

        Ok(Self::from_parts(
            config,
            Arc::new(store),
            Arc::new(api),
            Arc::new(SystemClock),
        ))
    }

    /// Assemble a context from explicit adapters
    pub fn from_parts(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        api: Arc<dyn UserApi>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let session = Arc::new(SessionStore::new(store, clock));
        let auth_service =
            AuthService::new(Arc::clone(&session)).with_login_delay(config.login_delay());
        let user_service = Arc::new(UserService::new(api, Arc::clone(&session)));
        let dashboard_service = DashboardService::new(Arc::clone(&user_service));

        Self {
            config,
            session,
            auth_service,
            user_service,
            dashboard_service,
        }
    }

    /// A table view-model over `users` using the configured page size
    pub fn user_table(&self, users: Vec<User>) -> domain::result::Result<UserTable> {
        UserTable::new(users).with_per_page(self.config.per_page)
    }
}

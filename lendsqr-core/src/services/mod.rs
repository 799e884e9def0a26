//! Service layer - business logic orchestration
//!
//! Services depend only on the port traits, so every one of them can be
//! driven with the in-memory store and a fake clock in tests.

pub mod auth;
pub mod dashboard;
pub mod logging;
pub mod migration;
pub mod session;
pub mod table;
pub mod users;

pub use auth::{AuthService, DEFAULT_LOGIN_DELAY};
pub use dashboard::{DashboardService, DashboardSnapshot};
pub use logging::{EntryPoint, EventCount, LogEntry, LogEvent, LogQuery, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use session::SessionStore;
pub use table::{PageLink, Showing, UserTable, DEFAULT_PER_PAGE, PER_PAGE_OPTIONS};
pub use users::{UserService, UsersFetch, UsersSource};
